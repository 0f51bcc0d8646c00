//! Operator exclusion models.
//!
//! Exclusions take operators out of planning for part or all of a week:
//! vacation, sickness, training. They live beside the weekly rule
//! configuration and are editable independently of it.

use serde::{Deserialize, Serialize};

use super::WeekDay;

/// Why an operator is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    Vacation,
    Sick,
    Training,
    Other,
}

/// A week-scoped absence for one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorExclusion {
    /// Excluded operator.
    pub operator_id: String,
    /// Reason for the absence.
    pub reason: ExclusionReason,
    /// Days the exclusion covers. Empty = the whole week.
    pub excluded_days: Vec<WeekDay>,
}

/// The exclusion set for one week.
///
/// A sibling of the weekly planning configuration: saved and edited on
/// its own so that absences survive rule changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyExclusions {
    /// Unique identifier.
    pub id: String,
    /// ISO week number within the year.
    pub week_number: u32,
    /// Calendar year.
    pub year: i32,
    /// Exclusions in effect this week.
    pub exclusions: Vec<OperatorExclusion>,
    /// Creation timestamp (ms).
    pub created_at_ms: i64,
    /// Last-modified timestamp (ms).
    pub updated_at_ms: i64,
}

impl ExclusionReason {
    /// Human-readable phrase for messages.
    pub fn label(self) -> &'static str {
        match self {
            ExclusionReason::Vacation => "vacation",
            ExclusionReason::Sick => "sick leave",
            ExclusionReason::Training => "training",
            ExclusionReason::Other => "absence",
        }
    }
}

impl OperatorExclusion {
    /// Creates a full-week exclusion.
    pub fn new(operator_id: impl Into<String>, reason: ExclusionReason) -> Self {
        Self {
            operator_id: operator_id.into(),
            reason,
            excluded_days: Vec::new(),
        }
    }

    /// Restricts the exclusion to the given days.
    pub fn with_days(mut self, days: impl IntoIterator<Item = WeekDay>) -> Self {
        self.excluded_days = days.into_iter().collect();
        self
    }

    /// Whether the exclusion covers a day.
    pub fn covers(&self, day: WeekDay) -> bool {
        self.excluded_days.is_empty() || self.excluded_days.contains(&day)
    }

    /// Whether the exclusion spans the whole week.
    #[inline]
    pub fn is_full_week(&self) -> bool {
        self.excluded_days.is_empty() || self.excluded_days.len() == WeekDay::ALL.len()
    }
}

/// First exclusion in a flat list covering the operator on a day.
///
/// The engine and detector take exclusions as a plain slice so callers can
/// pass `&week.exclusions` or any filtered subset.
pub fn excluded_on_day<'a>(
    exclusions: &'a [OperatorExclusion],
    operator_id: &str,
    day: WeekDay,
) -> Option<&'a OperatorExclusion> {
    exclusions
        .iter()
        .find(|e| e.operator_id == operator_id && e.covers(day))
}

impl WeeklyExclusions {
    /// Creates an empty exclusion set for a week.
    pub fn new(id: impl Into<String>, week_number: u32, year: i32, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            week_number,
            year,
            exclusions: Vec::new(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Appends an exclusion.
    pub fn with_exclusion(mut self, exclusion: OperatorExclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Adds an exclusion in place.
    pub fn add(&mut self, exclusion: OperatorExclusion) {
        self.exclusions.push(exclusion);
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at_ms = now_ms;
    }

    /// All exclusions for one operator.
    pub fn for_operator(&self, operator_id: &str) -> Vec<&OperatorExclusion> {
        self.exclusions
            .iter()
            .filter(|e| e.operator_id == operator_id)
            .collect()
    }

    /// First exclusion covering the operator on a day, if any.
    pub fn excluded_on(&self, operator_id: &str, day: WeekDay) -> Option<&OperatorExclusion> {
        excluded_on_day(&self.exclusions, operator_id, day)
    }
}
