//! Operator model.
//!
//! Operators are the workforce members assigned to tasks: regular crew,
//! flex workers, and coordinators. Each operator has skills, a recurring
//! weekly availability pattern, a duty status, and ordered task
//! preferences.
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering: A review of
//! applications, methods and models"

use serde::{Deserialize, Serialize};

use super::WeekDay;

/// A workforce member that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    /// Unique operator identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Workforce classification.
    pub operator_type: OperatorType,
    /// Current duty status. Only `Active` operators are schedulable.
    pub status: OperatorStatus,
    /// Skill names this operator holds.
    pub skills: Vec<String>,
    /// Recurring weekly availability pattern.
    pub availability: Availability,
    /// Task names in preference order (earlier = stronger preference).
    pub preferred_tasks: Vec<String>,
    /// Archived operators are kept for history but never scheduled.
    pub archived: bool,
}

/// Workforce classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorType {
    /// Permanent crew member.
    Regular,
    /// Flexible / temporary worker.
    Flex,
    /// Shift coordinator.
    Coordinator,
}

/// Duty status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorStatus {
    /// On duty and schedulable.
    Active,
    /// On sick leave.
    Sick,
    /// On planned leave.
    Leave,
}

/// Recurring weekly availability, one flag per work day.
///
/// Defaults to available on all five days — the absence of a
/// restriction means no restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    days: [bool; 5],
}

impl OperatorType {
    /// Short English label.
    pub fn label(self) -> &'static str {
        match self {
            OperatorType::Regular => "Regular",
            OperatorType::Flex => "Flex",
            OperatorType::Coordinator => "Coordinator",
        }
    }
}

impl OperatorStatus {
    /// Human-readable status phrase for messages.
    pub fn label(self) -> &'static str {
        match self {
            OperatorStatus::Active => "active",
            OperatorStatus::Sick => "on sick leave",
            OperatorStatus::Leave => "on leave",
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self { days: [true; 5] }
    }
}

impl Availability {
    /// Available on all five days.
    pub fn full_week() -> Self {
        Self::default()
    }

    /// Available only on the listed days.
    pub fn only(days: &[WeekDay]) -> Self {
        let mut a = Self { days: [false; 5] };
        for &day in days {
            a.days[day.index()] = true;
        }
        a
    }

    /// Whether the operator is available on a day.
    #[inline]
    pub fn is_available(&self, day: WeekDay) -> bool {
        self.days[day.index()]
    }

    /// Sets availability for a single day.
    pub fn set(&mut self, day: WeekDay, available: bool) {
        self.days[day.index()] = available;
    }

    /// Days marked available, in chronological order.
    pub fn available_days(&self) -> Vec<WeekDay> {
        WeekDay::ALL
            .iter()
            .copied()
            .filter(|d| self.is_available(*d))
            .collect()
    }
}

impl Operator {
    /// Creates a new active operator of the given type.
    pub fn new(id: impl Into<String>, operator_type: OperatorType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            operator_type,
            status: OperatorStatus::Active,
            skills: Vec::new(),
            availability: Availability::full_week(),
            preferred_tasks: Vec::new(),
            archived: false,
        }
    }

    /// Creates a regular operator.
    pub fn regular(id: impl Into<String>) -> Self {
        Self::new(id, OperatorType::Regular)
    }

    /// Creates a flex operator.
    pub fn flex(id: impl Into<String>) -> Self {
        Self::new(id, OperatorType::Flex)
    }

    /// Creates a coordinator.
    pub fn coordinator(id: impl Into<String>) -> Self {
        Self::new(id, OperatorType::Coordinator)
    }

    /// Sets the operator name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the duty status.
    pub fn with_status(mut self, status: OperatorStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Sets the weekly availability pattern.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Appends a task name to the preference list.
    pub fn with_preferred_task(mut self, task_name: impl Into<String>) -> Self {
        self.preferred_tasks.push(task_name.into());
        self
    }

    /// Sets the archived flag.
    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// Whether this operator holds a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Whether this operator may be scheduled at all (active, not archived).
    #[inline]
    pub fn is_schedulable(&self) -> bool {
        self.status == OperatorStatus::Active && !self.archived
    }

    /// Whether the weekly pattern allows work on a day.
    #[inline]
    pub fn can_work(&self, day: WeekDay) -> bool {
        self.availability.is_available(day)
    }

    /// Position of a task name in the preference list (0 = most preferred).
    pub fn preference_rank(&self, task_name: &str) -> Option<usize> {
        self.preferred_tasks.iter().position(|t| t == task_name)
    }
}
