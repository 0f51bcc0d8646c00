//! Conflict and resolution models.
//!
//! A conflict is a finding about an assignment grid: either a blocking
//! violation (double assignment, skill mismatch, unavailable operator,
//! understaffed requirement) or a soft warning (overstaffing, unmet
//! pairing preferences). Conflicts are ephemeral — recomputed from the
//! grid on demand, never stored.
//!
//! Conflict ids are derived from content (`kind:day:operator:task:rule`),
//! so identical grids always yield identical conflict lists.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{UnmetDemand, WeekDay};

/// Classification of grid findings.
///
/// Declaration order is the display order within a day. The first four
/// kinds block publishing; the rest are warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Operator holds more than one task on the same day.
    DoubleAssignment,
    /// Operator cannot work the day (pattern, exclusion, status, or unknown).
    Availability,
    /// Operator lacks the task's required skill.
    SkillMismatch,
    /// A staffing requirement has no fully covered alternative.
    Understaffed,
    /// More operators on a task than its day justifies.
    Overstaffed,
    /// A keep-apart rule's operators share a task.
    SeparationViolated,
    /// A keep-together rule's operators do not share a task.
    PairingUnmet,
}

impl ConflictKind {
    /// Severity on a 0-100 scale (higher = worse).
    pub fn severity(self) -> i32 {
        match self {
            ConflictKind::DoubleAssignment => 90,
            ConflictKind::Availability => 85,
            ConflictKind::SkillMismatch => 80,
            ConflictKind::Understaffed => 70,
            ConflictKind::Overstaffed => 40,
            ConflictKind::SeparationViolated => 35,
            ConflictKind::PairingUnmet => 25,
        }
    }

    /// Whether this kind blocks publishing the week.
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            ConflictKind::DoubleAssignment
                | ConflictKind::Availability
                | ConflictKind::SkillMismatch
                | ConflictKind::Understaffed
        )
    }

    /// Stable slug used in conflict ids.
    pub fn slug(self) -> &'static str {
        match self {
            ConflictKind::DoubleAssignment => "double",
            ConflictKind::Availability => "availability",
            ConflictKind::SkillMismatch => "skill",
            ConflictKind::Understaffed => "understaffed",
            ConflictKind::Overstaffed => "overstaffed",
            ConflictKind::SeparationViolated => "separation",
            ConflictKind::PairingUnmet => "pairing",
        }
    }
}

/// A finding about an assignment grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    /// Content-derived identifier, stable across re-detection.
    pub id: String,
    /// What kind of finding this is.
    pub kind: ConflictKind,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
    /// Day of the finding.
    pub day: WeekDay,
    /// Involved operator, if the finding is operator-scoped.
    pub operator_id: Option<String>,
    /// Operator name for display.
    pub operator_name: Option<String>,
    /// Involved task, if the finding is task-scoped.
    pub task_id: Option<String>,
    /// Task name for display.
    pub task_name: Option<String>,
    /// Rule behind the finding, for requirement- and pairing-scoped kinds.
    pub rule_id: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Unfilled demands behind an understaffed finding. Empty otherwise.
    pub shortfalls: Vec<UnmetDemand>,
}

impl ScheduleConflict {
    fn compose(
        kind: ConflictKind,
        day: WeekDay,
        operator: Option<(String, String)>,
        task: Option<(String, String)>,
        rule_id: Option<String>,
        message: String,
    ) -> Self {
        let (operator_id, operator_name) = match operator {
            Some((id, name)) => (Some(id), Some(name)),
            None => (None, None),
        };
        let (task_id, task_name) = match task {
            Some((id, name)) => (Some(id), Some(name)),
            None => (None, None),
        };
        let id = format!(
            "{}:{}:{}:{}:{}",
            kind.slug(),
            day.label().to_ascii_lowercase(),
            operator_id.as_deref().unwrap_or("-"),
            task_id.as_deref().unwrap_or("-"),
            rule_id.as_deref().unwrap_or("-"),
        );
        Self {
            id,
            kind,
            severity: kind.severity(),
            day,
            operator_id,
            operator_name,
            task_id,
            task_name,
            rule_id,
            message,
            shortfalls: Vec::new(),
        }
    }

    /// Creates a double-assignment conflict.
    pub fn double_assignment(
        day: WeekDay,
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::compose(
            ConflictKind::DoubleAssignment,
            day,
            Some((operator_id.into(), operator_name.into())),
            None,
            None,
            message.into(),
        )
    }

    /// Creates an availability conflict.
    pub fn availability(
        day: WeekDay,
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::compose(
            ConflictKind::Availability,
            day,
            Some((operator_id.into(), operator_name.into())),
            Some((task_id.into(), task_name.into())),
            None,
            message.into(),
        )
    }

    /// Creates a skill-mismatch conflict.
    pub fn skill_mismatch(
        day: WeekDay,
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::compose(
            ConflictKind::SkillMismatch,
            day,
            Some((operator_id.into(), operator_name.into())),
            Some((task_id.into(), task_name.into())),
            None,
            message.into(),
        )
    }

    /// Creates an understaffed conflict carrying its unfilled demands.
    pub fn understaffed(
        day: WeekDay,
        rule_id: impl Into<String>,
        shortfalls: Vec<UnmetDemand>,
        message: impl Into<String>,
    ) -> Self {
        let mut conflict = Self::compose(
            ConflictKind::Understaffed,
            day,
            None,
            None,
            Some(rule_id.into()),
            message.into(),
        );
        conflict.shortfalls = shortfalls;
        conflict
    }

    /// Creates an overstaffed warning.
    pub fn overstaffed(
        day: WeekDay,
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::compose(
            ConflictKind::Overstaffed,
            day,
            None,
            Some((task_id.into(), task_name.into())),
            None,
            message.into(),
        )
    }

    /// Creates an unmet keep-together warning.
    pub fn pairing_unmet(
        day: WeekDay,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::compose(
            ConflictKind::PairingUnmet,
            day,
            None,
            None,
            Some(rule_id.into()),
            message.into(),
        )
    }

    /// Creates a violated keep-apart warning.
    pub fn separation_violated(
        day: WeekDay,
        rule_id: impl Into<String>,
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::compose(
            ConflictKind::SeparationViolated,
            day,
            None,
            Some((task_id.into(), task_name.into())),
            Some(rule_id.into()),
            message.into(),
        )
    }

    /// Whether this conflict blocks publishing the week.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }
}

/// Conflicts that block publishing.
pub fn blocking(conflicts: &[ScheduleConflict]) -> Vec<&ScheduleConflict> {
    conflicts.iter().filter(|c| c.is_blocking()).collect()
}

/// Soft warnings.
pub fn warnings(conflicts: &[ScheduleConflict]) -> Vec<&ScheduleConflict> {
    conflicts.iter().filter(|c| !c.is_blocking()).collect()
}

/// A proposed fix for one conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    /// Conflict this resolution targets.
    pub conflict_id: String,
    /// Grid edits to apply, in order.
    pub actions: Vec<ResolutionAction>,
    /// New issues this fix knowingly creates.
    pub introduces: Vec<String>,
    /// Heuristic confidence (0-100, higher = safer bet).
    pub confidence: u8,
}

impl ConflictResolution {
    /// Creates an empty resolution for a conflict.
    pub fn new(conflict_id: impl Into<String>, confidence: u8) -> Self {
        Self {
            conflict_id: conflict_id.into(),
            actions: Vec::new(),
            introduces: Vec::new(),
            confidence: confidence.min(100),
        }
    }

    /// Appends a grid edit.
    pub fn with_action(mut self, action: ResolutionAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Declares a side effect the fix knowingly creates.
    pub fn with_caveat(mut self, caveat: impl Into<String>) -> Self {
        self.introduces.push(caveat.into());
        self
    }
}

/// One grid edit inside a resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolutionAction {
    /// Remove an existing assignment.
    Remove {
        operator_id: String,
        day: WeekDay,
        task_id: String,
    },
    /// Add a new assignment.
    Add {
        operator_id: String,
        day: WeekDay,
        task_id: String,
    },
    /// Move an operator between tasks on the same day.
    Move {
        operator_id: String,
        day: WeekDay,
        from_task_id: String,
        to_task_id: String,
    },
    /// Lower a staffing rule's demand to an achievable count.
    ///
    /// Never touches the grid; the rule itself must be edited by hand.
    RelaxRequirement {
        day: WeekDay,
        rule_id: String,
        skill: String,
        required: u32,
        proposed: u32,
    },
}

impl ResolutionAction {
    /// Creates a remove action.
    pub fn remove(operator_id: impl Into<String>, day: WeekDay, task_id: impl Into<String>) -> Self {
        Self::Remove {
            operator_id: operator_id.into(),
            day,
            task_id: task_id.into(),
        }
    }

    /// Creates an add action.
    pub fn add(operator_id: impl Into<String>, day: WeekDay, task_id: impl Into<String>) -> Self {
        Self::Add {
            operator_id: operator_id.into(),
            day,
            task_id: task_id.into(),
        }
    }

    /// Creates a move action.
    pub fn relocate(
        operator_id: impl Into<String>,
        day: WeekDay,
        from_task_id: impl Into<String>,
        to_task_id: impl Into<String>,
    ) -> Self {
        Self::Move {
            operator_id: operator_id.into(),
            day,
            from_task_id: from_task_id.into(),
            to_task_id: to_task_id.into(),
        }
    }
}

impl fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionAction::Remove {
                operator_id,
                day,
                task_id,
            } => write!(f, "remove {operator_id} from {task_id} on {day}"),
            ResolutionAction::Add {
                operator_id,
                day,
                task_id,
            } => write!(f, "assign {operator_id} to {task_id} on {day}"),
            ResolutionAction::Move {
                operator_id,
                day,
                from_task_id,
                to_task_id,
            } => write!(
                f,
                "move {operator_id} from {from_task_id} to {to_task_id} on {day}"
            ),
            ResolutionAction::RelaxRequirement {
                day,
                rule_id,
                skill,
                required,
                proposed,
            } => write!(
                f,
                "lower the {skill} demand of rule {rule_id} from {required} to {proposed} on {day} (manual rule edit)"
            ),
        }
    }
}
