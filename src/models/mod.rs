//! Rostering domain models.
//!
//! Provides the core data types for weekly workforce planning: the
//! roster (operators, tasks), the user-authored configuration (rules,
//! exclusions, templates), the assignment grid, and the derived
//! artifacts (resolved requirements, conflicts, resolutions).
//!
//! # Domain Mappings
//!
//! | u-roster | Manufacturing | Healthcare | Retail |
//! |----------|--------------|------------|--------|
//! | Operator | Line Worker | Nurse | Clerk |
//! | TaskType | Workstation | Ward Duty | Counter |
//! | WeeklyPlanningConfig | Shift Plan Rules | Coverage Rules | Store Plan |
//! | ScheduleAssignment | Shift Slot | Duty Slot | Shift Slot |

mod assignment;
mod config;
mod conflict;
mod exclusion;
mod operator;
mod requirement;
mod rule;
mod task;
mod week;

pub use assignment::{
    assignment_at, assignments_for_day, assignments_for_operator, crew_for_task, sort_assignments,
    week_load, ScheduleAssignment,
};
pub use config::{PlanningTemplate, WeeklyPlanningConfig};
pub use conflict::{
    blocking, warnings, ConflictKind, ConflictResolution, ResolutionAction, ScheduleConflict,
};
pub use exclusion::{excluded_on_day, ExclusionReason, OperatorExclusion, WeeklyExclusions};
pub use operator::{Availability, Operator, OperatorStatus, OperatorType};
pub(crate) use requirement::RequirementExpr;
pub use requirement::{
    alternative_total, demand_allowance, effective_capacity, pairings_for_day, staffing_for_day,
    PairingConstraint, ResolvedRequirement, StaffingDemand, StaffingRequirement, UnmetDemand,
};
pub use rule::{
    Conjunction, NumericStaffingRule, OperatorPairingRule, PairPreference, PlanningRule,
    RequiredType, SkillRequirement,
};
pub use task::{TaskType, DEFAULT_REQUIRED_OPERATORS};
pub use week::WeekDay;
