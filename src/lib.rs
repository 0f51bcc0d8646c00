//! Workforce rostering core for the U-Engine ecosystem.
//!
//! Provides weekly planning models, a staffing-rule compiler, a greedy
//! auto-fill engine, conflict detection, and ranked conflict resolutions.
//! This crate contains only rostering domain logic — persistence, undo
//! history, and exports live in the consuming application.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Operator`, `TaskType`, `ScheduleAssignment`,
//!   `WeeklyPlanningConfig`, `WeeklyExclusions`, `ScheduleConflict`
//! - **`compiler`**: Weekly planning rules → per-day resolved requirements
//! - **`engine`**: Deterministic auto-fill over the five-day grid, plus KPIs
//! - **`detector`**: Pure re-validation of any grid into a conflict list
//! - **`resolution`**: Ranked fix proposals and their application
//! - **`validation`**: Input integrity checks (duplicate IDs, stale references)
//!
//! # Architecture
//!
//! Every entry point is a pure function over snapshots: compile, fill,
//! detect, propose, apply. Nothing here mutates its inputs or talks to
//! storage; the consumer owns transactions and the edit history, and
//! re-runs detection after every grid change.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

pub mod compiler;
pub mod detector;
pub mod engine;
pub mod models;
pub mod resolution;
pub mod validation;
