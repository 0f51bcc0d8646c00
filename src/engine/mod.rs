//! Auto-fill engine and roster quality metrics.
//!
//! Provides the greedy weekly fill ("smart fill") and coverage/fairness KPIs.
//!
//! # Algorithm
//!
//! `SmartFill` uses a greedy, cheapest-requirement-first, preference-aware
//! heuristic. It fills each day independently, never moves assignments that
//! were already on the grid, and reports what it could not staff instead of
//! failing. It is not optimal, but produces fast, reproducible baselines.
//!
//! # KPI
//!
//! `RosterKpi` computes coverage and workload-balance metrics from a fill
//! result.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The state of the art of nurse rostering"

mod fill;
mod kpi;

pub use fill::{run_smart_fill, FillRequest, FillResult, SmartFill};
pub use kpi::RosterKpi;
