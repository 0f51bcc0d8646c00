//! Roster quality metrics (KPIs).
//!
//! Computes coverage and workload-balance indicators from a completed
//! fill and its inputs.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage | Filled demand slots / total demand slots |
//! | Unmet Count | Operators still missing across all demands |
//! | Load Spread | Max minus min week load over schedulable operators |
//! | Idle Operators | Schedulable operators with no assignment all week |
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering", §2: modelling
//! and evaluation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{week_load, Operator, ResolvedRequirement, UnmetDemand};

use super::FillResult;

/// Roster performance indicators.
///
/// Demand slots are counted against each requirement's cheapest
/// alternative, matching what the fill engine aims for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterKpi {
    /// Assignments on the grid.
    pub assignment_count: usize,
    /// Total headcount the requirements ask for.
    pub demand_slots: u32,
    /// Operators still missing across all unmet demands.
    pub unmet_count: u32,
    /// Filled fraction of the demanded headcount (0.0..1.0).
    pub coverage: f64,
    /// Days worked per schedulable operator, idle ones included.
    pub load_by_operator: HashMap<String, usize>,
    /// Max minus min week load across schedulable operators.
    pub load_spread: usize,
    /// Schedulable operators with no assignment all week, sorted by id.
    pub idle_operators: Vec<String>,
}

impl RosterKpi {
    /// Computes KPIs from a fill result and its inputs.
    ///
    /// # Arguments
    /// * `result` - The completed fill.
    /// * `operators` - The roster the fill drew from.
    /// * `requirements` - The compiled requirements it filled against.
    pub fn calculate(
        result: &FillResult,
        operators: &[Operator],
        requirements: &[ResolvedRequirement],
    ) -> Self {
        let demand_slots: u32 = requirements
            .iter()
            .filter_map(|r| match r {
                ResolvedRequirement::Staffing(s) => Some(s.min_headcount()),
                ResolvedRequirement::Pairing(_) => None,
            })
            .sum();

        let unmet_count: u32 = result.unmet.iter().map(UnmetDemand::missing).sum();

        let coverage = if demand_slots == 0 {
            1.0
        } else {
            f64::from(demand_slots.saturating_sub(unmet_count)) / f64::from(demand_slots)
        };

        let mut load_by_operator: HashMap<String, usize> = HashMap::new();
        let mut idle_operators: Vec<String> = Vec::new();
        let mut min_load = usize::MAX;
        let mut max_load = 0usize;
        for operator in operators.iter().filter(|o| o.is_schedulable()) {
            let load = week_load(&result.assignments, &operator.id);
            min_load = min_load.min(load);
            max_load = max_load.max(load);
            if load == 0 {
                idle_operators.push(operator.id.clone());
            }
            load_by_operator.insert(operator.id.clone(), load);
        }
        idle_operators.sort_unstable();

        let load_spread = if load_by_operator.is_empty() {
            0
        } else {
            max_load - min_load
        };

        Self {
            assignment_count: result.assignments.len(),
            demand_slots,
            unmet_count,
            coverage,
            load_by_operator,
            load_spread,
            idle_operators,
        }
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_load_spread: usize) -> bool {
        self.coverage >= min_coverage && self.load_spread <= max_load_spread
    }
}
