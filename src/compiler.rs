//! Rule compiler.
//!
//! Turns a weekly planning configuration into concrete per-day
//! requirements. Numeric rules are parsed into an expression tree
//! (`And` binds tighter than `Or`), flattened to alternatives of
//! additive demand groups, and resolved against the task catalog:
//! each demand's skill becomes the sorted list of task ids providing
//! it, minus the week's excluded tasks.
//!
//! Stale references never fail compilation. A rule naming an unknown
//! skill or operator is dropped with a warning; a demand whose tasks
//! were all excluded for the week is dropped quietly (exclusion is a
//! deliberate user action).

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::models::{
    NumericStaffingRule, Operator, OperatorPairingRule, PairingConstraint, PlanningRule,
    RequirementExpr, ResolvedRequirement, SkillRequirement, StaffingDemand, StaffingRequirement,
    TaskType, WeekDay, WeeklyExclusions, WeeklyPlanningConfig,
};

/// Compiles a weekly configuration into per-day requirements.
///
/// The roster is consulted only to drop rules referencing operators
/// that no longer exist; exclusions are consulted only to warn on stale
/// operator references. Both stay out of the compiled output — the
/// engine and detector read them directly.
pub fn compile_requirements(
    config: &WeeklyPlanningConfig,
    exclusions: &WeeklyExclusions,
    tasks: &[TaskType],
    operators: &[Operator],
) -> Vec<ResolvedRequirement> {
    let mut available: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut known_skills: HashSet<&str> = HashSet::new();
    for task in tasks {
        known_skills.insert(task.required_skill.as_str());
        if !config.is_task_excluded(&task.id) {
            available
                .entry(task.required_skill.as_str())
                .or_default()
                .push(task.id.clone());
        }
    }
    for ids in available.values_mut() {
        ids.sort_unstable();
    }

    let mut out = Vec::new();
    for rule in &config.rules {
        if !rule.is_enabled() {
            debug!(rule = %rule.id(), "rule disabled, skipped");
            continue;
        }
        match rule {
            PlanningRule::Numeric(numeric) => {
                compile_numeric(numeric, &available, &known_skills, &mut out)
            }
            PlanningRule::Pairing(pairing) => {
                compile_pairing(pairing, &available, &known_skills, operators, &mut out)
            }
        }
    }

    for exclusion in &exclusions.exclusions {
        if !operators.iter().any(|o| o.id == exclusion.operator_id) {
            warn!(operator = %exclusion.operator_id, "exclusion references unknown operator");
        }
    }

    out
}

fn compile_numeric(
    rule: &NumericStaffingRule,
    available: &BTreeMap<&str, Vec<String>>,
    known_skills: &HashSet<&str>,
    out: &mut Vec<ResolvedRequirement>,
) {
    let entries: Vec<SkillRequirement> = rule
        .requirements
        .iter()
        .filter(|e| {
            if e.count == 0 {
                warn!(rule = %rule.id, skill = %e.skill, "zero-count entry dropped");
            }
            e.count > 0
        })
        .cloned()
        .collect();

    if let Some(stale) = entries.iter().find(|e| !known_skills.contains(e.skill.as_str())) {
        warn!(
            rule = %rule.id,
            skill = %stale.skill,
            "staffing rule references a skill no task provides, rule skipped"
        );
        return;
    }

    let Some(expr) = RequirementExpr::from_chain(&entries) else {
        warn!(rule = %rule.id, "staffing rule has no usable entries, skipped");
        return;
    };

    let mut alternatives: Vec<Vec<StaffingDemand>> = Vec::new();
    for group in expr.alternatives() {
        let mut demands: Vec<StaffingDemand> = Vec::new();
        for entry in group {
            let task_ids = available
                .get(entry.skill.as_str())
                .cloned()
                .unwrap_or_default();
            if task_ids.is_empty() {
                debug!(
                    rule = %rule.id,
                    skill = %entry.skill,
                    "all tasks for skill excluded this week, demand dropped"
                );
                continue;
            }
            demands.push(StaffingDemand {
                required_type: entry.required_type,
                skill: entry.skill,
                count: entry.count,
                task_ids,
            });
        }
        // Exact-type demands claim operators before Any demands do.
        demands.sort_by_key(|d| d.required_type.is_any());
        if !demands.is_empty() {
            alternatives.push(demands);
        }
    }

    if alternatives.is_empty() {
        debug!(rule = %rule.id, "no demands remain after task exclusions, rule skipped");
        return;
    }

    for day in canonical_days(&rule.selected_days) {
        out.push(ResolvedRequirement::Staffing(StaffingRequirement {
            day,
            rule_id: rule.id.clone(),
            alternatives: alternatives.clone(),
        }));
    }
}

fn compile_pairing(
    rule: &OperatorPairingRule,
    available: &BTreeMap<&str, Vec<String>>,
    known_skills: &HashSet<&str>,
    operators: &[Operator],
    out: &mut Vec<ResolvedRequirement>,
) {
    let mut seen = HashSet::new();
    let operator_ids: Vec<String> = rule
        .operator_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    if operator_ids.is_empty() {
        warn!(rule = %rule.id, "pairing rule names no operators, skipped");
        return;
    }
    if let Some(stale) = operator_ids
        .iter()
        .find(|id| !operators.iter().any(|o| &o.id == *id && !o.archived))
    {
        warn!(
            rule = %rule.id,
            operator = %stale,
            "pairing rule references an unknown or archived operator, skipped"
        );
        return;
    }
    if operator_ids.len() == 1 && rule.skill.is_none() {
        warn!(rule = %rule.id, "single-operator pairing rule without a skill, skipped");
        return;
    }
    if let Some(skill) = &rule.skill {
        if !known_skills.contains(skill.as_str()) {
            warn!(
                rule = %rule.id,
                skill = %skill,
                "pairing rule references a skill no task provides, skipped"
            );
            return;
        }
        if available.get(skill.as_str()).map_or(true, Vec::is_empty) {
            debug!(
                rule = %rule.id,
                skill = %skill,
                "all tasks for skill excluded this week, rule skipped"
            );
            return;
        }
    }

    for day in canonical_days(&rule.selected_days) {
        out.push(ResolvedRequirement::Pairing(PairingConstraint {
            day,
            rule_id: rule.id.clone(),
            operator_ids: operator_ids.clone(),
            preference: rule.preference,
            skill: rule.skill.clone(),
        }));
    }
}

/// Normalizes a day selection: empty means every day; duplicates
/// collapse; output is chronological regardless of input order.
fn canonical_days(selected: &[WeekDay]) -> Vec<WeekDay> {
    if selected.is_empty() {
        return WeekDay::ALL.to_vec();
    }
    let mut days = selected.to_vec();
    days.sort_unstable();
    days.dedup();
    days
}
