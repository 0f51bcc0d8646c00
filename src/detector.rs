//! Conflict detection over an assignment grid.
//!
//! Pure re-validation: the detector never edits the grid, and any grid
//! is acceptable input. Manual edits, stale operator ids, and unknown
//! tasks come out as conflicts, never as errors. The checks match what
//! the fill engine satisfies by construction, so a freshly filled
//! feasible week re-validates clean.
//!
//! # Checks
//!
//! | Kind | Scope | Blocking |
//! |------|-------|----------|
//! | DoubleAssignment | operator × day | yes |
//! | Availability | assignment | yes |
//! | SkillMismatch | assignment | yes |
//! | Understaffed | rule × day | yes |
//! | Overstaffed | task × day | no |
//! | SeparationViolated | rule × task × day | no |
//! | PairingUnmet | rule × day | no |
//!
//! Output is sorted by `(day, kind, operator, task, rule)`, so identical
//! grids always produce identical conflict lists.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::models::{
    alternative_total, effective_capacity, excluded_on_day, pairings_for_day, staffing_for_day,
    Operator, OperatorExclusion, OperatorStatus, PairPreference, ResolvedRequirement,
    ScheduleAssignment, ScheduleConflict, StaffingDemand, TaskType, UnmetDemand, WeekDay,
};

/// Validates a grid against the roster, catalog, and compiled rules.
///
/// Exact duplicate rows are collapsed before checking, so a repeated
/// identical assignment is not reported as a double booking.
pub fn detect_conflicts(
    grid: &[ScheduleAssignment],
    operators: &[Operator],
    tasks: &[TaskType],
    requirements: &[ResolvedRequirement],
    exclusions: &[OperatorExclusion],
) -> Vec<ScheduleConflict> {
    let operator_index: HashMap<&str, &Operator> =
        operators.iter().map(|o| (o.id.as_str(), o)).collect();
    let task_index: HashMap<&str, &TaskType> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut week: Vec<&ScheduleAssignment> = Vec::new();
    {
        let mut seen: HashSet<&ScheduleAssignment> = HashSet::new();
        for assignment in grid {
            if seen.insert(assignment) {
                week.push(assignment);
            }
        }
    }

    let mut conflicts: Vec<ScheduleConflict> = Vec::new();
    for day in WeekDay::ALL {
        let rows: Vec<&ScheduleAssignment> =
            week.iter().copied().filter(|a| a.day == day).collect();

        check_double_assignments(day, &rows, &operator_index, &mut conflicts);
        check_rows(day, &rows, &operator_index, &task_index, exclusions, &mut conflicts);
        check_staffing(day, &rows, requirements, &operator_index, &mut conflicts);
        check_overstaffing(day, &rows, requirements, &task_index, &mut conflicts);
        check_pairings(day, &rows, requirements, &task_index, &mut conflicts);
    }

    conflicts.sort_by(|a, b| {
        (a.day, a.kind, &a.operator_id, &a.task_id, &a.rule_id)
            .cmp(&(b.day, b.kind, &b.operator_id, &b.task_id, &b.rule_id))
    });

    debug!(
        total = conflicts.len(),
        blocking = conflicts.iter().filter(|c| c.is_blocking()).count(),
        "grid checked"
    );
    conflicts
}

fn operator_label(operator: &Operator) -> &str {
    if operator.name.is_empty() {
        &operator.id
    } else {
        &operator.name
    }
}

fn task_label(task: &TaskType) -> &str {
    if task.name.is_empty() {
        &task.id
    } else {
        &task.name
    }
}

fn check_double_assignments(
    day: WeekDay,
    rows: &[&ScheduleAssignment],
    operator_index: &HashMap<&str, &Operator>,
    out: &mut Vec<ScheduleConflict>,
) {
    let mut by_operator: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for row in rows {
        by_operator
            .entry(row.operator_id.as_str())
            .or_default()
            .push(row.task_id.as_str());
    }
    for (operator_id, mut task_ids) in by_operator {
        if task_ids.len() < 2 {
            continue;
        }
        task_ids.sort_unstable();
        let name = operator_index
            .get(operator_id)
            .map_or(operator_id, |o| operator_label(o));
        out.push(ScheduleConflict::double_assignment(
            day,
            operator_id,
            name,
            format!(
                "{name} holds {} tasks on {day}: {}",
                task_ids.len(),
                task_ids.join(", ")
            ),
        ));
    }
}

fn check_rows(
    day: WeekDay,
    rows: &[&ScheduleAssignment],
    operator_index: &HashMap<&str, &Operator>,
    task_index: &HashMap<&str, &TaskType>,
    exclusions: &[OperatorExclusion],
    out: &mut Vec<ScheduleConflict>,
) {
    for row in rows {
        let operator = operator_index.get(row.operator_id.as_str()).copied();
        let task = task_index.get(row.task_id.as_str()).copied();
        let task_name = task.map_or(row.task_id.as_str(), task_label);

        // Availability: at most one finding per assignment, worst reason first.
        match operator {
            None => out.push(ScheduleConflict::availability(
                day,
                &row.operator_id,
                &row.operator_id,
                &row.task_id,
                task_name,
                format!("operator {} is not in the roster", row.operator_id),
            )),
            Some(op) => {
                let name = operator_label(op);
                let reason = if op.archived {
                    Some(format!("{name} is archived"))
                } else if op.status != OperatorStatus::Active {
                    Some(format!("{name} is {} this week", op.status.label()))
                } else if !op.can_work(day) {
                    Some(format!("{name} does not work on {day}"))
                } else {
                    excluded_on_day(exclusions, &op.id, day)
                        .map(|e| format!("{name} is excluded on {day} ({})", e.reason.label()))
                };
                if let Some(message) = reason {
                    out.push(ScheduleConflict::availability(
                        day,
                        &op.id,
                        name,
                        &row.task_id,
                        task_name,
                        message,
                    ));
                }

                // Skill: unknown tasks are a mismatch in their own right.
                match task {
                    None => out.push(ScheduleConflict::skill_mismatch(
                        day,
                        &op.id,
                        name,
                        &row.task_id,
                        &row.task_id,
                        format!("task {} is not in this week's catalog", row.task_id),
                    )),
                    Some(t) => {
                        if !op.has_skill(&t.required_skill) {
                            out.push(ScheduleConflict::skill_mismatch(
                                day,
                                &op.id,
                                name,
                                &t.id,
                                task_label(t),
                                format!(
                                    "{name} lacks the {} skill required by {}",
                                    t.required_skill,
                                    task_label(t)
                                ),
                            ));
                        }
                    }
                }
            }
        }
    }
}

fn check_staffing(
    day: WeekDay,
    rows: &[&ScheduleAssignment],
    requirements: &[ResolvedRequirement],
    operator_index: &HashMap<&str, &Operator>,
    out: &mut Vec<ScheduleConflict>,
) {
    for req in staffing_for_day(requirements, day) {
        let mut order: Vec<usize> = (0..req.alternatives.len()).collect();
        order.sort_by_key(|&i| alternative_total(&req.alternatives[i]));

        // The best-covered alternative decides; same traversal as the engine.
        let mut best: Option<Vec<UnmetDemand>> = None;
        for i in order {
            let unmet =
                coverage_shortfalls(&req.alternatives[i], &req.rule_id, day, rows, operator_index);
            let total: u32 = unmet.iter().map(UnmetDemand::missing).sum();
            let best_total =
                best.as_ref().map(|b| b.iter().map(UnmetDemand::missing).sum::<u32>());
            match best_total {
                Some(t) if t <= total => {}
                _ => best = Some(unmet),
            }
            if total == 0 {
                break;
            }
        }

        if let Some(shortfalls) = best {
            if shortfalls.is_empty() {
                continue;
            }
            let missing: u32 = shortfalls.iter().map(UnmetDemand::missing).sum();
            out.push(ScheduleConflict::understaffed(
                day,
                &req.rule_id,
                shortfalls,
                format!("rule {} needs {missing} more operator(s) on {day}", req.rule_id),
            ));
        }
    }
}

/// Coverage check for one demand group: which demands the day's
/// assignments fail to cover. Each assigned operator counts toward at
/// most one demand, exactly as the engine allocates them.
fn coverage_shortfalls(
    demands: &[StaffingDemand],
    rule_id: &str,
    day: WeekDay,
    rows: &[&ScheduleAssignment],
    operator_index: &HashMap<&str, &Operator>,
) -> Vec<UnmetDemand> {
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut unmet = Vec::new();

    for demand in demands {
        let mut present: Vec<&str> = rows
            .iter()
            .filter(|a| demand.task_ids.contains(&a.task_id))
            .map(|a| a.operator_id.as_str())
            .filter(|id| !claimed.contains(id))
            .filter(|id| {
                operator_index.get(id).map_or(false, |o| {
                    demand.required_type.matches(o.operator_type) && o.has_skill(&demand.skill)
                })
            })
            .collect();
        present.sort_unstable();
        present.dedup();

        let covered = (present.len() as u32).min(demand.count);
        for id in present.iter().take(covered as usize) {
            claimed.insert(id);
        }
        if covered < demand.count {
            unmet.push(UnmetDemand {
                day,
                rule_id: rule_id.to_string(),
                required_type: demand.required_type,
                skill: demand.skill.clone(),
                task_ids: demand.task_ids.clone(),
                required: demand.count,
                assigned: covered,
            });
        }
    }

    unmet
}

fn check_overstaffing(
    day: WeekDay,
    rows: &[&ScheduleAssignment],
    requirements: &[ResolvedRequirement],
    task_index: &HashMap<&str, &TaskType>,
    out: &mut Vec<ScheduleConflict>,
) {
    let mut task_ids: Vec<&str> = rows.iter().map(|a| a.task_id.as_str()).collect();
    task_ids.sort_unstable();
    task_ids.dedup();

    for task_id in task_ids {
        // Unknown tasks are already a skill finding; no seat count exists.
        let Some(task) = task_index.get(task_id).copied() else {
            continue;
        };
        let mut crew: Vec<&str> = rows
            .iter()
            .filter(|a| a.task_id == task_id)
            .map(|a| a.operator_id.as_str())
            .collect();
        crew.sort_unstable();
        crew.dedup();

        let capacity = effective_capacity(task, requirements, day);
        if crew.len() as u32 > capacity {
            out.push(ScheduleConflict::overstaffed(
                day,
                &task.id,
                task_label(task),
                format!(
                    "{} has {} operators for {capacity} seat(s) on {day}",
                    task_label(task),
                    crew.len()
                ),
            ));
        }
    }
}

fn check_pairings(
    day: WeekDay,
    rows: &[&ScheduleAssignment],
    requirements: &[ResolvedRequirement],
    task_index: &HashMap<&str, &TaskType>,
    out: &mut Vec<ScheduleConflict>,
) {
    for constraint in pairings_for_day(requirements, day) {
        let in_scope = |task_id: &str| match &constraint.skill {
            Some(skill) => task_index
                .get(task_id)
                .map_or(false, |t| &t.required_skill == skill),
            None => true,
        };

        let mut member_ids: Vec<&str> =
            constraint.operator_ids.iter().map(String::as_str).collect();
        member_ids.sort_unstable();
        member_ids.dedup();

        // First assignment per member; double bookings are reported elsewhere.
        let member_tasks: Vec<(&str, &str)> = member_ids
            .iter()
            .filter_map(|id| {
                rows.iter()
                    .find(|a| a.operator_id == *id)
                    .map(|a| (*id, a.task_id.as_str()))
            })
            .collect();

        match constraint.preference {
            PairPreference::Want => {
                if member_ids.len() == 1 {
                    let Some(skill) = &constraint.skill else {
                        continue;
                    };
                    if let Some((op, task)) = member_tasks.first() {
                        if !in_scope(task) {
                            out.push(ScheduleConflict::pairing_unmet(
                                day,
                                &constraint.rule_id,
                                format!(
                                    "operator {op} works {task} on {day} instead of a {skill} task"
                                ),
                            ));
                        }
                    }
                    continue;
                }

                let relevant: Vec<&(&str, &str)> =
                    member_tasks.iter().filter(|(_, t)| in_scope(t)).collect();
                if relevant.len() < 2 {
                    continue;
                }
                let first = relevant[0].1;
                if relevant.iter().any(|(_, t)| *t != first) {
                    let names: Vec<&str> = relevant.iter().map(|(o, _)| *o).collect();
                    out.push(ScheduleConflict::pairing_unmet(
                        day,
                        &constraint.rule_id,
                        format!("operators {} work apart on {day}", names.join(", ")),
                    ));
                }
            }
            PairPreference::DontWant => {
                let mut shared: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for (op, task) in &member_tasks {
                    if in_scope(task) {
                        shared.entry(task).or_default().push(op);
                    }
                }
                let single = member_ids.len() == 1;
                for (task_id, members) in shared {
                    if members.len() < 2 && !single {
                        continue;
                    }
                    let task_name = task_index.get(task_id).map_or(task_id, |t| task_label(t));
                    let message = if single {
                        format!("operator {} should stay off {task_name} on {day}", members[0])
                    } else {
                        format!(
                            "operators {} share {task_name} on {day}",
                            members.join(", ")
                        )
                    };
                    out.push(ScheduleConflict::separation_violated(
                        day,
                        &constraint.rule_id,
                        task_id,
                        task_name,
                        message,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_smart_fill;
    use crate::models::{
        ConflictKind, ExclusionReason, OperatorType, PairingConstraint, RequiredType,
        StaffingRequirement,
    };

    fn make_tasks() -> Vec<TaskType> {
        vec![
            TaskType::new("task-pack", "Packing").with_name("Packing Line"),
            TaskType::new("task-wrap", "Packing").with_name("Wrapping"),
            TaskType::new("task-qa", "Inspection").with_name("Quality Control"),
        ]
    }

    fn make_operators() -> Vec<Operator> {
        vec![
            Operator::regular("op-a").with_name("Anna").with_skill("Packing"),
            Operator::flex("op-b").with_name("Ben").with_skill("Packing"),
            Operator::regular("op-c")
                .with_name("Cara")
                .with_skill("Inspection"),
        ]
    }

    fn demand(required_type: RequiredType, skill: &str, count: u32, task_ids: &[&str]) -> StaffingDemand {
        StaffingDemand {
            required_type,
            skill: skill.into(),
            count,
            task_ids: task_ids.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn staffing(day: WeekDay, rule_id: &str, alternatives: Vec<Vec<StaffingDemand>>) -> ResolvedRequirement {
        ResolvedRequirement::Staffing(StaffingRequirement {
            day,
            rule_id: rule_id.into(),
            alternatives,
        })
    }

    fn pairing(
        day: WeekDay,
        rule_id: &str,
        preference: PairPreference,
        operator_ids: &[&str],
        skill: Option<&str>,
    ) -> ResolvedRequirement {
        ResolvedRequirement::Pairing(PairingConstraint {
            day,
            rule_id: rule_id.into(),
            operator_ids: operator_ids.iter().map(|o| o.to_string()).collect(),
            preference,
            skill: skill.map(String::from),
        })
    }

    #[test]
    fn test_engine_output_revalidates_clean() {
        let requirements = vec![
            staffing(
                WeekDay::Mon,
                "rule-1",
                vec![vec![demand(
                    RequiredType::Of(OperatorType::Regular),
                    "Packing",
                    1,
                    &["task-pack", "task-wrap"],
                )]],
            ),
            staffing(
                WeekDay::Mon,
                "rule-2",
                vec![vec![demand(RequiredType::Any, "Inspection", 1, &["task-qa"])]],
            ),
        ];
        let operators = make_operators();
        let tasks = make_tasks();

        let result = run_smart_fill(&requirements, &operators, &tasks, &[], &[]);
        assert!(result.is_complete());

        let conflicts =
            detect_conflicts(&result.assignments, &operators, &tasks, &requirements, &[]);
        assert!(conflicts.is_empty(), "unexpected: {conflicts:?}");
    }

    #[test]
    fn test_double_assignment_detected_once() {
        let grid = vec![
            ScheduleAssignment::new("op-a", WeekDay::Tue, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Tue, "task-wrap"),
        ];

        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);
        let doubles: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::DoubleAssignment)
            .collect();
        assert_eq!(doubles.len(), 1);
        assert_eq!(doubles[0].id, "double:tue:op-a:-:-");
        assert!(doubles[0].message.contains("task-pack, task-wrap"));
    }

    #[test]
    fn test_duplicate_rows_are_not_double_assignment() {
        let grid = vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
        ];
        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_unknown_operator_flagged() {
        let grid = vec![ScheduleAssignment::new("op-ghost", WeekDay::Mon, "task-pack")];
        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Availability);
        assert!(conflicts[0].message.contains("not in the roster"));
    }

    #[test]
    fn test_excluded_operator_flagged() {
        let grid = vec![ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack")];
        let exclusions = vec![
            OperatorExclusion::new("op-a", ExclusionReason::Vacation).with_days([WeekDay::Mon]),
        ];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &exclusions);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Availability);
        assert!(conflicts[0].message.contains("vacation"));
    }

    #[test]
    fn test_inactive_operator_flagged() {
        let operators = vec![Operator::regular("op-a")
            .with_name("Anna")
            .with_skill("Packing")
            .with_status(OperatorStatus::Sick)];
        let grid = vec![ScheduleAssignment::new("op-a", WeekDay::Wed, "task-pack")];

        let conflicts = detect_conflicts(&grid, &operators, &make_tasks(), &[], &[]);
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].message.contains("on sick leave"));
    }

    #[test]
    fn test_skill_mismatch_flagged() {
        // Cara holds Inspection, not Packing.
        let grid = vec![ScheduleAssignment::new("op-c", WeekDay::Mon, "task-pack")];
        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::SkillMismatch);
        assert_eq!(conflicts[0].id, "skill:mon:op-c:task-pack:-");
    }

    #[test]
    fn test_unknown_task_flagged() {
        let grid = vec![ScheduleAssignment::new("op-a", WeekDay::Mon, "task-gone")];
        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::SkillMismatch);
        assert!(conflicts[0].message.contains("catalog"));
    }

    #[test]
    fn test_understaffed_carries_shortfalls() {
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![vec![demand(RequiredType::Any, "Packing", 2, &["task-pack"])]],
        )];
        let grid = vec![ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack")];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &requirements, &[]);
        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.kind, ConflictKind::Understaffed);
        assert_eq!(c.id, "understaffed:mon:-:-:rule-1");
        assert_eq!(c.shortfalls.len(), 1);
        assert_eq!(c.shortfalls[0].missing(), 1);
    }

    #[test]
    fn test_satisfied_alternative_suppresses_understaffed() {
        // Two Flex packers satisfy the second alternative; the first
        // being impossible does not matter.
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![
                vec![demand(
                    RequiredType::Of(OperatorType::Coordinator),
                    "Packing",
                    1,
                    &["task-pack"],
                )],
                vec![demand(
                    RequiredType::Of(OperatorType::Flex),
                    "Packing",
                    2,
                    &["task-pack", "task-wrap"],
                )],
            ],
        )];
        let operators = vec![
            Operator::flex("op-b").with_skill("Packing"),
            Operator::flex("op-d").with_skill("Packing"),
        ];
        let grid = vec![
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-d", WeekDay::Mon, "task-wrap"),
        ];

        let conflicts = detect_conflicts(&grid, &operators, &make_tasks(), &requirements, &[]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_overstaffed_is_warning() {
        let grid = vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
        ];

        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Overstaffed);
        assert!(!conflicts[0].is_blocking());
    }

    #[test]
    fn test_demand_lifts_overstaffing_threshold() {
        // Two heads on the packing line are justified by a two-head demand.
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![vec![demand(RequiredType::Any, "Packing", 2, &["task-pack"])]],
        )];
        let grid = vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
        ];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &requirements, &[]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_separation_violation_flagged() {
        let requirements = vec![pairing(
            WeekDay::Mon,
            "rule-3",
            PairPreference::DontWant,
            &["op-a", "op-b"],
            None,
        )];
        let grid = vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
        ];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &requirements, &[]);
        let separations: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::SeparationViolated)
            .collect();
        assert_eq!(separations.len(), 1);
        assert_eq!(separations[0].rule_id.as_deref(), Some("rule-3"));
        assert_eq!(separations[0].task_id.as_deref(), Some("task-pack"));
    }

    #[test]
    fn test_pairing_unmet_when_apart() {
        let requirements = vec![pairing(
            WeekDay::Mon,
            "rule-4",
            PairPreference::Want,
            &["op-a", "op-b"],
            None,
        )];
        let grid = vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-wrap"),
        ];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &requirements, &[]);
        let unmet: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::PairingUnmet)
            .collect();
        assert_eq!(unmet.len(), 1);
        assert!(unmet[0].message.contains("op-a, op-b"));
    }

    #[test]
    fn test_pairing_with_idle_member_is_quiet() {
        // op-b idle: nothing to report for the keep-together rule.
        let requirements = vec![pairing(
            WeekDay::Mon,
            "rule-4",
            PairPreference::Want,
            &["op-a", "op-b"],
            None,
        )];
        let grid = vec![ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack")];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &requirements, &[]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_conflicts_sorted_by_day_and_kind() {
        let grid = vec![
            // Tue: skill mismatch.
            ScheduleAssignment::new("op-c", WeekDay::Tue, "task-pack"),
            // Mon: double assignment.
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-wrap"),
        ];

        let conflicts = detect_conflicts(&grid, &make_operators(), &make_tasks(), &[], &[]);
        assert_eq!(conflicts[0].day, WeekDay::Mon);
        assert_eq!(conflicts[0].kind, ConflictKind::DoubleAssignment);
        assert_eq!(conflicts.last().unwrap().day, WeekDay::Tue);
    }

    #[test]
    fn test_garbage_grid_never_panics() {
        let grid = vec![
            ScheduleAssignment::new("", WeekDay::Mon, ""),
            ScheduleAssignment::new("op-ghost", WeekDay::Fri, "task-gone"),
            ScheduleAssignment::new("op-a", WeekDay::Wed, "task-gone"),
        ];
        let requirements = vec![staffing(
            WeekDay::Wed,
            "rule-1",
            vec![vec![demand(RequiredType::Any, "Packing", 3, &["task-pack"])]],
        )];

        let conflicts =
            detect_conflicts(&grid, &make_operators(), &make_tasks(), &requirements, &[]);
        assert!(!conflicts.is_empty());
        assert!(conflicts.iter().all(|c| !c.id.is_empty()));
    }
}
