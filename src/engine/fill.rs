//! Greedy weekly auto-fill ("smart fill").
//!
//! Turns compiled requirements plus a roster into a filled week. The
//! engine is deterministic: identical inputs yield an identical grid,
//! and each day is filled independently of the others.
//!
//! # Passes (per day)
//!
//! | Pass | Action |
//! |------|--------|
//! | Seed | Existing assignments are locked in place and count toward coverage |
//! | Staffing | Requirements cheapest-first; the first fully satisfiable alternative wins |
//! | Pairing | Keep-together rules place idle members while task capacity allows |
//!
//! Demands the engine cannot cover become [`UnmetDemand`] entries in the
//! result instead of errors. An impossible week is valid input.
//!
//! # Candidate ranking
//!
//! Free operators are ranked per demand by preferred task, then by
//! lightest week load on the incoming grid, then by id. Keep-apart
//! constraints are honored while picking tasks, even when that leaves a
//! demand short.
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering", §4: constructive
//! heuristics

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    alternative_total, effective_capacity, excluded_on_day, pairings_for_day, sort_assignments,
    staffing_for_day, week_load, Operator, OperatorExclusion, PairPreference, PairingConstraint,
    ResolvedRequirement, ScheduleAssignment, StaffingDemand, TaskType, UnmetDemand, WeekDay,
};

/// Greedy weekly auto-fill engine.
///
/// Stateless between runs. The pairing pass can be switched off for
/// callers that want pure staffing without keep-together placement.
#[derive(Debug, Clone)]
pub struct SmartFill {
    pairing_pass: bool,
}

/// Bundled input for a fill run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillRequest {
    /// Compiled per-day requirements.
    pub requirements: Vec<ResolvedRequirement>,
    /// The roster to draw operators from.
    pub operators: Vec<Operator>,
    /// Task catalog for the week.
    pub tasks: Vec<TaskType>,
    /// Assignments already on the grid. Never moved or removed.
    pub existing: Vec<ScheduleAssignment>,
    /// Absences in effect this week.
    pub exclusions: Vec<OperatorExclusion>,
}

/// Result of a weekly fill: the full grid plus anything left unstaffed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillResult {
    /// The grid after the fill: the caller's existing assignments plus
    /// new ones, in canonical `(day, task, operator)` order.
    pub assignments: Vec<ScheduleAssignment>,
    /// Demands the engine could not cover.
    pub unmet: Vec<UnmetDemand>,
}

impl FillResult {
    /// Whether every demand was covered.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unmet.is_empty()
    }
}

impl SmartFill {
    /// Creates an engine with the pairing pass enabled.
    pub fn new() -> Self {
        Self { pairing_pass: true }
    }

    /// Enables or disables the keep-together placement pass.
    pub fn with_pairing_pass(mut self, enabled: bool) -> Self {
        self.pairing_pass = enabled;
        self
    }

    /// Fills a week.
    ///
    /// `existing` assignments are kept verbatim (exact duplicates are
    /// dropped) and count toward the demands they satisfy. Operators who
    /// are archived, inactive, unavailable, or excluded on a day are
    /// never picked for it.
    pub fn fill(
        &self,
        requirements: &[ResolvedRequirement],
        operators: &[Operator],
        tasks: &[TaskType],
        existing: &[ScheduleAssignment],
        exclusions: &[OperatorExclusion],
    ) -> FillResult {
        let mut week: Vec<ScheduleAssignment> = Vec::new();
        {
            let mut seen: HashSet<&ScheduleAssignment> = HashSet::new();
            for assignment in existing {
                if seen.insert(assignment) {
                    week.push(assignment.clone());
                }
            }
        }

        let ctx = FillContext {
            operators: operators.iter().map(|o| (o.id.as_str(), o)).collect(),
            tasks: tasks.iter().map(|t| (t.id.as_str(), t)).collect(),
            existing: &week,
        };

        let mut unmet: Vec<UnmetDemand> = Vec::new();
        let mut filled: Vec<ScheduleAssignment> = Vec::new();
        for day in WeekDay::ALL {
            filled.extend(self.fill_day(&ctx, day, requirements, operators, exclusions, &mut unmet));
        }

        let mut assignments = week;
        assignments.extend(filled);
        sort_assignments(&mut assignments);

        FillResult { assignments, unmet }
    }

    /// Fills a week from a bundled request.
    pub fn fill_request(&self, request: &FillRequest) -> FillResult {
        self.fill(
            &request.requirements,
            &request.operators,
            &request.tasks,
            &request.existing,
            &request.exclusions,
        )
    }

    fn fill_day(
        &self,
        ctx: &FillContext,
        day: WeekDay,
        requirements: &[ResolvedRequirement],
        operators: &[Operator],
        exclusions: &[OperatorExclusion],
        unmet: &mut Vec<UnmetDemand>,
    ) -> Vec<ScheduleAssignment> {
        let mut pool: Vec<&Operator> = operators
            .iter()
            .filter(|o| o.is_schedulable() && o.can_work(day))
            .filter(|o| excluded_on_day(exclusions, &o.id, day).is_none())
            .collect();
        pool.sort_by(|a, b| a.id.cmp(&b.id));

        let mut board = DayBoard::seed(day, ctx.existing);

        let separations: Vec<&PairingConstraint> = pairings_for_day(requirements, day)
            .into_iter()
            .filter(|c| c.preference == PairPreference::DontWant)
            .collect();

        let mut day_reqs = staffing_for_day(requirements, day);
        day_reqs.sort_by(|a, b| (a.min_headcount(), &a.rule_id).cmp(&(b.min_headcount(), &b.rule_id)));

        for req in day_reqs {
            let mut order: Vec<usize> = (0..req.alternatives.len()).collect();
            order.sort_by_key(|&i| alternative_total(&req.alternatives[i]));

            // Try alternatives cheapest-first; commit the first complete
            // plan, or the one with the smallest shortfall.
            let mut best: Option<AltPlan> = None;
            for i in order {
                let plan = plan_alternative(
                    ctx,
                    &req.alternatives[i],
                    &req.rule_id,
                    &board,
                    &pool,
                    &separations,
                );
                let complete = plan.shortfall == 0;
                match &best {
                    Some(b) if b.shortfall <= plan.shortfall => {}
                    _ => best = Some(plan),
                }
                if complete {
                    break;
                }
            }

            if let Some(plan) = best {
                for (operator_id, task_id) in &plan.fills {
                    board.place(operator_id, task_id);
                }
                unmet.extend(plan.unmet);
            }
        }

        if self.pairing_pass {
            let mut wants: Vec<&PairingConstraint> = pairings_for_day(requirements, day)
                .into_iter()
                .filter(|c| c.preference == PairPreference::Want)
                .collect();
            wants.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));
            for want in wants {
                apply_want(ctx, want, requirements, &pool, &mut board);
            }
        }

        debug!(
            day = %day,
            pool = pool.len(),
            placed = board.fills.len(),
            open = unmet.iter().filter(|u| u.day == day).map(|u| u.missing()).sum::<u32>(),
            "day filled"
        );

        board.fills
    }
}

impl Default for SmartFill {
    fn default() -> Self {
        Self::new()
    }
}

/// Fills a week with default settings.
pub fn run_smart_fill(
    requirements: &[ResolvedRequirement],
    operators: &[Operator],
    tasks: &[TaskType],
    existing: &[ScheduleAssignment],
    exclusions: &[OperatorExclusion],
) -> FillResult {
    SmartFill::new().fill(requirements, operators, tasks, existing, exclusions)
}

/// Read-only lookup context shared by the per-day passes.
struct FillContext<'a> {
    operators: HashMap<&'a str, &'a Operator>,
    tasks: HashMap<&'a str, &'a TaskType>,
    /// The incoming grid, duplicates removed. Week loads are measured
    /// against this so that filling one day never reorders another.
    existing: &'a [ScheduleAssignment],
}

/// Mutable picture of one day while it is being filled.
struct DayBoard {
    day: WeekDay,
    /// `(operator, task)` pairs on the day, existing and new.
    placed: Vec<(String, String)>,
    /// Operators holding an assignment on the day.
    busy: HashSet<String>,
    /// Assignments created by the engine for this day.
    fills: Vec<ScheduleAssignment>,
}

impl DayBoard {
    fn seed(day: WeekDay, existing: &[ScheduleAssignment]) -> Self {
        let mut board = Self {
            day,
            placed: Vec::new(),
            busy: HashSet::new(),
            fills: Vec::new(),
        };
        for assignment in existing.iter().filter(|a| a.day == day) {
            board.busy.insert(assignment.operator_id.clone());
            board
                .placed
                .push((assignment.operator_id.clone(), assignment.task_id.clone()));
        }
        board
    }

    fn place(&mut self, operator_id: &str, task_id: &str) {
        self.busy.insert(operator_id.to_string());
        self.placed
            .push((operator_id.to_string(), task_id.to_string()));
        self.fills
            .push(ScheduleAssignment::new(operator_id, self.day, task_id));
    }

    fn crowd(&self, task_id: &str) -> usize {
        self.placed.iter().filter(|(_, t)| t == task_id).count()
    }

    fn task_of(&self, operator_id: &str) -> Option<&str> {
        self.placed
            .iter()
            .find(|(o, _)| o == operator_id)
            .map(|(_, t)| t.as_str())
    }
}

/// A dry-run of one demand group against the current board.
struct AltPlan {
    fills: Vec<(String, String)>,
    unmet: Vec<UnmetDemand>,
    shortfall: u32,
}

fn plan_alternative(
    ctx: &FillContext,
    demands: &[StaffingDemand],
    rule_id: &str,
    board: &DayBoard,
    pool: &[&Operator],
    separations: &[&PairingConstraint],
) -> AltPlan {
    let mut plan = AltPlan {
        fills: Vec::new(),
        unmet: Vec::new(),
        shortfall: 0,
    };
    // Operators already counted toward an earlier demand in this group.
    let mut claimed: HashSet<String> = HashSet::new();

    for demand in demands {
        // Operators already working a matching task cover the demand first.
        let mut present: Vec<&str> = board
            .placed
            .iter()
            .filter(|(_, task)| demand.task_ids.contains(task))
            .map(|(op, _)| op.as_str())
            .filter(|op| !claimed.contains(*op))
            .filter(|op| {
                ctx.operators.get(op).map_or(false, |o| {
                    demand.required_type.matches(o.operator_type) && o.has_skill(&demand.skill)
                })
            })
            .collect();
        present.sort_unstable();
        present.dedup();

        let mut covered = 0u32;
        for op in present {
            if covered == demand.count {
                break;
            }
            claimed.insert(op.to_string());
            covered += 1;
        }

        let need = demand.count - covered;
        if need == 0 {
            continue;
        }

        let mut candidates: Vec<&Operator> = pool
            .iter()
            .copied()
            .filter(|o| !board.busy.contains(&o.id))
            .filter(|o| !plan.fills.iter().any(|(id, _)| id == &o.id))
            .filter(|o| demand.required_type.matches(o.operator_type) && o.has_skill(&demand.skill))
            .collect();
        rank_candidates(ctx, demand, &mut candidates);

        let mut added = 0u32;
        for op in candidates {
            if added == need {
                break;
            }
            if let Some(task_id) = pick_task(ctx, op, demand, board, &plan.fills, separations) {
                plan.fills.push((op.id.clone(), task_id));
                added += 1;
            }
        }

        if added < need {
            plan.shortfall += need - added;
            plan.unmet.push(UnmetDemand {
                day: board.day,
                rule_id: rule_id.to_string(),
                required_type: demand.required_type,
                skill: demand.skill.clone(),
                task_ids: demand.task_ids.clone(),
                required: demand.count,
                assigned: covered + added,
            });
        }
    }

    plan
}

fn rank_candidates(ctx: &FillContext, demand: &StaffingDemand, candidates: &mut [&Operator]) {
    candidates.sort_by(|a, b| {
        preferred_rank(ctx, a, demand)
            .cmp(&preferred_rank(ctx, b, demand))
            .then_with(|| week_load(ctx.existing, &a.id).cmp(&week_load(ctx.existing, &b.id)))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Best preference rank the operator holds for any of the demand's tasks.
fn preferred_rank(ctx: &FillContext, operator: &Operator, demand: &StaffingDemand) -> usize {
    demand
        .task_ids
        .iter()
        .filter_map(|tid| ctx.tasks.get(tid.as_str()))
        .filter_map(|task| operator.preference_rank(&task.name))
        .min()
        .unwrap_or(usize::MAX)
}

/// Picks the task an operator should fill for a demand: preferred task
/// first, then the least crowded, subject to keep-apart constraints.
fn pick_task(
    ctx: &FillContext,
    operator: &Operator,
    demand: &StaffingDemand,
    board: &DayBoard,
    plan_fills: &[(String, String)],
    separations: &[&PairingConstraint],
) -> Option<String> {
    let mut ranked: Vec<(usize, usize, &String)> = demand
        .task_ids
        .iter()
        .map(|tid| {
            let pref = ctx
                .tasks
                .get(tid.as_str())
                .and_then(|task| operator.preference_rank(&task.name))
                .unwrap_or(usize::MAX);
            let crowd =
                board.crowd(tid) + plan_fills.iter().filter(|(_, t)| t == tid).count();
            (pref, crowd, tid)
        })
        .collect();
    ranked.sort();

    ranked
        .into_iter()
        .map(|(_, _, tid)| tid)
        .find(|tid| separation_allows(ctx, operator, tid, board, plan_fills, separations))
        .cloned()
}

fn separation_allows(
    ctx: &FillContext,
    operator: &Operator,
    task_id: &str,
    board: &DayBoard,
    plan_fills: &[(String, String)],
    separations: &[&PairingConstraint],
) -> bool {
    for constraint in separations {
        if !constraint.operator_ids.iter().any(|id| id == &operator.id) {
            continue;
        }
        // Skill-scoped constraints bind only on that skill's tasks.
        if let Some(skill) = &constraint.skill {
            match ctx.tasks.get(task_id) {
                Some(task) if &task.required_skill == skill => {}
                _ => continue,
            }
        }
        if constraint.operator_ids.len() == 1 {
            // One-operator keep-off rule: the task itself is banned.
            return false;
        }
        let partner_present = board
            .placed
            .iter()
            .chain(plan_fills.iter())
            .any(|(op, task)| {
                task == task_id && op != &operator.id && constraint.operator_ids.contains(op)
            });
        if partner_present {
            return false;
        }
    }
    true
}

/// Places idle members of a keep-together rule.
///
/// Members already assigned are never moved. If some members are on a
/// qualifying task, idle members join the best-staffed one while its
/// capacity allows. If every member is idle, the whole group lands on
/// the first qualifying task with room for all of them.
fn apply_want(
    ctx: &FillContext,
    want: &PairingConstraint,
    requirements: &[ResolvedRequirement],
    pool: &[&Operator],
    board: &mut DayBoard,
) {
    let mut qualifying: Vec<&TaskType> = ctx
        .tasks
        .values()
        .copied()
        .filter(|task| match &want.skill {
            Some(skill) => &task.required_skill == skill,
            None => true,
        })
        .collect();
    qualifying.sort_by(|a, b| a.id.cmp(&b.id));
    if qualifying.is_empty() {
        return;
    }

    // Member counts per qualifying task they already sit on.
    let mut anchored: Vec<(&str, usize)> = Vec::new();
    for task in &qualifying {
        let members_on = want
            .operator_ids
            .iter()
            .filter(|id| board.task_of(id) == Some(task.id.as_str()))
            .count();
        if members_on > 0 {
            anchored.push((task.id.as_str(), members_on));
        }
    }

    let elsewhere = want.operator_ids.iter().any(|id| {
        board
            .task_of(id)
            .map_or(false, |task| !qualifying.iter().any(|q| q.id == task))
    });

    let mut idle: Vec<&Operator> = want
        .operator_ids
        .iter()
        .filter(|id| board.task_of(id).is_none())
        .filter_map(|id| pool.iter().find(|o| &o.id == id).copied())
        .collect();
    idle.sort_by(|a, b| a.id.cmp(&b.id));
    idle.dedup_by(|a, b| a.id == b.id);

    if want.operator_ids.len() == 1 {
        // One-operator rule: pin the operator onto its skill's tasks.
        if !anchored.is_empty() || elsewhere {
            return;
        }
        let Some(op) = idle.first() else { return };
        let target = qualifying
            .iter()
            .filter(|task| op.has_skill(&task.required_skill))
            .filter(|task| {
                (board.crowd(&task.id) as u32) < effective_capacity(task, requirements, board.day)
            })
            .min_by_key(|task| (board.crowd(&task.id), task.id.clone()));
        if let Some(task) = target {
            board.place(&op.id, &task.id);
        }
        return;
    }

    if anchored.is_empty() {
        // Pinned-apart members stay put; a lone idle member gains nothing.
        if elsewhere || idle.len() < 2 {
            return;
        }
        for task in &qualifying {
            if !idle.iter().all(|op| op.has_skill(&task.required_skill)) {
                continue;
            }
            let room = effective_capacity(task, requirements, board.day) as usize;
            if board.crowd(&task.id) + idle.len() <= room {
                for op in &idle {
                    board.place(&op.id, &task.id);
                }
                return;
            }
        }
        return;
    }

    // Join the task holding the most members; ties go to the lowest id.
    anchored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let anchor_id = anchored[0].0.to_string();
    let Some(anchor) = ctx.tasks.get(anchor_id.as_str()).copied() else {
        return;
    };
    let cap = effective_capacity(anchor, requirements, board.day) as usize;
    for op in &idle {
        if board.crowd(&anchor_id) >= cap {
            break;
        }
        if !op.has_skill(&anchor.required_skill) {
            continue;
        }
        board.place(&op.id, &anchor_id);
    }
}

impl FillRequest {
    /// Creates a request with an empty grid and no exclusions.
    pub fn new(
        requirements: Vec<ResolvedRequirement>,
        operators: Vec<Operator>,
        tasks: Vec<TaskType>,
    ) -> Self {
        Self {
            requirements,
            operators,
            tasks,
            existing: Vec::new(),
            exclusions: Vec::new(),
        }
    }

    /// Sets the assignments already on the grid.
    pub fn with_existing(mut self, existing: Vec<ScheduleAssignment>) -> Self {
        self.existing = existing;
        self
    }

    /// Sets the week's exclusions.
    pub fn with_exclusions(mut self, exclusions: Vec<OperatorExclusion>) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        crew_for_task, Availability, ExclusionReason, OperatorStatus, OperatorType, RequiredType,
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
            Operator::regular("op-c").with_name("Cara").with_skill("Inspection"),
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

    fn regular_of(required: u32) -> Vec<ResolvedRequirement> {
        vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![vec![demand(
                RequiredType::Of(OperatorType::Regular),
                "Packing",
                required,
                &["task-pack"],
            )]],
        )]
    }

    #[test]
    fn test_fills_single_regular_demand() {
        let result = run_smart_fill(&regular_of(1), &make_operators(), &make_tasks(), &[], &[]);

        assert_eq!(result.assignments.len(), 1);
        let a = &result.assignments[0];
        assert_eq!(a.operator_id, "op-a");
        assert_eq!(a.day, WeekDay::Mon);
        assert_eq!(a.task_id, "task-pack");
        assert!(result.is_complete());
    }

    #[test]
    fn test_shortfall_is_data_not_error() {
        // Only one schedulable Regular packer for a two-head demand.
        let result = run_smart_fill(&regular_of(2), &make_operators(), &make_tasks(), &[], &[]);

        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.unmet.len(), 1);
        let u = &result.unmet[0];
        assert_eq!(u.required, 2);
        assert_eq!(u.assigned, 1);
        assert_eq!(u.missing(), 1);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_deterministic_output() {
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![vec![demand(RequiredType::Any, "Packing", 2, &["task-pack", "task-wrap"])]],
        )];
        let operators = make_operators();
        let tasks = make_tasks();

        let first = run_smart_fill(&requirements, &operators, &tasks, &[], &[]);
        let second = run_smart_fill(&requirements, &operators, &tasks, &[], &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_existing_assignments_are_locked() {
        // op-a is already busy elsewhere; nobody else qualifies.
        let existing = vec![ScheduleAssignment::new("op-a", WeekDay::Mon, "task-qa")];
        let result = run_smart_fill(&regular_of(1), &make_operators(), &make_tasks(), &existing, &[]);

        assert_eq!(result.assignments, existing);
        assert_eq!(result.unmet.len(), 1);
        assert_eq!(result.unmet[0].assigned, 0);
    }

    #[test]
    fn test_existing_coverage_counts() {
        let existing = vec![ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack")];
        let result = run_smart_fill(&regular_of(1), &make_operators(), &make_tasks(), &existing, &[]);

        assert_eq!(result.assignments, existing);
        assert!(result.is_complete());
    }

    #[test]
    fn test_duplicate_existing_rows_collapse() {
        let existing = vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
        ];
        let result = run_smart_fill(&regular_of(1), &make_operators(), &make_tasks(), &existing, &[]);
        assert_eq!(result.assignments.len(), 1);
    }

    #[test]
    fn test_first_satisfiable_alternative_wins() {
        // Cheapest alternative (one Regular) is infeasible on an all-Flex
        // roster; the two-Flex alternative must be chosen instead.
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![
                vec![demand(
                    RequiredType::Of(OperatorType::Regular),
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

        let result = run_smart_fill(&requirements, &operators, &make_tasks(), &[], &[]);
        assert_eq!(result.assignments.len(), 2);
        assert!(result.is_complete());
    }

    #[test]
    fn test_cheapest_alternative_tried_first() {
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![
                vec![demand(RequiredType::Any, "Packing", 2, &["task-pack", "task-wrap"])],
                vec![demand(RequiredType::Any, "Packing", 1, &["task-pack"])],
            ],
        )];

        let result = run_smart_fill(&requirements, &make_operators(), &make_tasks(), &[], &[]);
        // Both alternatives are satisfiable; the one-head group is cheaper.
        assert_eq!(result.assignments.len(), 1);
        assert!(result.is_complete());
    }

    #[test]
    fn test_preference_steers_task_choice() {
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![vec![demand(RequiredType::Any, "Packing", 2, &["task-pack", "task-wrap"])]],
        )];
        let operators = vec![
            Operator::regular("op-a")
                .with_skill("Packing")
                .with_preferred_task("Wrapping"),
            Operator::flex("op-b").with_skill("Packing"),
        ];

        let result = run_smart_fill(&requirements, &operators, &make_tasks(), &[], &[]);
        let on_wrap: Vec<_> = result
            .assignments
            .iter()
            .filter(|a| a.task_id == "task-wrap")
            .collect();
        assert_eq!(on_wrap.len(), 1);
        assert_eq!(on_wrap[0].operator_id, "op-a");
    }

    #[test]
    fn test_lighter_week_load_preferred() {
        // op-a already works two days; op-d is free all week.
        let existing = vec![
            ScheduleAssignment::new("op-a", WeekDay::Tue, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Wed, "task-pack"),
        ];
        let mut operators = make_operators();
        operators.push(Operator::regular("op-d").with_skill("Packing"));

        let result = run_smart_fill(&regular_of(1), &operators, &make_tasks(), &existing, &[]);
        let monday: Vec<_> = result
            .assignments
            .iter()
            .filter(|a| a.day == WeekDay::Mon)
            .collect();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].operator_id, "op-d");
    }

    #[test]
    fn test_separation_moves_partner_to_other_task() {
        // Both operators prefer the packing line; the keep-apart rule
        // forces the second one onto wrapping instead.
        let requirements = vec![
            staffing(
                WeekDay::Mon,
                "rule-1",
                vec![vec![demand(RequiredType::Any, "Packing", 2, &["task-pack", "task-wrap"])]],
            ),
            pairing(WeekDay::Mon, "rule-2", PairPreference::DontWant, &["op-a", "op-b"], None),
        ];
        let operators = vec![
            Operator::regular("op-a")
                .with_skill("Packing")
                .with_preferred_task("Packing Line"),
            Operator::flex("op-b")
                .with_skill("Packing")
                .with_preferred_task("Packing Line"),
        ];

        let result = run_smart_fill(&requirements, &operators, &make_tasks(), &[], &[]);
        assert!(result.is_complete());
        let task_of = |op: &str| {
            result
                .assignments
                .iter()
                .find(|a| a.operator_id == op)
                .map(|a| a.task_id.clone())
        };
        assert_eq!(task_of("op-a").as_deref(), Some("task-pack"));
        assert_eq!(task_of("op-b").as_deref(), Some("task-wrap"));
    }

    #[test]
    fn test_separation_can_leave_demand_short() {
        // One task only: the keep-apart pair cannot both work it.
        let requirements = vec![
            staffing(
                WeekDay::Mon,
                "rule-1",
                vec![vec![demand(RequiredType::Any, "Packing", 2, &["task-pack"])]],
            ),
            pairing(WeekDay::Mon, "rule-2", PairPreference::DontWant, &["op-a", "op-b"], None),
        ];

        let result = run_smart_fill(&requirements, &make_operators(), &make_tasks(), &[], &[]);
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.unmet.len(), 1);
        assert_eq!(result.unmet[0].assigned, 1);
    }

    #[test]
    fn test_keep_together_joins_partner() {
        let mut tasks = make_tasks();
        tasks[0] = tasks[0].clone().with_required_operators(2);
        let requirements = vec![
            staffing(
                WeekDay::Mon,
                "rule-1",
                vec![vec![demand(
                    RequiredType::Of(OperatorType::Regular),
                    "Packing",
                    1,
                    &["task-pack"],
                )]],
            ),
            pairing(WeekDay::Mon, "rule-2", PairPreference::Want, &["op-a", "op-b"], None),
        ];

        let result = run_smart_fill(&requirements, &make_operators(), &tasks, &[], &[]);
        assert_eq!(crew_for_task(&result.assignments, WeekDay::Mon, "task-pack").len(), 2);
    }

    #[test]
    fn test_keep_together_respects_capacity() {
        // task-pack holds one operator; the partner stays idle.
        let requirements = vec![
            staffing(
                WeekDay::Mon,
                "rule-1",
                vec![vec![demand(
                    RequiredType::Of(OperatorType::Regular),
                    "Packing",
                    1,
                    &["task-pack"],
                )]],
            ),
            pairing(WeekDay::Mon, "rule-2", PairPreference::Want, &["op-a", "op-b"], None),
        ];

        let result = run_smart_fill(&requirements, &make_operators(), &make_tasks(), &[], &[]);
        assert_eq!(result.assignments.len(), 1);
    }

    #[test]
    fn test_keep_together_places_idle_group() {
        let mut tasks = make_tasks();
        tasks[0] = tasks[0].clone().with_required_operators(2);
        let requirements = vec![pairing(
            WeekDay::Mon,
            "rule-2",
            PairPreference::Want,
            &["op-a", "op-b"],
            Some("Packing"),
        )];

        let result = run_smart_fill(&requirements, &make_operators(), &tasks, &[], &[]);
        assert_eq!(crew_for_task(&result.assignments, WeekDay::Mon, "task-pack").len(), 2);
    }

    #[test]
    fn test_pairing_pass_can_be_disabled() {
        let mut tasks = make_tasks();
        tasks[0] = tasks[0].clone().with_required_operators(2);
        let requirements = vec![pairing(
            WeekDay::Mon,
            "rule-2",
            PairPreference::Want,
            &["op-a", "op-b"],
            Some("Packing"),
        )];

        let engine = SmartFill::new().with_pairing_pass(false);
        let result = engine.fill(&requirements, &make_operators(), &tasks, &[], &[]);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn test_days_fill_independently() {
        let monday_only = regular_of(1);
        let mut both_days = regular_of(1);
        both_days.push(staffing(
            WeekDay::Fri,
            "rule-9",
            vec![vec![demand(RequiredType::Any, "Inspection", 1, &["task-qa"])]],
        ));

        let first = run_smart_fill(&monday_only, &make_operators(), &make_tasks(), &[], &[]);
        let second = run_smart_fill(&both_days, &make_operators(), &make_tasks(), &[], &[]);

        let monday = |r: &FillResult| {
            r.assignments
                .iter()
                .filter(|a| a.day == WeekDay::Mon)
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(monday(&first), monday(&second));
    }

    #[test]
    fn test_excluded_operator_is_skipped() {
        let exclusions = vec![
            OperatorExclusion::new("op-a", ExclusionReason::Vacation).with_days([WeekDay::Mon]),
        ];
        let result =
            run_smart_fill(&regular_of(1), &make_operators(), &make_tasks(), &[], &exclusions);

        assert!(result.assignments.is_empty());
        assert_eq!(result.unmet.len(), 1);
    }

    #[test]
    fn test_unavailable_day_is_respected() {
        let operators = vec![Operator::regular("op-a")
            .with_skill("Packing")
            .with_availability(Availability::only(&[WeekDay::Tue, WeekDay::Wed]))];
        let result = run_smart_fill(&regular_of(1), &operators, &make_tasks(), &[], &[]);
        assert!(result.assignments.is_empty());
        assert_eq!(result.unmet.len(), 1);
    }

    #[test]
    fn test_inactive_operator_not_scheduled() {
        let operators = vec![Operator::regular("op-a")
            .with_skill("Packing")
            .with_status(OperatorStatus::Sick)];
        let result = run_smart_fill(&regular_of(1), &operators, &make_tasks(), &[], &[]);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn test_fill_request_matches_direct_call() {
        let request = FillRequest::new(regular_of(1), make_operators(), make_tasks())
            .with_existing(vec![ScheduleAssignment::new("op-c", WeekDay::Tue, "task-qa")])
            .with_exclusions(vec![OperatorExclusion::new("op-b", ExclusionReason::Sick)]);

        let engine = SmartFill::new();
        let direct = engine.fill(
            &request.requirements,
            &request.operators,
            &request.tasks,
            &request.existing,
            &request.exclusions,
        );
        assert_eq!(engine.fill_request(&request), direct);
    }

    #[test]
    fn test_adding_an_operator_never_hurts_coverage() {
        let requirements = vec![staffing(
            WeekDay::Mon,
            "rule-1",
            vec![vec![demand(RequiredType::Any, "Packing", 3, &["task-pack", "task-wrap"])]],
        )];
        let short = run_smart_fill(&requirements, &make_operators(), &make_tasks(), &[], &[]);

        let mut operators = make_operators();
        operators.push(Operator::flex("op-d").with_skill("Packing"));
        let better = run_smart_fill(&requirements, &operators, &make_tasks(), &[], &[]);

        let open = |r: &FillResult| r.unmet.iter().map(UnmetDemand::missing).sum::<u32>();
        assert!(open(&better) < open(&short));
    }
}
