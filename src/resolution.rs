//! Resolution proposals for detected conflicts, and their application.
//!
//! For each blocking conflict the generator proposes a ranked list of
//! grid edits: better-fitting options first, destructive fallbacks last.
//! Side effects a fix knowingly creates are declared on the proposal
//! (`introduces`), never silently applied.
//!
//! Confidence is a heuristic 0-100 ordering key, not a probability. The
//! absolute numbers carry no meaning beyond "higher ranks first".
//!
//! | Conflict | Proposals, best first |
//! |----------|----------------------|
//! | DoubleAssignment | Keep the best-fitting task, drop the others |
//! | SkillMismatch | Swap in a qualified free operator; else remove |
//! | Availability | Swap in an available operator; else remove |
//! | Understaffed | Add a qualified free operator; else relax the rule |
//! | warnings | None — left to manual judgement |
//!
//! Applying a resolution is pure: the input grid is never mutated, and a
//! stale resolution (grid changed since it was proposed) fails with an
//! [`ApplyError`] instead of corrupting the week.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::models::{
    assignment_at, crew_for_task, excluded_on_day, sort_assignments, week_load, ConflictKind,
    ConflictResolution, Operator, OperatorExclusion, ResolutionAction, ScheduleAssignment,
    ScheduleConflict, TaskType, WeekDay,
};

/// Why a resolution could not be applied to a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// A removal targeted an assignment that is not on the grid.
    #[error("no assignment of {operator_id} to {task_id} on {day}")]
    MissingAssignment {
        operator_id: String,
        day: WeekDay,
        task_id: String,
    },
    /// An addition duplicated an assignment already on the grid.
    #[error("{operator_id} is already assigned to {task_id} on {day}")]
    DuplicateAssignment {
        operator_id: String,
        day: WeekDay,
        task_id: String,
    },
    /// An addition would double-book the operator.
    #[error("{operator_id} is busy with {task_id} on {day}")]
    OperatorBusy {
        operator_id: String,
        day: WeekDay,
        task_id: String,
    },
}

/// How many replacement or fill candidates to propose per conflict.
const MAX_CANDIDATES: usize = 3;

/// Proposes ranked fixes for one conflict.
///
/// Warnings (overstaffing, pairing preferences) get no proposals. The
/// result is sorted by confidence, best first; an empty vector means
/// the conflict needs a human.
pub fn propose_resolutions(
    conflict: &ScheduleConflict,
    operators: &[Operator],
    tasks: &[TaskType],
    grid: &[ScheduleAssignment],
    exclusions: &[OperatorExclusion],
) -> Vec<ConflictResolution> {
    let operator_index: HashMap<&str, &Operator> =
        operators.iter().map(|o| (o.id.as_str(), o)).collect();
    let task_index: HashMap<&str, &TaskType> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut proposals = match conflict.kind {
        ConflictKind::DoubleAssignment => resolve_double(conflict, &operator_index, &task_index, grid),
        ConflictKind::SkillMismatch => resolve_replacement(
            conflict,
            operators,
            &task_index,
            grid,
            exclusions,
            removal_confidence(conflict, exclusions),
        ),
        ConflictKind::Availability => resolve_replacement(
            conflict,
            operators,
            &task_index,
            grid,
            exclusions,
            removal_confidence(conflict, exclusions),
        ),
        ConflictKind::Understaffed => {
            resolve_understaffed(conflict, operators, &task_index, grid, exclusions)
        }
        ConflictKind::Overstaffed
        | ConflictKind::SeparationViolated
        | ConflictKind::PairingUnmet => Vec::new(),
    };

    proposals.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    debug!(conflict = %conflict.id, options = proposals.len(), "resolutions proposed");
    proposals
}

/// Applies a resolution's actions to a grid, returning the new grid.
///
/// Exact duplicate rows are collapsed first. Actions apply in order;
/// the first one that no longer matches the grid aborts the whole
/// application, leaving the caller's grid untouched.
pub fn apply_resolution(
    grid: &[ScheduleAssignment],
    resolution: &ConflictResolution,
) -> Result<Vec<ScheduleAssignment>, ApplyError> {
    let mut next: Vec<ScheduleAssignment> = Vec::new();
    {
        let mut seen: HashSet<&ScheduleAssignment> = HashSet::new();
        for assignment in grid {
            if seen.insert(assignment) {
                next.push(assignment.clone());
            }
        }
    }

    for action in &resolution.actions {
        match action {
            ResolutionAction::Remove {
                operator_id,
                day,
                task_id,
            } => {
                remove_row(&mut next, operator_id, *day, task_id)?;
            }
            ResolutionAction::Add {
                operator_id,
                day,
                task_id,
            } => {
                add_row(&mut next, operator_id, *day, task_id)?;
            }
            ResolutionAction::Move {
                operator_id,
                day,
                from_task_id,
                to_task_id,
            } => {
                remove_row(&mut next, operator_id, *day, from_task_id)?;
                add_row(&mut next, operator_id, *day, to_task_id)?;
            }
            // A rule edit, not a grid edit.
            ResolutionAction::RelaxRequirement { .. } => {}
        }
    }

    sort_assignments(&mut next);
    Ok(next)
}

fn remove_row(
    grid: &mut Vec<ScheduleAssignment>,
    operator_id: &str,
    day: WeekDay,
    task_id: &str,
) -> Result<(), ApplyError> {
    let position = grid
        .iter()
        .position(|a| a.operator_id == operator_id && a.day == day && a.task_id == task_id)
        .ok_or_else(|| ApplyError::MissingAssignment {
            operator_id: operator_id.to_string(),
            day,
            task_id: task_id.to_string(),
        })?;
    grid.remove(position);
    Ok(())
}

fn add_row(
    grid: &mut Vec<ScheduleAssignment>,
    operator_id: &str,
    day: WeekDay,
    task_id: &str,
) -> Result<(), ApplyError> {
    if grid
        .iter()
        .any(|a| a.operator_id == operator_id && a.day == day && a.task_id == task_id)
    {
        return Err(ApplyError::DuplicateAssignment {
            operator_id: operator_id.to_string(),
            day,
            task_id: task_id.to_string(),
        });
    }
    if let Some(held) = assignment_at(grid, operator_id, day) {
        return Err(ApplyError::OperatorBusy {
            operator_id: operator_id.to_string(),
            day,
            task_id: held.task_id.clone(),
        });
    }
    grid.push(ScheduleAssignment::new(operator_id, day, task_id));
    Ok(())
}

/// How well an operator suits a task: skill first, preference on top.
fn fit_score(operator: &Operator, task: &TaskType) -> i32 {
    let skill = if operator.has_skill(&task.required_skill) {
        40
    } else {
        0
    };
    let preference = operator
        .preference_rank(&task.name)
        .map_or(0, |rank| (20i32 - 2 * rank as i32).max(2));
    skill + preference
}

fn clamp_confidence(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

fn task_display(task_index: &HashMap<&str, &TaskType>, task_id: &str) -> String {
    task_index
        .get(task_id)
        .map(|t| {
            if t.name.is_empty() {
                t.id.clone()
            } else {
                t.name.clone()
            }
        })
        .unwrap_or_else(|| task_id.to_string())
}

/// Operators that could take a new assignment on the day.
fn free_candidates<'a>(
    operators: &'a [Operator],
    grid: &[ScheduleAssignment],
    exclusions: &[OperatorExclusion],
    day: WeekDay,
) -> Vec<&'a Operator> {
    operators
        .iter()
        .filter(|o| o.is_schedulable() && o.can_work(day))
        .filter(|o| excluded_on_day(exclusions, &o.id, day).is_none())
        .filter(|o| assignment_at(grid, &o.id, day).is_none())
        .collect()
}

/// Confidence of a bare removal: higher when the operator is merely
/// absent for that one day, lowest when the gap spans the week.
fn removal_confidence(conflict: &ScheduleConflict, exclusions: &[OperatorExclusion]) -> u8 {
    let single_day_absence = conflict
        .operator_id
        .as_deref()
        .and_then(|id| excluded_on_day(exclusions, id, conflict.day))
        .map_or(false, |e| !e.is_full_week());
    if single_day_absence {
        30
    } else {
        15
    }
}

fn resolve_double(
    conflict: &ScheduleConflict,
    operator_index: &HashMap<&str, &Operator>,
    task_index: &HashMap<&str, &TaskType>,
    grid: &[ScheduleAssignment],
) -> Vec<ConflictResolution> {
    let Some(operator_id) = conflict.operator_id.as_deref() else {
        return Vec::new();
    };
    let day = conflict.day;

    let mut held: Vec<&str> = grid
        .iter()
        .filter(|a| a.operator_id == operator_id && a.day == day)
        .map(|a| a.task_id.as_str())
        .collect();
    held.sort_unstable();
    held.dedup();
    if held.len() < 2 {
        // Stale conflict: the grid no longer shows a double booking.
        return Vec::new();
    }

    let operator = operator_index.get(operator_id).copied();
    let fits: Vec<(&str, i32)> = held
        .iter()
        .map(|task_id| {
            let fit = match (operator, task_index.get(task_id)) {
                (Some(op), Some(task)) => fit_score(op, task),
                _ => 0,
            };
            (*task_id, fit)
        })
        .collect();

    let mut keeps = fits.clone();
    keeps.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    keeps
        .iter()
        .map(|(keep, keep_fit)| {
            let dropped_best = fits
                .iter()
                .filter(|(task_id, _)| task_id != keep)
                .map(|(_, fit)| *fit)
                .max()
                .unwrap_or(0);
            let mut resolution = ConflictResolution::new(
                &conflict.id,
                clamp_confidence(50 + (keep_fit - dropped_best) / 2),
            );
            for (task_id, _) in fits.iter().filter(|(task_id, _)| task_id != keep) {
                resolution =
                    resolution.with_action(ResolutionAction::remove(operator_id, day, *task_id));
            }
            resolution
        })
        .collect()
}

/// Swap-in proposals for a misassigned operator, with a bare removal as
/// the last resort.
fn resolve_replacement(
    conflict: &ScheduleConflict,
    operators: &[Operator],
    task_index: &HashMap<&str, &TaskType>,
    grid: &[ScheduleAssignment],
    exclusions: &[OperatorExclusion],
    remove_confidence: u8,
) -> Vec<ConflictResolution> {
    let (Some(operator_id), Some(task_id)) =
        (conflict.operator_id.as_deref(), conflict.task_id.as_deref())
    else {
        return Vec::new();
    };
    let day = conflict.day;

    let Some(task) = task_index.get(task_id).copied() else {
        // The task no longer exists; the row itself is the problem.
        return vec![ConflictResolution::new(&conflict.id, 60)
            .with_action(ResolutionAction::remove(operator_id, day, task_id))];
    };

    let mut candidates: Vec<&Operator> = free_candidates(operators, grid, exclusions, day)
        .into_iter()
        .filter(|o| o.id != operator_id && o.has_skill(&task.required_skill))
        .collect();
    candidates.sort_by(|a, b| {
        fit_score(b, task)
            .cmp(&fit_score(a, task))
            .then_with(|| week_load(grid, &a.id).cmp(&week_load(grid, &b.id)))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut proposals: Vec<ConflictResolution> = candidates
        .iter()
        .take(MAX_CANDIDATES)
        .map(|candidate| {
            let load = week_load(grid, &candidate.id) as i32;
            let confidence =
                clamp_confidence(40 + fit_score(candidate, task) / 2 + (5 - load.min(5)));
            ConflictResolution::new(&conflict.id, confidence)
                .with_action(ResolutionAction::remove(operator_id, day, task_id))
                .with_action(ResolutionAction::add(&candidate.id, day, task_id))
        })
        .collect();

    proposals.push(
        ConflictResolution::new(&conflict.id, remove_confidence)
            .with_action(ResolutionAction::remove(operator_id, day, task_id))
            .with_caveat(format!(
                "task {} may be left understaffed on {day}",
                task_display(task_index, task_id)
            )),
    );

    proposals
}

fn resolve_understaffed(
    conflict: &ScheduleConflict,
    operators: &[Operator],
    task_index: &HashMap<&str, &TaskType>,
    grid: &[ScheduleAssignment],
    exclusions: &[OperatorExclusion],
) -> Vec<ConflictResolution> {
    let Some(rule_id) = conflict.rule_id.as_deref() else {
        return Vec::new();
    };
    let day = conflict.day;
    let mut proposals = Vec::new();

    for shortfall in &conflict.shortfalls {
        let mut candidates: Vec<&Operator> = free_candidates(operators, grid, exclusions, day)
            .into_iter()
            .filter(|o| {
                shortfall.required_type.matches(o.operator_type) && o.has_skill(&shortfall.skill)
            })
            .collect();

        // Pair each candidate with the task it would land on.
        let mut placed: Vec<(&Operator, &TaskType)> = candidates
            .drain(..)
            .filter_map(|candidate| {
                target_task(candidate, &shortfall.task_ids, task_index, grid, day)
                    .map(|task| (candidate, task))
            })
            .collect();
        placed.sort_by(|a, b| {
            fit_score(b.0, b.1)
                .cmp(&fit_score(a.0, a.1))
                .then_with(|| week_load(grid, &a.0.id).cmp(&week_load(grid, &b.0.id)))
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        if placed.is_empty() {
            proposals.push(
                ConflictResolution::new(&conflict.id, 10)
                    .with_action(ResolutionAction::RelaxRequirement {
                        day,
                        rule_id: rule_id.to_string(),
                        skill: shortfall.skill.clone(),
                        required: shortfall.required,
                        proposed: shortfall.assigned,
                    })
                    .with_caveat(format!(
                        "{} coverage stays below the rule's target on {day}",
                        shortfall.skill
                    )),
            );
            continue;
        }

        for (candidate, task) in placed.iter().take(MAX_CANDIDATES) {
            let confidence = clamp_confidence(45 + fit_score(candidate, task) / 2);
            proposals.push(
                ConflictResolution::new(&conflict.id, confidence)
                    .with_action(ResolutionAction::add(&candidate.id, day, &task.id)),
            );
        }
    }

    proposals
}

/// The task a filled-in operator should land on: their preferred one,
/// else the least crowded.
fn target_task<'a>(
    candidate: &Operator,
    task_ids: &[String],
    task_index: &HashMap<&str, &'a TaskType>,
    grid: &[ScheduleAssignment],
    day: WeekDay,
) -> Option<&'a TaskType> {
    let mut known: Vec<(usize, usize, &'a TaskType)> = task_ids
        .iter()
        .filter_map(|id| task_index.get(id.as_str()).copied())
        .map(|task| {
            let pref = candidate.preference_rank(&task.name).unwrap_or(usize::MAX);
            let crowd = crew_for_task(grid, day, &task.id).len();
            (pref, crowd, task)
        })
        .collect();
    known.sort_by(|a, b| (a.0, a.1, &a.2.id).cmp(&(b.0, b.1, &b.2.id)));
    known.first().map(|(_, _, task)| *task)
}
