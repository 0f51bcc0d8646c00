//! Assignment grid model.
//!
//! An assignment binds one operator to one task on one day. The weekly
//! grid is a flat list of assignments; the invariant "at most one task
//! per operator per day" is validated by the conflict detector, never
//! silently enforced here.

use serde::{Deserialize, Serialize};

use super::WeekDay;

/// One cell of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    /// Assigned operator.
    pub operator_id: String,
    /// Day of the assignment.
    pub day: WeekDay,
    /// Task the operator works that day.
    pub task_id: String,
}

impl ScheduleAssignment {
    /// Creates a new assignment.
    pub fn new(operator_id: impl Into<String>, day: WeekDay, task_id: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
            day,
            task_id: task_id.into(),
        }
    }
}

/// All assignments on a given day.
pub fn assignments_for_day(grid: &[ScheduleAssignment], day: WeekDay) -> Vec<&ScheduleAssignment> {
    grid.iter().filter(|a| a.day == day).collect()
}

/// All assignments of a given operator across the week.
pub fn assignments_for_operator<'a>(
    grid: &'a [ScheduleAssignment],
    operator_id: &str,
) -> Vec<&'a ScheduleAssignment> {
    grid.iter().filter(|a| a.operator_id == operator_id).collect()
}

/// The operator's assignment on a day, if any (first match on malformed grids).
pub fn assignment_at<'a>(
    grid: &'a [ScheduleAssignment],
    operator_id: &str,
    day: WeekDay,
) -> Option<&'a ScheduleAssignment> {
    grid.iter()
        .find(|a| a.operator_id == operator_id && a.day == day)
}

/// Number of days the operator is assigned this week.
pub fn week_load(grid: &[ScheduleAssignment], operator_id: &str) -> usize {
    grid.iter().filter(|a| a.operator_id == operator_id).count()
}

/// Operator ids working a task on a day, sorted.
pub fn crew_for_task<'a>(
    grid: &'a [ScheduleAssignment],
    day: WeekDay,
    task_id: &str,
) -> Vec<&'a str> {
    let mut crew: Vec<&str> = grid
        .iter()
        .filter(|a| a.day == day && a.task_id == task_id)
        .map(|a| a.operator_id.as_str())
        .collect();
    crew.sort_unstable();
    crew.dedup();
    crew
}

/// Sorts a grid into canonical `(day, task, operator)` order.
pub fn sort_assignments(grid: &mut [ScheduleAssignment]) {
    grid.sort_by(|a, b| {
        (a.day, &a.task_id, &a.operator_id).cmp(&(b.day, &b.task_id, &b.operator_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Vec<ScheduleAssignment> {
        vec![
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Tue, "task-qa"),
            ScheduleAssignment::new("op-c", WeekDay::Fri, "task-pack"),
        ]
    }

    #[test]
    fn test_assignments_for_day() {
        let grid = sample_grid();
        assert_eq!(assignments_for_day(&grid, WeekDay::Mon).len(), 2);
        assert_eq!(assignments_for_day(&grid, WeekDay::Wed).len(), 0);
    }

    #[test]
    fn test_assignment_at() {
        let grid = sample_grid();
        let a = assignment_at(&grid, "op-a", WeekDay::Tue).unwrap();
        assert_eq!(a.task_id, "task-qa");
        assert!(assignment_at(&grid, "op-b", WeekDay::Tue).is_none());
    }

    #[test]
    fn test_week_load() {
        let grid = sample_grid();
        assert_eq!(week_load(&grid, "op-a"), 2);
        assert_eq!(week_load(&grid, "op-c"), 1);
        assert_eq!(week_load(&grid, "op-x"), 0);
    }

    #[test]
    fn test_crew_for_task() {
        let grid = sample_grid();
        assert_eq!(crew_for_task(&grid, WeekDay::Mon, "task-pack"), vec!["op-a", "op-b"]);
        assert!(crew_for_task(&grid, WeekDay::Tue, "task-pack").is_empty());
    }

    #[test]
    fn test_sort_canonical_order() {
        let mut grid = vec![
            ScheduleAssignment::new("op-b", WeekDay::Tue, "task-qa"),
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-qa"),
            ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
            ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
        ];
        sort_assignments(&mut grid);
        assert_eq!(
            grid,
            vec![
                ScheduleAssignment::new("op-a", WeekDay::Mon, "task-pack"),
                ScheduleAssignment::new("op-b", WeekDay::Mon, "task-pack"),
                ScheduleAssignment::new("op-a", WeekDay::Mon, "task-qa"),
                ScheduleAssignment::new("op-b", WeekDay::Tue, "task-qa"),
            ]
        );
    }
}
