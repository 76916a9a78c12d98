//! Task dependency and scheduling engine for a project-planning board.
//!
//! This crate holds the scheduling core of the board: it validates
//! predecessor relationships, recomputes start dates against a
//! weekend-skipping working-day calendar, and reports the project's
//! critical path. Everything is a pure, synchronous function over an
//! explicit task collection; the caller owns the collection, passes a
//! snapshot in, and stores the returned result.
//!
//! The intended edit cycle is: [`validate_dependencies`] gates the edit;
//! if valid, [`recalculate_task_dates`] produces the collection to store;
//! [`critical_path`] and [`available_predecessors`] serve display and
//! editor queries on demand.

pub mod calendar;
mod critical_path;
mod graph;
mod models;
mod propagation;

pub use calendar::{calculate_end_date, days_in_range, is_weekend_day};
pub use calendar::{CalendarError, DayInfo, DayRange};
pub use critical_path::critical_path;
pub use graph::{
    available_predecessors, dependent_tasks, has_cyclic_dependency, validate_dependencies,
};
pub use models::{DependencyEdge, Task, TaskId, ValidationReport};
pub use propagation::{recalculate_task_dates, PropagationError};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_task(id: TaskId, start: NaiveDate, duration: u32, deps: Vec<TaskId>) -> Task {
        Task {
            id,
            name: format!("task-{id}"),
            start_date: start,
            duration,
            dependencies: deps,
        }
    }

    #[test]
    fn test_edit_cycle_validate_then_recalculate() {
        let tasks = vec![
            make_task(1, date(2025, 8, 8), 5, vec![]),
            make_task(2, date(2025, 8, 8), 3, vec![1]),
        ];

        let report = validate_dependencies(&tasks);
        assert!(report.is_valid);

        let result = recalculate_task_dates(&tasks).unwrap();
        assert_eq!(result[0].start_date, date(2025, 8, 8));
        assert_eq!(result[1].start_date, date(2025, 8, 15));
    }

    #[test]
    fn test_invalid_edit_is_rejected_before_recalculation() {
        // The in-progress edit points at a missing task; validation blocks
        // it and the caller keeps the previous collection untouched.
        let tasks = vec![make_task(1, date(2025, 8, 8), 2, vec![7])];

        let report = validate_dependencies(&tasks);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors[0],
            "Task \"task-1\" depends on non-existent task with ID 7"
        );
    }

    #[test]
    fn test_editor_queries_agree_with_validation() {
        let tasks = vec![
            make_task(1, date(2025, 8, 8), 2, vec![]),
            make_task(2, date(2025, 8, 8), 3, vec![1]),
            make_task(3, date(2025, 8, 8), 1, vec![1]),
        ];

        // Task 2 is downstream of task 1, so it is not offered as a
        // predecessor for 1, and probing that edge confirms the cycle.
        let offered: Vec<TaskId> = available_predecessors(&tasks, 1)
            .iter()
            .map(|task| task.id)
            .collect();
        assert!(!offered.contains(&2));
        assert!(has_cyclic_dependency(
            &tasks,
            Some(DependencyEdge {
                successor_id: 1,
                predecessor_id: 2,
            })
        ));

        assert_eq!(critical_path(&tasks), vec![1, 2]);
    }
}
