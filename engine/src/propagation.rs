//! Working-day start date propagation over the dependency graph.
//!
//! Resolution is bottom-up: a task is finalized only after every one of
//! its predecessors, and each id is finalized at most once per pass. All
//! bookkeeping (memo table, in-progress marks, work stack) is built fresh
//! per invocation; the caller's collection is never mutated.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

use crate::calendar;
use crate::models::{Task, TaskId};

/// Errors from collection-wide date recalculation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// The collection contains a dependency cycle. Callers validate before
    /// recalculating; this is the fail-fast for that contract being broken.
    #[error("Cyclic dependency detected in task graph")]
    CyclicGraph,
}

/// Resolution state of one task within a single recalculation pass.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Resolution {
    InProgress,
    Done(NaiveDate),
}

/// Recompute every task's start date so that no task begins before all of
/// its predecessors finish.
///
/// A task's effective start is the later of its stored start date and the
/// first working day after the latest end date among its predecessors;
/// tasks without predecessors keep their stored date as the anchor. The
/// returned collection preserves input order.
///
/// The input is assumed acyclic (gate with
/// [`validate_dependencies`](crate::validate_dependencies) first); cyclic
/// input fails fast with [`PropagationError::CyclicGraph`].
pub fn recalculate_task_dates(tasks: &[Task]) -> Result<Vec<Task>, PropagationError> {
    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|task| (task.id, task)).collect();
    let mut resolved: FxHashMap<TaskId, Resolution> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());

    for task in tasks {
        resolve_start_date(task.id, &by_id, &mut resolved)?;
    }

    Ok(tasks
        .iter()
        .map(|task| {
            let start_date = match resolved.get(&task.id) {
                Some(Resolution::Done(date)) => *date,
                _ => task.start_date,
            };
            Task {
                start_date,
                ..task.clone()
            }
        })
        .collect())
}

/// Resolve the start date of `id` and, transitively, of every predecessor.
///
/// Uses an explicit work stack instead of recursion. A task is visited
/// twice: the first visit marks it in progress and queues its unresolved
/// predecessors; the second, once those have finalized, computes its date.
/// Reaching a task that is still in progress means the graph is cyclic.
fn resolve_start_date(
    id: TaskId,
    by_id: &FxHashMap<TaskId, &Task>,
    resolved: &mut FxHashMap<TaskId, Resolution>,
) -> Result<(), PropagationError> {
    if resolved.contains_key(&id) {
        return Ok(());
    }

    let mut stack: Vec<TaskId> = vec![id];

    while let Some(&current) = stack.last() {
        match resolved.get(&current) {
            Some(Resolution::Done(_)) => {
                stack.pop();
            }
            Some(Resolution::InProgress) => {
                finalize(current, by_id, resolved);
                stack.pop();
            }
            None => {
                resolved.insert(current, Resolution::InProgress);
                let mut blocked = false;
                if let Some(task) = by_id.get(&current) {
                    for &dep_id in &task.dependencies {
                        if !by_id.contains_key(&dep_id) {
                            continue; // dangling reference, validation's problem
                        }
                        match resolved.get(&dep_id) {
                            Some(Resolution::Done(_)) => {}
                            Some(Resolution::InProgress) => {
                                return Err(PropagationError::CyclicGraph);
                            }
                            None => {
                                stack.push(dep_id);
                                blocked = true;
                            }
                        }
                    }
                }
                if !blocked {
                    finalize(current, by_id, resolved);
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}

/// Compute the final start date for `id` from its already-resolved
/// predecessors and record it in the memo table.
fn finalize(
    id: TaskId,
    by_id: &FxHashMap<TaskId, &Task>,
    resolved: &mut FxHashMap<TaskId, Resolution>,
) {
    let Some(task) = by_id.get(&id) else {
        return;
    };

    let mut latest_dep_end: Option<NaiveDate> = None;
    for &dep_id in &task.dependencies {
        let Some(dep_task) = by_id.get(&dep_id) else {
            continue;
        };
        let dep_start = match resolved.get(&dep_id) {
            Some(Resolution::Done(date)) => *date,
            _ => dep_task.start_date,
        };
        let dep_end = calendar::calculate_end_date(dep_start, dep_task.duration);
        if latest_dep_end.map_or(true, |current| dep_end > current) {
            latest_dep_end = Some(dep_end);
        }
    }

    let start_date = match latest_dep_end {
        Some(end) => {
            let earliest = calendar::next_working_day(end);
            if task.start_date > earliest {
                // The stored date stays the anchor; a weekend anchor rolls
                // to the next working day.
                if calendar::is_weekend_day(task.start_date) {
                    calendar::next_working_day(task.start_date)
                } else {
                    task.start_date
                }
            } else {
                earliest
            }
        }
        None => task.start_date,
    };

    trace!(task_id = id, start = %start_date, "finalized start date");
    resolved.insert(id, Resolution::Done(start_date));
}
