//! Critical path computation over the dependency DAG.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::models::{Task, TaskId};

/// One exploration frame: a task on the current chain and how many of its
/// predecessor branches have been tried.
struct Frame<'a> {
    task: &'a Task,
    next_dep: usize,
}

/// Identify the duration-maximal chain of dependent tasks, start to finish.
///
/// Terminal tasks (listed as a predecessor by no other task) seed the
/// search; every predecessor chain is explored and the chain with the
/// greatest summed duration wins. Ties keep the first chain found, where
/// exploration follows each task's `dependencies` order and terminals are
/// taken in input order; that ordering is implementation-defined rather
/// than a guarantee. An empty collection yields an empty path.
pub fn critical_path(tasks: &[Task]) -> Vec<TaskId> {
    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|task| (task.id, task)).collect();

    let mut has_successors: FxHashSet<TaskId> = FxHashSet::default();
    for task in tasks {
        has_successors.extend(task.dependencies.iter().copied());
    }

    let mut best_path: Vec<TaskId> = Vec::new();
    let mut best_duration: u64 = 0;

    for terminal in tasks.iter().filter(|task| !has_successors.contains(&task.id)) {
        explore_chains(terminal, &by_id, &mut best_path, &mut best_duration);
    }

    debug!(
        tasks = best_path.len(),
        total_duration = best_duration,
        "critical path selected"
    );
    best_path
}

/// Walk every predecessor chain from `terminal` with an explicit frame
/// stack, keeping the duration-maximal chain seen so far.
///
/// A chain is complete only when it reaches a task with no declared
/// predecessors; a branch that dead-ends at a missing id records nothing.
/// Nodes already on the current chain are never re-entered, so
/// precondition-violating cyclic input terminates instead of looping.
fn explore_chains<'a>(
    terminal: &'a Task,
    by_id: &FxHashMap<TaskId, &'a Task>,
    best_path: &mut Vec<TaskId>,
    best_duration: &mut u64,
) {
    let mut frames: Vec<Frame<'a>> = vec![Frame {
        task: terminal,
        next_dep: 0,
    }];
    let mut on_chain: FxHashSet<TaskId> = FxHashSet::from_iter([terminal.id]);
    let mut chain_duration = u64::from(terminal.duration);

    while let Some(frame) = frames.last_mut() {
        let task = frame.task;
        let dep_index = frame.next_dep;

        if dep_index < task.dependencies.len() {
            frame.next_dep += 1;
            let dep_id = task.dependencies[dep_index];
            if let Some(&dep_task) = by_id.get(&dep_id) {
                if on_chain.insert(dep_id) {
                    chain_duration += u64::from(dep_task.duration);
                    frames.push(Frame {
                        task: dep_task,
                        next_dep: 0,
                    });
                }
            }
            continue;
        }

        // Chain reached a root: a complete candidate.
        if task.dependencies.is_empty() && chain_duration > *best_duration {
            *best_duration = chain_duration;
            *best_path = frames.iter().rev().map(|frame| frame.task.id).collect();
        }

        on_chain.remove(&task.id);
        chain_duration -= u64::from(task.duration);
        frames.pop();
    }
}
