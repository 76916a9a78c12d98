//! Dependency graph validation and queries.
//!
//! Edges run successor -> predecessor: a task lists the ids of tasks that
//! must finish before it starts. Traversals use explicit work stacks, so
//! pathological graph depth cannot exhaust the call stack.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::models::{DependencyEdge, Task, TaskId, ValidationReport};

/// Adjacency view of the declared predecessor edges.
type AdjacencyMap = FxHashMap<TaskId, FxHashSet<TaskId>>;

/// One step of the iterative depth-first traversal.
enum Step {
    Enter(TaskId),
    Leave(TaskId),
}

fn build_adjacency(tasks: &[Task], extra_edge: Option<DependencyEdge>) -> AdjacencyMap {
    let mut adjacency: AdjacencyMap =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        // Duplicate predecessor ids collapse into a single edge here.
        if !task.dependencies.is_empty() {
            adjacency
                .entry(task.id)
                .or_default()
                .extend(task.dependencies.iter().copied());
        }
    }
    if let Some(edge) = extra_edge {
        adjacency
            .entry(edge.successor_id)
            .or_default()
            .insert(edge.predecessor_id);
    }
    adjacency
}

/// Check whether the declared dependency edges contain a cycle.
///
/// When `new_edge` is supplied (an edit that has not been committed yet),
/// it is merged into the adjacency view before traversal, so callers can
/// probe an edit without applying it. A self-dependency is a cycle of
/// length one.
pub fn has_cyclic_dependency(tasks: &[Task], new_edge: Option<DependencyEdge>) -> bool {
    let adjacency = build_adjacency(tasks, new_edge);
    let mut visited: FxHashSet<TaskId> = FxHashSet::default();

    for &root in adjacency.keys() {
        if !visited.contains(&root) && dfs_finds_back_edge(&adjacency, root, &mut visited) {
            return true;
        }
    }
    false
}

/// Depth-first traversal from `root`, reporting whether a node still on
/// the traversal stack is re-entered (a back edge).
fn dfs_finds_back_edge(
    adjacency: &AdjacencyMap,
    root: TaskId,
    visited: &mut FxHashSet<TaskId>,
) -> bool {
    let mut on_stack: FxHashSet<TaskId> = FxHashSet::default();
    let mut steps = vec![Step::Enter(root)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node) => {
                if on_stack.contains(&node) {
                    return true;
                }
                if !visited.insert(node) {
                    continue; // fully explored from an earlier root
                }
                on_stack.insert(node);
                steps.push(Step::Leave(node));
                if let Some(predecessors) = adjacency.get(&node) {
                    for &dep_id in predecessors {
                        steps.push(Step::Enter(dep_id));
                    }
                }
            }
            Step::Leave(node) => {
                on_stack.remove(&node);
            }
        }
    }
    false
}

/// Validate every declared dependency edge in the collection.
///
/// Every referenced predecessor id must exist, every duration must cover
/// at least one working day, and the edges must form a DAG. The first
/// cycle found appends one error and ends cycle checking. This is the
/// gate callers must pass before recalculating dates; on failure the
/// attempted edit is discarded and the last-known-valid collection kept.
pub fn validate_dependencies(tasks: &[Task]) -> ValidationReport {
    let mut errors = Vec::new();
    let task_ids: FxHashSet<TaskId> = tasks.iter().map(|task| task.id).collect();

    for task in tasks {
        for &dep_id in &task.dependencies {
            if !task_ids.contains(&dep_id) {
                errors.push(format!(
                    "Task \"{}\" depends on non-existent task with ID {}",
                    task.name, dep_id
                ));
            }
        }
    }

    for task in tasks {
        if task.duration == 0 {
            errors.push(format!(
                "Task \"{}\" must have a duration of at least one working day",
                task.name
            ));
        }
    }

    'cycles: for task in tasks {
        for &dep_id in &task.dependencies {
            let edge = DependencyEdge {
                successor_id: task.id,
                predecessor_id: dep_id,
            };
            if has_cyclic_dependency(tasks, Some(edge)) {
                debug!(task_id = task.id, "cyclic dependency detected");
                errors.push(format!(
                    "Cyclic dependency detected involving task \"{}\"",
                    task.name
                ));
                break 'cycles;
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Tasks that may legally be added as predecessors of `for_task_id`.
///
/// Excludes the task itself and every task already downstream of it: a
/// candidate with an existing dependency path to `for_task_id` would close
/// a loop if pointed to.
pub fn available_predecessors(tasks: &[Task], for_task_id: TaskId) -> Vec<&Task> {
    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|task| (task.id, task)).collect();

    tasks
        .iter()
        .filter(|candidate| {
            candidate.id != for_task_id && !has_path(&by_id, candidate.id, for_task_id)
        })
        .collect()
}

/// Whether a directed path exists from `from` to `to` along declared
/// predecessor edges.
fn has_path(by_id: &FxHashMap<TaskId, &Task>, from: TaskId, to: TaskId) -> bool {
    let mut visited: FxHashSet<TaskId> = FxHashSet::default();
    let mut stack = vec![from];

    while let Some(id) = stack.pop() {
        if id == to {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        if let Some(task) = by_id.get(&id) {
            stack.extend(task.dependencies.iter().copied());
        }
    }
    false
}

/// Tasks that list `task_id` as a direct predecessor, in input order.
pub fn dependent_tasks(tasks: &[Task], task_id: TaskId) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.dependencies.contains(&task_id))
        .collect()
}
