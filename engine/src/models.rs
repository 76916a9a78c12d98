//! Core data types for the scheduling engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a task, unique within a collection.
pub type TaskId = u32;

/// A task on the project board.
///
/// The surrounding application keeps the whole collection as JSON, so the
/// serialized form uses its camelCase field names and tolerates an absent
/// `dependencies` list. `start_date` crosses that boundary as an ISO
/// `YYYY-MM-DD` string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Display name; the engine uses it only in validation messages.
    pub name: String,
    /// Scheduled start. Rewritten by date recalculation; for tasks without
    /// predecessors it is the user-set anchor and is left untouched.
    pub start_date: NaiveDate,
    /// Number of working days the task occupies. Must be at least 1.
    pub duration: u32,
    /// Ids of tasks that must finish before this one starts.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

/// A prospective dependency edge, checked before an edit is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub successor_id: TaskId,
    pub predecessor_id: TaskId,
}

/// Outcome of a collection-wide dependency validation.
///
/// `errors` holds human-readable messages; callers surface the first one
/// and discard the attempted edit when `is_valid` is false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}
