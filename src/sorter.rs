//! View-only ordering and searching of task snapshots.
//!
//! Nothing here touches the repository: every function takes a snapshot and
//! returns a new sequence. Reordering that persists is `reprioritize`.

use crate::fields::SortKey;
use crate::task::Task;

/// Ascending by priority. Ties keep their relative order.
pub fn by_priority(snapshot: &[Task]) -> Vec<Task> {
    let mut out = snapshot.to_vec();
    out.sort_by_key(|t| t.priority());
    out
}

/// Ascending by creation time. Ties keep their relative order.
pub fn by_created_date(snapshot: &[Task]) -> Vec<Task> {
    let mut out = snapshot.to_vec();
    out.sort_by_key(|t| t.created_at());
    out
}

pub fn sorted(snapshot: &[Task], key: SortKey) -> Vec<Task> {
    match key {
        SortKey::Priority => by_priority(snapshot),
        SortKey::Created => by_created_date(snapshot),
    }
}

/// One task that matched a search, with the subtasks that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// 1-based position in the searched snapshot.
    pub position: usize,
    pub task: &'a Task,
    /// Whether the task's own text (description or deadline) matched.
    pub task_matched: bool,
    /// Matching subtasks as (1-based subtask position, text).
    pub subtasks: Vec<(usize, &'a str)>,
}

/// Case-insensitive substring search over tasks and their subtasks.
pub fn search<'a>(snapshot: &'a [Task], needle: &str) -> Vec<SearchHit<'a>> {
    let needle = needle.to_lowercase();
    snapshot
        .iter()
        .enumerate()
        .filter_map(|(i, task)| {
            let task_matched = task.description().to_lowercase().contains(&needle)
                || task.deadline().is_some_and(|d| d.to_lowercase().contains(&needle));
            let subtasks: Vec<(usize, &str)> = task
                .subtasks()
                .iter()
                .enumerate()
                .filter(|(_, s)| s.to_lowercase().contains(&needle))
                .map(|(j, s)| (j + 1, s.as_str()))
                .collect();
            (task_matched || !subtasks.is_empty()).then(|| SearchHit {
                position: i + 1,
                task,
                task_matched,
                subtasks,
            })
        })
        .collect()
}
