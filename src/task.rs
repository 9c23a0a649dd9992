//! Task data structure and related functionality.
//!
//! This module defines the `Task` entity kept in the active list and the
//! archive, plus the record left behind when a subtask is deleted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single work item with an optional deadline and ordered subtasks.
///
/// Only the repository mutates tasks; everyone else sees clones taken
/// through a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: u64,
    description: String,
    created_at: DateTime<Utc>,
    priority: usize,
    deadline: Option<String>,
    subtasks: Vec<String>,
}

impl Task {
    /// Create a task stamped with the current time.
    pub fn new(id: u64, description: impl Into<String>, priority: usize) -> Self {
        Self::created(id, description, priority, Utc::now())
    }

    /// Create a task with an explicit creation timestamp.
    pub fn created(id: u64, description: impl Into<String>, priority: usize, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            description: description.into(),
            created_at,
            priority,
            deadline: None,
            subtasks: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_deref()
    }

    pub fn subtasks(&self) -> &[String] {
        &self.subtasks
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_priority(&mut self, priority: usize) {
        self.priority = priority;
    }

    pub(crate) fn set_deadline(&mut self, deadline: String) {
        self.deadline = Some(deadline);
    }

    /// Append a subtask. Blank text is ignored.
    pub(crate) fn push_subtask(&mut self, text: String) {
        if !text.trim().is_empty() {
            self.subtasks.push(text);
        }
    }

    /// Remove the subtask at a 0-based position.
    pub(crate) fn remove_subtask(&mut self, idx: usize) -> Option<String> {
        (idx < self.subtasks.len()).then(|| self.subtasks.remove(idx))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if let Some(deadline) = &self.deadline {
            write!(f, " ----- until: {deadline}")?;
        }
        Ok(())
    }
}

/// A deleted subtask waiting for a possible restore.
///
/// The parent is referenced by id; `task_position` is only the position the
/// parent had when the subtask was deleted and is kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedSubtask {
    pub task_id: u64,
    pub task_position: usize,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_defaults() {
        let t = Task::new(7, "Buy milk", 3);
        assert_eq!(t.id(), 7);
        assert_eq!(t.description(), "Buy milk");
        assert_eq!(t.priority(), 3);
        assert_eq!(t.deadline(), None);
        assert!(t.subtasks().is_empty());
    }

    #[test]
    fn test_blank_subtask_is_ignored() {
        let mut t = Task::new(1, "A", 1);
        t.push_subtask("  ".into());
        t.push_subtask("sub1".into());
        assert_eq!(t.subtasks(), ["sub1".to_string()]);
    }

    #[test]
    fn test_remove_subtask_out_of_range() {
        let mut t = Task::new(1, "A", 1);
        t.push_subtask("one".into());
        assert_eq!(t.remove_subtask(1), None);
        assert_eq!(t.remove_subtask(0), Some("one".to_string()));
        assert!(t.subtasks().is_empty());
    }

    #[test]
    fn test_display_includes_deadline() {
        let mut t = Task::new(1, "Write report", 1);
        assert_eq!(t.to_string(), "Write report");
        t.set_deadline("friday".into());
        assert_eq!(t.to_string(), "Write report ----- until: friday");
    }
}
