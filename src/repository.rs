//! In-memory task repository with soft-delete archives.
//!
//! `TaskRepository` owns the active list, the archive of deleted tasks and the
//! archive of deleted subtasks. Positions at this interface are 1-based.
//! After every structural change of the active list the priorities are
//! renumbered so that each task's priority equals its position.

use serde::Serialize;
use tracing::debug;

use crate::error::TaskError;
use crate::fields::TextField;
use crate::task::{ArchivedSubtask, Task};

/// Default cap on the number of active tasks.
pub const DEFAULT_MAX_TASKS: usize = 200;

/// A deleted subtask as shown to the user, with its parent resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedSubtaskView {
    pub text: String,
    pub original_position: usize,
    /// Current description of the parent, if it is still in the active list.
    pub parent: Option<String>,
}

#[derive(Debug)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    deleted_tasks: Vec<Task>,
    deleted_subtasks: Vec<ArchivedSubtask>,
    max_tasks: usize,
    next_id: u64,
}

impl Default for TaskRepository {
    fn default() -> Self {
        TaskRepository::new(DEFAULT_MAX_TASKS)
    }
}

impl TaskRepository {
    pub fn new(max_tasks: usize) -> Self {
        TaskRepository {
            tasks: Vec::new(),
            deleted_tasks: Vec::new(),
            deleted_subtasks: Vec::new(),
            max_tasks,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.max_tasks
    }

    pub fn max_tasks(&self) -> usize {
        self.max_tasks
    }

    /// Independent copy of the active list in priority order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Copy of the deleted tasks, oldest deletion first.
    pub fn archived_tasks(&self) -> Vec<Task> {
        self.deleted_tasks.clone()
    }

    /// Deleted subtasks with their parents resolved against the active list.
    pub fn archived_subtasks(&self) -> Vec<ArchivedSubtaskView> {
        self.deleted_subtasks
            .iter()
            .map(|entry| ArchivedSubtaskView {
                text: entry.text.clone(),
                original_position: entry.task_position,
                parent: self.find(entry.task_id).map(|(_, t)| t.description().to_string()),
            })
            .collect()
    }

    /// The task at a 1-based `index`.
    pub fn get(&self, index: usize) -> Result<&Task, TaskError> {
        let idx = slot(index, self.tasks.len())?;
        Ok(&self.tasks[idx])
    }

    /// Append a new task at the end of the list.
    pub fn add(&mut self, description: &str) -> Result<Task, TaskError> {
        if self.is_full() {
            return Err(TaskError::ListFull { max: self.max_tasks });
        }
        let description = TextField::Description.validate(description)?;

        let id = self.next_id;
        self.next_id += 1;
        let task = Task::new(id, description, self.tasks.len() + 1);
        self.tasks.push(task.clone());
        debug!(id, count = self.tasks.len(), "task added");
        Ok(task)
    }

    /// Replace the description of the task at `index`.
    pub fn edit(&mut self, index: usize, description: &str) -> Result<(), TaskError> {
        let idx = slot(index, self.tasks.len())?;
        let description = TextField::Description.validate(description)?;
        self.tasks[idx].set_description(description);
        debug!(index, "task edited");
        Ok(())
    }

    /// Move the task at `index` into the archive.
    pub fn remove(&mut self, index: usize) -> Result<Task, TaskError> {
        let idx = slot(index, self.tasks.len())?;
        let task = self.tasks.remove(idx);
        self.deleted_tasks.push(task.clone());
        self.renumber();
        debug!(id = task.id(), index, archived = self.deleted_tasks.len(), "task archived");
        Ok(task)
    }

    /// Bring an archived task back at the end of the active list.
    pub fn restore(&mut self, archive_index: usize) -> Result<Task, TaskError> {
        if self.deleted_tasks.is_empty() {
            return Err(TaskError::ArchiveEmpty);
        }
        let idx = slot(archive_index, self.deleted_tasks.len())?;
        if self.is_full() {
            return Err(TaskError::ListFull { max: self.max_tasks });
        }
        let task = self.deleted_tasks.remove(idx);
        self.tasks.push(task);
        self.renumber();
        let restored = self.tasks[self.tasks.len() - 1].clone();
        debug!(id = restored.id(), priority = restored.priority(), "task restored");
        Ok(restored)
    }

    /// Append a subtask to the task at `index`.
    pub fn add_subtask(&mut self, index: usize, text: &str) -> Result<(), TaskError> {
        let idx = slot(index, self.tasks.len())?;
        let text = TextField::Subtask.validate(text)?;
        self.tasks[idx].push_subtask(text);
        debug!(index, subtasks = self.tasks[idx].subtasks().len(), "subtask added");
        Ok(())
    }

    /// Delete subtask `subtask_index` of task `index` into the subtask archive.
    pub fn remove_subtask(&mut self, index: usize, subtask_index: usize) -> Result<String, TaskError> {
        let idx = slot(index, self.tasks.len())?;
        let task = &mut self.tasks[idx];
        if task.subtasks().is_empty() {
            return Err(TaskError::NoSubtasks { index });
        }
        let sub_idx = slot(subtask_index, task.subtasks().len())?;
        let Some(text) = task.remove_subtask(sub_idx) else {
            return Err(TaskError::InvalidIndex { index: subtask_index, max: task.subtasks().len() });
        };
        self.deleted_subtasks.push(ArchivedSubtask {
            task_id: task.id(),
            task_position: index,
            text: text.clone(),
        });
        debug!(task_id = task.id(), index, subtask_index, "subtask archived");
        Ok(text)
    }

    /// Restore an archived subtask to the end of its parent's subtasks.
    ///
    /// The archive entry is consumed even when the parent is gone; in that
    /// case the call fails with `StaleParent`. On success returns the parent's
    /// current position and a copy of it.
    pub fn restore_subtask(&mut self, archive_index: usize) -> Result<(usize, Task), TaskError> {
        if self.deleted_subtasks.is_empty() {
            return Err(TaskError::ArchiveEmpty);
        }
        let idx = slot(archive_index, self.deleted_subtasks.len())?;
        let entry = self.deleted_subtasks.remove(idx);

        let Some(pos) = self.tasks.iter().position(|t| t.id() == entry.task_id) else {
            debug!(task_id = entry.task_id, "subtask archive entry dropped, parent is gone");
            return Err(TaskError::StaleParent { subtask: entry.text });
        };
        let parent = &mut self.tasks[pos];
        parent.push_subtask(entry.text);
        debug!(task_id = parent.id(), position = pos + 1, "subtask restored");
        Ok((pos + 1, parent.clone()))
    }

    /// Set or replace the deadline of the task at `index`.
    pub fn set_deadline(&mut self, index: usize, text: &str) -> Result<(), TaskError> {
        let idx = slot(index, self.tasks.len())?;
        let deadline = TextField::Deadline.validate(text)?;
        self.tasks[idx].set_deadline(deadline);
        debug!(index, "deadline set");
        Ok(())
    }

    /// Move the task at `index` so that its priority becomes `new_priority`.
    pub fn reprioritize(&mut self, index: usize, new_priority: usize) -> Result<(), TaskError> {
        let idx = slot(index, self.tasks.len())?;
        let max = self.tasks.len();
        if new_priority < 1 || new_priority > max {
            return Err(TaskError::OutOfRange { priority: new_priority, max });
        }
        let task = self.tasks.remove(idx);
        self.tasks.insert(new_priority - 1, task);
        self.renumber();
        debug!(from = index, to = new_priority, "task reprioritized");
        Ok(())
    }

    fn find(&self, id: u64) -> Option<(usize, &Task)> {
        self.tasks.iter().enumerate().find(|(_, t)| t.id() == id)
    }

    fn renumber(&mut self) {
        for (i, t) in self.tasks.iter_mut().enumerate() {
            t.set_priority(i + 1);
        }
    }
}

/// Convert a 1-based `index` into a 0-based slot of a list of `len` items.
fn slot(index: usize, len: usize) -> Result<usize, TaskError> {
    if index < 1 || index > len {
        return Err(TaskError::InvalidIndex { index, max: len });
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repo_with(descriptions: &[&str]) -> TaskRepository {
        let mut repo = TaskRepository::default();
        for d in descriptions {
            repo.add(d).unwrap();
        }
        repo
    }

    fn descriptions(repo: &TaskRepository) -> Vec<String> {
        repo.snapshot().iter().map(|t| t.description().to_string()).collect()
    }

    fn priorities(repo: &TaskRepository) -> Vec<usize> {
        repo.snapshot().iter().map(|t| t.priority()).collect()
    }

    fn assert_priorities_match_positions(repo: &TaskRepository) {
        let expected: Vec<usize> = (1..=repo.len()).collect();
        assert_eq!(priorities(repo), expected);
    }

    #[test]
    fn test_add_appends_with_next_priority() {
        let mut repo = TaskRepository::default();
        let first = repo.add("Buy milk").unwrap();
        let second = repo.add("  Write report  ").unwrap();
        assert_eq!(first.priority(), 1);
        assert_eq!(second.priority(), 2);
        assert_eq!(second.description(), "Write report");
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_add_rejects_blank_and_long() {
        let mut repo = TaskRepository::default();
        assert_eq!(repo.add("   ").unwrap_err(), TaskError::EmptyInput);
        assert_eq!(repo.add(&"x".repeat(501)).unwrap_err(), TaskError::TooLong { max: 500 });
        assert!(repo.add(&"x".repeat(500)).is_ok());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_add_fails_when_full() {
        let mut repo = TaskRepository::default();
        for i in 0..DEFAULT_MAX_TASKS {
            repo.add(&format!("task {i}")).unwrap();
        }
        assert_eq!(repo.add("one too many").unwrap_err(), TaskError::ListFull { max: 200 });
        assert_eq!(repo.len(), 200);
    }

    #[test]
    fn test_edit_keeps_priority_and_timestamp() {
        let mut repo = repo_with(&["A", "B"]);
        let before = repo.snapshot()[1].clone();
        repo.edit(2, "B2").unwrap();
        let after = repo.snapshot()[1].clone();
        assert_eq!(after.description(), "B2");
        assert_eq!(after.priority(), before.priority());
        assert_eq!(after.created_at(), before.created_at());
        assert_eq!(after.id(), before.id());
    }

    #[test]
    fn test_edit_invalid_index_leaves_list_unchanged() {
        let mut repo = repo_with(&["A"]);
        assert_eq!(repo.edit(0, "X").unwrap_err(), TaskError::InvalidIndex { index: 0, max: 1 });
        assert_eq!(repo.edit(2, "X").unwrap_err(), TaskError::InvalidIndex { index: 2, max: 1 });
        assert_eq!(repo.edit(1, " ").unwrap_err(), TaskError::EmptyInput);
        assert_eq!(descriptions(&repo), vec!["A"]);
    }

    #[test]
    fn test_remove_archives_and_renumbers() {
        let mut repo = repo_with(&["A", "B", "C"]);
        let removed = repo.remove(1).unwrap();
        assert_eq!(removed.description(), "A");
        assert_eq!(descriptions(&repo), vec!["B", "C"]);
        assert_priorities_match_positions(&repo);
        assert_eq!(repo.archived_tasks().len(), 1);
        assert_eq!(repo.archived_tasks()[0].description(), "A");
    }

    #[test]
    fn test_remove_then_restore_returns_task_at_end() {
        let mut repo = repo_with(&["A", "B", "C"]);
        repo.remove(2).unwrap();
        let restored = repo.restore(1).unwrap();
        assert_eq!(restored.description(), "B");
        assert_eq!(restored.priority(), 3);
        assert_eq!(descriptions(&repo), vec!["A", "C", "B"]);
        assert_priorities_match_positions(&repo);
        assert!(repo.archived_tasks().is_empty());
    }

    #[test]
    fn test_restore_errors() {
        let mut repo = repo_with(&["A"]);
        assert_eq!(repo.restore(1).unwrap_err(), TaskError::ArchiveEmpty);
        repo.remove(1).unwrap();
        assert_eq!(repo.restore(2).unwrap_err(), TaskError::InvalidIndex { index: 2, max: 1 });
        assert_eq!(repo.archived_tasks().len(), 1);
    }

    #[test]
    fn test_restore_into_full_list_keeps_archive() {
        let mut repo = TaskRepository::new(2);
        repo.add("A").unwrap();
        repo.add("B").unwrap();
        repo.remove(1).unwrap();
        repo.add("C").unwrap();
        assert_eq!(repo.restore(1).unwrap_err(), TaskError::ListFull { max: 2 });
        assert_eq!(repo.archived_tasks().len(), 1);
        assert_eq!(descriptions(&repo), vec!["B", "C"]);
    }

    #[test]
    fn test_each_archive_entry_restores_once() {
        let mut repo = repo_with(&["A"]);
        repo.remove(1).unwrap();
        repo.restore(1).unwrap();
        assert_eq!(repo.restore(1).unwrap_err(), TaskError::ArchiveEmpty);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_reprioritize_moves_task() {
        let mut repo = repo_with(&["Buy milk", "Write report"]);
        repo.reprioritize(2, 1).unwrap();
        assert_eq!(descriptions(&repo), vec!["Write report", "Buy milk"]);
        assert_eq!(priorities(&repo), vec![1, 2]);
    }

    #[test]
    fn test_reprioritize_down_is_stable_move() {
        let mut repo = repo_with(&["A", "B", "C", "D"]);
        repo.reprioritize(1, 3).unwrap();
        assert_eq!(descriptions(&repo), vec!["B", "C", "A", "D"]);
        assert_priorities_match_positions(&repo);
    }

    #[test]
    fn test_reprioritize_out_of_range() {
        let mut repo = repo_with(&["A", "B"]);
        assert_eq!(repo.reprioritize(1, 0).unwrap_err(), TaskError::OutOfRange { priority: 0, max: 2 });
        assert_eq!(repo.reprioritize(1, 3).unwrap_err(), TaskError::OutOfRange { priority: 3, max: 2 });
        assert_eq!(repo.reprioritize(3, 1).unwrap_err(), TaskError::InvalidIndex { index: 3, max: 2 });
        assert_eq!(descriptions(&repo), vec!["A", "B"]);
    }

    #[test]
    fn test_priorities_hold_across_mixed_operations() {
        let mut repo = repo_with(&["A", "B", "C", "D", "E"]);
        repo.remove(3).unwrap();
        assert_priorities_match_positions(&repo);
        repo.reprioritize(4, 1).unwrap();
        assert_priorities_match_positions(&repo);
        repo.restore(1).unwrap();
        assert_priorities_match_positions(&repo);
        repo.remove(1).unwrap();
        repo.add("F").unwrap();
        assert_priorities_match_positions(&repo);
        assert_eq!(descriptions(&repo), vec!["A", "B", "D", "C", "F"]);
    }

    #[test]
    fn test_subtask_validation() {
        let mut repo = repo_with(&["A"]);
        assert_eq!(repo.add_subtask(1, "  ").unwrap_err(), TaskError::EmptyInput);
        assert_eq!(repo.add_subtask(1, &"s".repeat(201)).unwrap_err(), TaskError::TooLong { max: 200 });
        assert_eq!(repo.add_subtask(2, "sub").unwrap_err(), TaskError::InvalidIndex { index: 2, max: 1 });
        assert!(repo.snapshot()[0].subtasks().is_empty());
    }

    #[test]
    fn test_remove_subtask_errors() {
        let mut repo = repo_with(&["A"]);
        assert_eq!(repo.remove_subtask(1, 1).unwrap_err(), TaskError::NoSubtasks { index: 1 });
        repo.add_subtask(1, "sub1").unwrap();
        assert_eq!(repo.remove_subtask(1, 2).unwrap_err(), TaskError::InvalidIndex { index: 2, max: 1 });
        assert!(repo.archived_subtasks().is_empty());
    }

    #[test]
    fn test_subtask_round_trip() {
        let mut repo = repo_with(&["A", "B"]);
        repo.add_subtask(2, "first").unwrap();
        repo.add_subtask(2, "second").unwrap();
        assert_eq!(repo.remove_subtask(2, 1).unwrap(), "first");
        let (position, parent) = repo.restore_subtask(1).unwrap();
        assert_eq!(position, 2);
        assert_eq!(parent.subtasks(), ["second".to_string(), "first".to_string()]);
        assert!(repo.archived_subtasks().is_empty());
    }

    #[test]
    fn test_subtask_follows_parent_after_reorder() {
        let mut repo = repo_with(&["A", "B"]);
        repo.add_subtask(1, "sub").unwrap();
        repo.remove_subtask(1, 1).unwrap();
        repo.reprioritize(1, 2).unwrap();
        let (position, parent) = repo.restore_subtask(1).unwrap();
        assert_eq!(position, 2);
        assert_eq!(parent.description(), "A");
        assert_eq!(parent.subtasks(), ["sub".to_string()]);
    }

    #[test]
    fn test_stale_parent_consumes_entry() {
        let mut repo = repo_with(&["A"]);
        repo.add_subtask(1, "sub1").unwrap();
        repo.remove_subtask(1, 1).unwrap();
        let views = repo.archived_subtasks();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].original_position, 1);
        assert_eq!(views[0].parent.as_deref(), Some("A"));

        repo.remove(1).unwrap();
        assert_eq!(repo.archived_subtasks()[0].parent, None);
        assert_eq!(
            repo.restore_subtask(1).unwrap_err(),
            TaskError::StaleParent { subtask: "sub1".to_string() }
        );
        assert!(repo.archived_subtasks().is_empty());
        assert_eq!(repo.restore_subtask(1).unwrap_err(), TaskError::ArchiveEmpty);
    }

    #[test]
    fn test_restore_subtask_bad_index_keeps_archive() {
        let mut repo = repo_with(&["A"]);
        repo.add_subtask(1, "sub1").unwrap();
        repo.remove_subtask(1, 1).unwrap();
        assert_eq!(repo.restore_subtask(2).unwrap_err(), TaskError::InvalidIndex { index: 2, max: 1 });
        assert_eq!(repo.restore_subtask(0).unwrap_err(), TaskError::InvalidIndex { index: 0, max: 1 });
        assert_eq!(repo.archived_subtasks().len(), 1);
        assert!(repo.snapshot()[0].subtasks().is_empty());
    }

    #[test]
    fn test_get() {
        let repo = repo_with(&["A", "B"]);
        assert_eq!(repo.get(2).unwrap().description(), "B");
        assert_eq!(repo.get(3).unwrap_err(), TaskError::InvalidIndex { index: 3, max: 2 });
    }

    #[test]
    fn test_restored_parent_accepts_subtask_again() {
        let mut repo = repo_with(&["A", "B"]);
        repo.add_subtask(1, "sub").unwrap();
        repo.remove_subtask(1, 1).unwrap();
        repo.remove(1).unwrap();
        repo.restore(1).unwrap();
        let (position, parent) = repo.restore_subtask(1).unwrap();
        assert_eq!(position, 2);
        assert_eq!(parent.description(), "A");
    }

    #[test]
    fn test_set_deadline() {
        let mut repo = repo_with(&["A"]);
        repo.set_deadline(1, " friday ").unwrap();
        assert_eq!(repo.snapshot()[0].deadline(), Some("friday"));
        assert_eq!(repo.set_deadline(1, &"d".repeat(101)).unwrap_err(), TaskError::TooLong { max: 100 });
        assert_eq!(repo.snapshot()[0].deadline(), Some("friday"));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let repo = repo_with(&["A"]);
        let mut snap = repo.snapshot();
        snap.clear();
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_archives_grow_without_bound() {
        let mut repo = TaskRepository::new(1);
        for i in 0..50 {
            repo.add(&format!("task {i}")).unwrap();
            repo.remove(1).unwrap();
        }
        assert!(repo.is_empty());
        assert_eq!(repo.archived_tasks().len(), 50);
    }
}
