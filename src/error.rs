//! Error types for the task list.
//!
//! Every variant renders as a single user-facing line, so the shell can print
//! the `Display` output directly and go back to the menu.

use std::io;

use thiserror::Error;

/// Recoverable failures of a repository operation or of user input.
///
/// None of these leave the repository partially modified: all preconditions
/// are checked before anything is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("cannot be empty")]
    EmptyInput,

    #[error("too long! maximum {max} characters")]
    TooLong { max: usize },

    #[error("enter a correct number please (1 - {max}), got {index}")]
    InvalidIndex { index: usize, max: usize },

    #[error("enter a number please, \"{input}\" is not one")]
    NotANumber { input: String },

    #[error("enter a positive number please, got {value}")]
    NotPositive { value: i64 },

    #[error("input is not valid UTF-8, try again")]
    NotUtf8,

    #[error("cannot add more tasks! maximum limit reached ({max})")]
    ListFull { max: usize },

    #[error("archive is empty, nothing to restore")]
    ArchiveEmpty,

    #[error("enter correct format (like: 1.2), got \"{input}\"")]
    MalformedCoordinate { input: String },

    #[error("cannot restore subtask \"{subtask}\" - original task no longer exists")]
    StaleParent { subtask: String },

    #[error("priority must be between 1 and {max}, got {priority}")]
    OutOfRange { priority: usize, max: usize },

    #[error("first of all, your list is empty...")]
    EmptyList,

    #[error("task {index} has no subtasks")]
    NoSubtasks { index: usize },

    #[error("subtask {task}.{subtask} does not belong to task {expected}")]
    CoordinateMismatch { expected: usize, task: usize, subtask: usize },
}

/// Anything that can interrupt one menu action.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Input reached end-of-file while waiting for the user.
    #[error("input closed")]
    Closed,
}
