//! Field rules and enumerations shared by the repository, sorter and shell.
//!
//! This module defines the length limits for every free-text field, the
//! available view-only sort orders, and the output formats of the renderer.

use clap::ValueEnum;

use crate::error::TaskError;

/// Free-text inputs with their length ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Description,
    Subtask,
    Deadline,
    Search,
}

impl TextField {
    /// Maximum length in characters.
    pub fn max_len(self) -> usize {
        match self {
            TextField::Description => 500,
            TextField::Subtask => 200,
            TextField::Deadline => 100,
            TextField::Search => 50,
        }
    }

    /// Trim `raw` and check it against this field's rules.
    pub fn validate(self, raw: &str) -> Result<String, TaskError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(TaskError::EmptyInput);
        }
        let max = self.max_len();
        if value.chars().count() > max {
            return Err(TaskError::TooLong { max });
        }
        Ok(value.to_string())
    }
}

/// View-only orderings of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Created,
}

/// How listings are written to the console.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
