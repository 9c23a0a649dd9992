use clap::Parser;

use crate::cmd::Commands;
use crate::fields::OutputFormat;
use crate::repository::DEFAULT_MAX_TASKS;

/// Menu-driven task list manager.
/// State lives for the lifetime of the process only.
#[derive(Parser)]
#[command(name = "todo", version, about = "Menu-driven task list manager")]
pub struct Cli {
    /// Maximum number of active tasks.
    #[arg(long, env = "TODO_MAX_TASKS", default_value_t = DEFAULT_MAX_TASKS, global = true)]
    pub max_tasks: usize,

    /// How task listings are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log filter for diagnostics on stderr (RUST_LOG takes precedence).
    #[arg(long, env = "TODO_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
