//! # todo - menu-driven task list manager
//!
//! A small interactive console program for keeping a prioritised task list.
//!
//! ## Key Features
//!
//! - **Positional priorities**: a task's priority is always its place in the list;
//!   moving one task renumbers the rest
//! - **Subtasks and deadlines**: annotate any task with ordered subtasks and a free-text deadline
//! - **Soft delete**: deleted tasks and subtasks go to an archive and can be restored once
//! - **Views**: sort by priority or creation date, case-insensitive search across subtasks
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the menu
//! todo
//!
//! # Cap the list at 50 tasks and print listings as JSON
//! todo --max-tasks 50 --format json
//!
//! # Diagnostics on stderr
//! RUST_LOG=debug todo
//! ```
//!
//! Nothing is written to disk: the list lives as long as the process.

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod colors;
pub mod error;
pub mod fields;
pub mod render;
pub mod repository;
pub mod sorter;
pub mod task;

use cli::Cli;
use cmd::*;
use colors::Palette;
use render::Renderer;
use repository::TaskRepository;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Menu) | None => {
            let render = Renderer::new(cli.format, Palette::detect(cli.no_color));
            if let Err(e) = run_menu(TaskRepository::new(cli.max_tasks), render) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn run_menu(repo: TaskRepository, render: Renderer) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut shell = Shell::new(repo, stdin.lock(), io::stdout(), render);
    shell.run().context("menu session aborted")
}
