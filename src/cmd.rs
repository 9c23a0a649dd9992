//! Command implementations for the CLI interface.
//!
//! This module holds the subcommands, the numbered menu and the `Shell` that
//! reads user input, calls one repository operation per menu choice and
//! renders the result.

use std::io::{self, BufRead, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell as CompletionShell};
use tracing::{debug, info};

use crate::error::{ShellError, TaskError};
use crate::fields::{SortKey, TextField};
use crate::render::Renderer;
use crate::repository::TaskRepository;
use crate::sorter::{search, sorted};

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive menu (default).
    Menu,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Entries of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Edit,
    Delete,
    Deadline,
    AddSubtask,
    DeleteSubtask,
    ChangePriority,
    SortByDate,
    SortByPriority,
    Search,
    ShowAll,
    ShowDeleted,
    RestoreTask,
    RestoreSubtask,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 15] = [
        MenuChoice::Add,
        MenuChoice::Edit,
        MenuChoice::Delete,
        MenuChoice::Deadline,
        MenuChoice::AddSubtask,
        MenuChoice::DeleteSubtask,
        MenuChoice::ChangePriority,
        MenuChoice::SortByDate,
        MenuChoice::SortByPriority,
        MenuChoice::Search,
        MenuChoice::ShowAll,
        MenuChoice::ShowDeleted,
        MenuChoice::RestoreTask,
        MenuChoice::RestoreSubtask,
        MenuChoice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Add => "add new task",
            MenuChoice::Edit => "edit any task",
            MenuChoice::Delete => "delete any task",
            MenuChoice::Deadline => "add deadline",
            MenuChoice::AddSubtask => "add subtask",
            MenuChoice::DeleteSubtask => "delete subtask",
            MenuChoice::ChangePriority => "change priority",
            MenuChoice::SortByDate => "sort tasks by dates",
            MenuChoice::SortByPriority => "sort tasks by priority",
            MenuChoice::Search => "search for a task",
            MenuChoice::ShowAll => "show all tasks",
            MenuChoice::ShowDeleted => "show deleted tasks",
            MenuChoice::RestoreTask => "restore deleted task",
            MenuChoice::RestoreSubtask => "restore deleted subtask",
            MenuChoice::Exit => "exit",
        }
    }

    /// Parse a menu line such as `"7"`.
    pub fn parse(input: &str) -> Result<MenuChoice, TaskError> {
        let n = positive(parse_number(input)?)?;
        let max = MenuChoice::ALL.len();
        if !(1..=max).contains(&n) {
            return Err(TaskError::InvalidIndex { index: n, max });
        }
        Ok(MenuChoice::ALL[n - 1])
    }
}

/// Parse a signed integer from user input.
pub fn parse_number(input: &str) -> Result<i64, TaskError> {
    let input = input.trim();
    input.parse::<i64>().map_err(|_| TaskError::NotANumber { input: input.to_string() })
}

/// Parse a `"<task>.<subtask>"` coordinate into 1-based indices.
pub fn parse_coordinate(input: &str) -> Result<(usize, usize), TaskError> {
    let input = input.trim();
    let malformed = || TaskError::MalformedCoordinate { input: input.to_string() };
    let (task, subtask) = input.split_once('.').ok_or_else(malformed)?;
    let part = |s: &str| -> Result<usize, TaskError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        s.parse::<usize>().map_err(|_| malformed())
    };
    Ok((part(task)?, part(subtask)?))
}

/// Reject negative numbers with the value the user typed.
fn positive(n: i64) -> Result<usize, TaskError> {
    usize::try_from(n).map_err(|_| TaskError::NotPositive { value: n })
}

/// Interactive menu over any line-based input and output.
pub struct Shell<R, W> {
    repo: TaskRepository,
    input: R,
    out: W,
    render: Renderer,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(repo: TaskRepository, input: R, out: W, render: Renderer) -> Self {
        Shell { repo, input, out, render }
    }

    #[cfg(test)]
    pub fn repository(&self) -> &TaskRepository {
        &self.repo
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        info!(max_tasks = self.repo.max_tasks(), "menu started");
        loop {
            self.show_menu()?;
            let choice = self
                .read_line()
                .and_then(|line| MenuChoice::parse(&line).map_err(ShellError::from));
            let result = match choice {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => self.dispatch(choice),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {}
                Err(ShellError::Task(e)) => {
                    debug!(error = %e, "action rejected");
                    self.render.failure(&mut self.out, &e.to_string())?;
                }
                Err(ShellError::Closed) => break,
                Err(e) => return Err(e),
            }
        }
        self.render.line(&mut self.out, "goodbye!")?;
        self.out.flush()?;
        info!("menu finished");
        Ok(())
    }

    fn show_menu(&mut self) -> Result<(), ShellError> {
        self.render.line(&mut self.out, "")?;
        self.render.header(&mut self.out, "~~ to-do list ~~")?;
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            self.render.line(&mut self.out, &format!("{}) {}", i + 1, choice.label()))?;
        }
        self.render.line(&mut self.out, "what do you want to do?")?;
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<(), ShellError> {
        debug!(?choice, "menu choice");
        match choice {
            MenuChoice::Add => self.add_task(),
            MenuChoice::Edit => self.edit_task(),
            MenuChoice::Delete => self.delete_task(),
            MenuChoice::Deadline => self.add_deadline(),
            MenuChoice::AddSubtask => self.add_subtask(),
            MenuChoice::DeleteSubtask => self.delete_subtask(),
            MenuChoice::ChangePriority => self.change_priority(),
            MenuChoice::SortByDate => self.show_sorted(SortKey::Created),
            MenuChoice::SortByPriority => self.show_sorted(SortKey::Priority),
            MenuChoice::Search => self.search_tasks(),
            MenuChoice::ShowAll => self.show_all(),
            MenuChoice::ShowDeleted => self.show_deleted(),
            MenuChoice::RestoreTask => self.restore_task(),
            MenuChoice::RestoreSubtask => self.restore_subtask(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn add_task(&mut self) -> Result<(), ShellError> {
        if self.repo.is_full() {
            return Err(TaskError::ListFull { max: self.repo.max_tasks() }.into());
        }
        let text = self.prompt("enter the task:")?;
        self.repo.add(&text)?;
        self.done("successfully added! now go making it done")
    }

    fn edit_task(&mut self) -> Result<(), ShellError> {
        let index = self.prompt_task("enter the number of task you want to edit:")?;
        let text = self.prompt("enter edited task:")?;
        self.repo.edit(index, &text)?;
        self.done("edited!")
    }

    fn delete_task(&mut self) -> Result<(), ShellError> {
        let index = self.prompt_task("enter the number of task you want to delete:")?;
        self.repo.remove(index)?;
        self.done("task removed!")
    }

    fn add_deadline(&mut self) -> Result<(), ShellError> {
        let index = self.prompt_task("enter number of a task you need deadline to:")?;
        let text = self.prompt("add deadline:")?;
        self.repo.set_deadline(index, &text)?;
        self.done("deadline added!")
    }

    fn add_subtask(&mut self) -> Result<(), ShellError> {
        let index = self.prompt_task("enter the number of task to add subtask:")?;
        let text = self.prompt("enter subtask:")?;
        self.repo.add_subtask(index, &text)?;
        self.done("subtask added!")
    }

    fn delete_subtask(&mut self) -> Result<(), ShellError> {
        let index = self.prompt_task("enter the number of task:")?;
        let task = self.repo.get(index)?.clone();
        if task.subtasks().is_empty() {
            return Err(TaskError::NoSubtasks { index }.into());
        }
        self.render.line(&mut self.out, "current subtasks:")?;
        self.render.tasks(&mut self.out, std::slice::from_ref(&task), false)?;
        let line = self.prompt("enter the subtask to delete (format: task.subtask):")?;
        let (task_part, subtask) = parse_coordinate(&line)?;
        if task_part != index {
            return Err(TaskError::CoordinateMismatch { expected: index, task: task_part, subtask }.into());
        }
        self.repo.remove_subtask(index, subtask)?;
        self.done("subtask deleted!")
    }

    fn change_priority(&mut self) -> Result<(), ShellError> {
        let index = self.prompt_task("enter the number of task you want to change priority for:")?;
        let current = self.repo.get(index)?.priority();
        self.render.line(&mut self.out, &format!("current priority: {current}"))?;
        let max = self.repo.len();
        let line = self.prompt(&format!("enter new priority (1 - {max}, where 1 is the highest):"))?;
        let priority = positive(parse_number(&line)?)?;
        self.repo.reprioritize(index, priority)?;
        self.done("priority changed!")
    }

    fn show_sorted(&mut self, key: SortKey) -> Result<(), ShellError> {
        self.require_tasks()?;
        let view = sorted(&self.repo.snapshot(), key);
        let (message, show_dates) = match key {
            SortKey::Created => ("tasks sorted by dates!", true),
            SortKey::Priority => ("tasks sorted by priority!", false),
        };
        self.render.success(&mut self.out, message)?;
        self.render.tasks(&mut self.out, &view, show_dates)?;
        Ok(())
    }

    fn search_tasks(&mut self) -> Result<(), ShellError> {
        self.require_tasks()?;
        let line = self.prompt("add text for search:")?;
        let needle = TextField::Search.validate(&line)?;
        let snapshot = self.repo.snapshot();
        let hits = search(&snapshot, &needle);
        if hits.is_empty() {
            self.render.line(&mut self.out, &format!("sorry, nothing containing \"{needle}\" is found"))?;
        } else {
            self.render.line(&mut self.out, "found tasks and subtasks:")?;
            self.render.search_hits(&mut self.out, &hits)?;
        }
        Ok(())
    }

    fn show_all(&mut self) -> Result<(), ShellError> {
        self.require_tasks()?;
        self.render.tasks(&mut self.out, &self.repo.snapshot(), false)?;
        Ok(())
    }

    fn show_deleted(&mut self) -> Result<(), ShellError> {
        let archived = self.repo.archived_tasks();
        if archived.is_empty() {
            self.render.line(&mut self.out, "archive is empty, nothing was deleted yet")?;
            return Ok(());
        }
        self.render.line(&mut self.out, "recently deleted tasks:")?;
        self.render.archive(&mut self.out, &archived)?;
        Ok(())
    }

    fn restore_task(&mut self) -> Result<(), ShellError> {
        let archived = self.repo.archived_tasks();
        if archived.is_empty() {
            return Err(TaskError::ArchiveEmpty.into());
        }
        self.render.archive(&mut self.out, &archived)?;
        let line = self.prompt("enter the number of task to restore:")?;
        self.repo.restore(positive(parse_number(&line)?)?)?;
        self.done("task restored!")
    }

    fn restore_subtask(&mut self) -> Result<(), ShellError> {
        let entries = self.repo.archived_subtasks();
        if entries.is_empty() {
            return Err(TaskError::ArchiveEmpty.into());
        }
        self.render.line(&mut self.out, "recently deleted subtasks:")?;
        self.render.subtask_archive(&mut self.out, &entries)?;
        let line = self.prompt("enter the number of subtask to restore:")?;
        let (_, parent) = self.repo.restore_subtask(positive(parse_number(&line)?)?)?;
        self.done(&format!("subtask restored to task: {parent}"))
    }

    fn require_tasks(&self) -> Result<(), TaskError> {
        if self.repo.is_empty() {
            return Err(TaskError::EmptyList);
        }
        Ok(())
    }

    /// Ask for a task number, refusing early when there is nothing to pick.
    fn prompt_task(&mut self, question: &str) -> Result<usize, ShellError> {
        self.require_tasks()?;
        let line = self.prompt(question)?;
        Ok(positive(parse_number(&line)?)?)
    }

    fn prompt(&mut self, question: &str) -> Result<String, ShellError> {
        self.render.line(&mut self.out, question)?;
        self.out.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<String, ShellError> {
        let mut buf = String::new();
        match self.input.read_line(&mut buf) {
            Ok(0) => Err(ShellError::Closed),
            Ok(_) => Ok(buf.trim().to_string()),
            // read_line has already consumed the undecodable line.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(TaskError::NotUtf8.into()),
            Err(e) => Err(e.into()),
        }
    }

    fn done(&mut self, message: &str) -> Result<(), ShellError> {
        self.render.success(&mut self.out, message)?;
        self.render.tasks(&mut self.out, &self.repo.snapshot(), false)?;
        Ok(())
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: CompletionShell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
