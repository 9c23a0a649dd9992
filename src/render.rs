//! Rendering of task listings and outcomes for the console.
//!
//! Listings follow the selected `OutputFormat`; confirmations and failures are
//! always a single text line.

use std::io::{self, Write};

use chrono::Local;
use serde::Serialize;

use crate::colors::{Palette, DETAIL, FAILURE, HEADER, SUCCESS};
use crate::fields::OutputFormat;
use crate::repository::ArchivedSubtaskView;
use crate::sorter::SearchHit;
use crate::task::Task;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    palette: Palette,
}

impl Renderer {
    pub fn new(format: OutputFormat, palette: Palette) -> Self {
        Renderer { format, palette }
    }

    /// Uncolored text output.
    pub fn plain() -> Self {
        Renderer::new(OutputFormat::Text, Palette::plain())
    }

    pub fn header<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        writeln!(out, "{}", self.palette.paint(text, HEADER))
    }

    pub fn success<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        writeln!(out, "{}", self.palette.paint(&format!("- {text}"), SUCCESS))
    }

    pub fn failure<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        writeln!(out, "{}", self.palette.paint(text, FAILURE))
    }

    pub fn line<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        writeln!(out, "{text}")
    }

    /// Print tasks with their subtasks.
    ///
    /// The number in front of each task is its priority, which is also its
    /// position in the active list, so it stays usable as an index even in a
    /// view sorted by date.
    pub fn tasks<W: Write>(&self, out: &mut W, tasks: &[Task], show_dates: bool) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, tasks);
        }
        for task in tasks {
            let pos = task.priority();
            let mut info = format!("{pos}. {task} [priority: {pos}");
            if show_dates {
                let date = task.created_at().with_timezone(&Local).date_naive();
                info.push_str(&format!(", date: {date}"));
            }
            info.push(']');
            writeln!(out, "{info}")?;
            for (j, sub) in task.subtasks().iter().enumerate() {
                let line = format!("   {pos}.{} {sub}", j + 1);
                writeln!(out, "{}", self.palette.paint(&line, DETAIL))?;
            }
        }
        Ok(())
    }

    /// Print deleted tasks numbered by archive position.
    pub fn archive<W: Write>(&self, out: &mut W, tasks: &[Task]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, tasks);
        }
        for (i, task) in tasks.iter().enumerate() {
            writeln!(out, "{}. {task}", i + 1)?;
            for sub in task.subtasks() {
                writeln!(out, "{}", self.palette.paint(&format!("   - {sub}"), DETAIL))?;
            }
        }
        Ok(())
    }

    pub fn subtask_archive<W: Write>(&self, out: &mut W, entries: &[ArchivedSubtaskView]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, entries);
        }
        for (i, entry) in entries.iter().enumerate() {
            match &entry.parent {
                Some(parent) => writeln!(out, "{}. {} (from task: {parent})", i + 1, entry.text)?,
                None => writeln!(
                    out,
                    "{}. {} (original task {} no longer exists)",
                    i + 1,
                    entry.text,
                    entry.original_position
                )?,
            }
        }
        Ok(())
    }

    pub fn search_hits<W: Write>(&self, out: &mut W, hits: &[SearchHit<'_>]) -> io::Result<()> {
        for hit in hits {
            writeln!(out, "{}. {} [priority: {}]", hit.position, hit.task, hit.task.priority())?;
            for (j, sub) in &hit.subtasks {
                let line = format!("   {}.{j} {sub} <- found in subtask", hit.position);
                writeln!(out, "{}", self.palette.paint(&line, DETAIL))?;
            }
        }
        Ok(())
    }

    fn json<W: Write, T: Serialize>(&self, out: &mut W, items: &[T]) -> io::Result<()> {
        let data = serde_json::to_string_pretty(items).map_err(io::Error::other)?;
        writeln!(out, "{data}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_tasks_text() {
        let mut task = Task::new(1, "Groceries", 1);
        task.push_subtask("milk".into());
        task.set_deadline("today".into());
        let out = render(|w| Renderer::plain().tasks(w, &[task], false));
        assert_eq!(out, "1. Groceries ----- until: today [priority: 1]\n   1.1 milk\n");
    }

    #[test]
    fn test_tasks_json() {
        let renderer = Renderer::new(OutputFormat::Json, Palette::plain());
        let out = render(|w| renderer.tasks(w, &[Task::new(4, "A", 1)], false));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], 4);
        assert_eq!(value[0]["description"], "A");
        assert_eq!(value[0]["priority"], 1);
    }

    #[test]
    fn test_subtask_archive_marks_missing_parent() {
        let entries = vec![
            ArchivedSubtaskView { text: "a".into(), original_position: 1, parent: Some("Home".into()) },
            ArchivedSubtaskView { text: "b".into(), original_position: 3, parent: None },
        ];
        let out = render(|w| Renderer::plain().subtask_archive(w, &entries));
        assert_eq!(out, "1. a (from task: Home)\n2. b (original task 3 no longer exists)\n");
    }

    #[test]
    fn test_subtask_archive_json() {
        let renderer = Renderer::new(OutputFormat::Json, Palette::plain());
        let entries = vec![ArchivedSubtaskView { text: "b".into(), original_position: 3, parent: None }];
        let out = render(|w| renderer.subtask_archive(w, &entries));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["text"], "b");
        assert_eq!(value[0]["original_position"], 3);
        assert!(value[0]["parent"].is_null());
    }
}
