//! Markdown digest of the collected broadcasts.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::error::Result;
use crate::message::BroadcastMessage;

/// What [`write_report`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The report was written.
    Written {
        /// Destination file.
        path: PathBuf,
        /// Messages in the report.
        count: usize,
    },
    /// There was nothing to save; the destination was left untouched.
    Skipped,
}

/// Orders messages newest first by their date string.
///
/// The comparison is plain string order, not calendar order: ISO dates sort
/// correctly, while `N/A` and other free-form values land wherever their
/// characters put them. Equal dates keep their collection order.
pub fn sort_newest_first(messages: &mut [BroadcastMessage]) {
    messages.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Report body, ready to be written.
#[derive(Debug)]
pub struct Report<'a> {
    list_name: &'a str,
    run_date: NaiveDate,
    messages: &'a [BroadcastMessage],
}

impl<'a> Report<'a> {
    /// Lays out `messages` in the given order.
    #[must_use]
    pub const fn new(
        list_name: &'a str,
        run_date: NaiveDate,
        messages: &'a [BroadcastMessage],
    ) -> Self {
        Self {
            list_name,
            run_date,
            messages,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "# AWeber Export\nList: {}\nDate: {}\n\n",
            self.list_name,
            self.run_date.format("%Y-%m-%d")
        )?;
        for (i, msg) in self.messages.iter().enumerate() {
            write!(f, "---\n## {}. {}\n", i + 1, msg.subject)?;
            writeln!(f, "- **Date:** {}", msg.date)?;
            write!(f, "- **Status:** {}\n\n", msg.status)?;
            write!(f, "### Content:\n{}\n\n", msg.content)?;
        }
        Ok(())
    }
}

/// Sorts `messages` and writes the report to `path`, replacing any existing file.
///
/// With no messages nothing is written.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_report(
    path: &Path,
    list_name: &str,
    mut messages: Vec<BroadcastMessage>,
) -> Result<WriteOutcome> {
    if messages.is_empty() {
        info!("Nothing to save.");
        return Ok(WriteOutcome::Skipped);
    }

    info!("Sorting messages chronologically...");
    sort_newest_first(&mut messages);

    info!("Saving {} messages to: {}", messages.len(), path.display());
    let report = Report::new(list_name, Local::now().date_naive(), &messages);
    fs::write(path, report.to_string())?;

    Ok(WriteOutcome::Written {
        path: path.to_path_buf(),
        count: messages.len(),
    })
}
