//! Per-record progress lines.

use std::io::{self, Write};

use colored::Colorize;

use crate::sync::types::{ImportResult, SyncResult};

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    New,
    Skip,
    Update,
    Warn,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Skip => "SKIP",
            Self::Update => "UPDATE",
            Self::Warn => "WARN",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes one tagged line per processed record to an injected sink.
///
/// Color follows the global `colored` override, so `--no-color` and
/// non-TTY sinks both produce plain text.
pub struct Reporter<'w> {
    sink: &'w mut dyn Write,
}

impl<'w> Reporter<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self { sink }
    }

    /// Emit a single record line, e.g. `NEW    note      ran -> run`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be written.
    pub fn record(&mut self, outcome: Outcome, kind: &str, subject: &str) -> SyncResult<()> {
        let tag = format!("{:<6}", outcome.as_str());
        let tag = match outcome {
            Outcome::New => tag.green(),
            Outcome::Skip => tag.dimmed(),
            Outcome::Update => tag.yellow(),
            Outcome::Warn => tag.red(),
        };
        writeln!(self.sink, "{tag} {kind:<10} {subject}")?;
        Ok(())
    }

    /// Emit the final per-category totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be written.
    pub fn summary(&mut self, result: &ImportResult, dry_run: bool) -> SyncResult<()> {
        write_summary(&mut *self.sink, result, dry_run)?;
        Ok(())
    }
}

fn write_summary(sink: &mut dyn Write, result: &ImportResult, dry_run: bool) -> io::Result<()> {
    writeln!(sink)?;
    if dry_run {
        writeln!(sink, "{}", "Dry run: nothing was written".bold())?;
    } else {
        writeln!(sink, "{}", "Import summary".bold())?;
    }
    writeln!(
        sink,
        "  Notes:         {} new, {} skipped, {} updated",
        result.notes_new, result.notes_skipped, result.notes_updated
    )?;
    writeln!(
        sink,
        "  Links:         {} new, {} skipped",
        result.links_new, result.links_skipped
    )?;
    writeln!(
        sink,
        "  Learning logs: {} new, {} skipped, {} warnings",
        result.events_new, result.events_skipped, result.events_warnings
    )?;
    writeln!(
        sink,
        "  Dictionary:    {} new, {} skipped, {} updated",
        result.dictionary_new, result.dictionary_skipped, result.dictionary_updated
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lines_are_tagged() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        {
            let mut reporter = Reporter::new(&mut out);
            reporter.record(Outcome::New, "note", "ran -> run").unwrap();
            reporter.record(Outcome::Warn, "log", "unknown-phrase").unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("NEW"));
        assert!(lines[0].ends_with("ran -> run"));
        assert!(lines[1].starts_with("WARN"));
    }

    #[test]
    fn test_summary_lists_every_category() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let result = ImportResult {
            notes_new: 3,
            events_warnings: 1,
            dictionary_skipped: 2,
            ..ImportResult::default()
        };
        Reporter::new(&mut out).summary(&result, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Dry run"));
        assert!(text.contains("3 new, 0 skipped, 0 updated"));
        assert!(text.contains("1 warnings"));
        assert!(text.contains("0 new, 2 skipped, 0 updated"));
    }
}
