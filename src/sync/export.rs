//! Backup export.
//!
//! The exporter reads all three entity families and only then writes them,
//! one JSONL file each. A failed read produces no output at all.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::storage::{DictionaryRepository, LearningLogRepository, NoteRepository};
use crate::sync::file::write_jsonl;
use crate::sync::types::{ExportData, SyncError, SyncResult};

pub const NOTES_FILE: &str = "notes.jsonl";
pub const LEARNING_LOGS_FILE: &str = "learning_logs.jsonl";
pub const DICTIONARY_FILE: &str = "dictionary_entries.jsonl";

/// Statistics for an export operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportStats {
    pub notes: usize,
    pub learning_events: usize,
    pub dictionary_entries: usize,
    pub output_dir: PathBuf,
}

impl ExportStats {
    /// Returns total number of exported records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.notes + self.learning_events + self.dictionary_entries
    }
}

/// Reads every entity back out of the store.
pub struct Exporter<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R> Exporter<'a, R>
where
    R: NoteRepository + LearningLogRepository + DictionaryRepository + ?Sized,
{
    #[must_use]
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Read notes, learning events and dictionary entries.
    ///
    /// # Errors
    ///
    /// Returns the first failing read; nothing is returned for the others.
    pub fn collect(&self) -> SyncResult<ExportData> {
        let notes = self
            .repo
            .find_all_notes()
            .map_err(SyncError::repository("export notes", "all notes"))?;
        let learning_events = self
            .repo
            .find_all_learning_events()
            .map_err(SyncError::repository("export learning logs", "all learning logs"))?;
        let dictionary_entries = self
            .repo
            .find_all_dictionary_entries()
            .map_err(SyncError::repository("export dictionary entries", "all dictionary entries"))?;

        Ok(ExportData {
            notes,
            learning_events,
            dictionary_entries,
        })
    }

    /// Collect everything, then write the three backup files into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a read fails (no file is touched) or a file
    /// cannot be written.
    pub fn export(&self, output_dir: &Path) -> SyncResult<ExportStats> {
        let data = self.collect()?;
        write_export(output_dir, &data)
    }
}

/// Write an export aggregate as three JSONL files.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub fn write_export(output_dir: &Path, data: &ExportData) -> SyncResult<ExportStats> {
    write_jsonl(&output_dir.join(NOTES_FILE), &data.notes)?;
    write_jsonl(&output_dir.join(LEARNING_LOGS_FILE), &data.learning_events)?;
    write_jsonl(&output_dir.join(DICTIONARY_FILE), &data.dictionary_entries)?;

    let stats = ExportStats {
        notes: data.notes.len(),
        learning_events: data.learning_events.len(),
        dictionary_entries: data.dictionary_entries.len(),
        output_dir: output_dir.to_path_buf(),
    };
    info!(
        notes = stats.notes,
        learning_events = stats.learning_events,
        dictionary_entries = stats.dictionary_entries,
        dir = %output_dir.display(),
        "Export written"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DictionaryEntry, LearningEvent, LearningStatus, Note, NotebookKind, NotebookLink};
    use crate::storage::SqliteStorage;
    use crate::sync::file::read_jsonl;
    use crate::sync::testing::{date, RecordingRepository};
    use tempfile::TempDir;

    fn seeded() -> SqliteStorage {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let note = Note::new("ran", "run")
            .with_content("moved fast", "A1", 1)
            .with_attachments(vec!["https://img/run.png".into()], vec![]);
        let link = NotebookLink {
            note_id: note.id.clone(),
            notebook_kind: NotebookKind::Book,
            notebook_id: "novel".into(),
            group: "Chapter 1".into(),
            subgroup: "Opening".into(),
            created_at: 0,
        };
        storage.create_note(&note, &link).unwrap();
        storage
            .create_learning_event(
                &LearningEvent::new(&note.id, LearningStatus::Usable, date(20), "reverse")
                    .with_review(5, 800, 4, 2.7),
            )
            .unwrap();
        storage
            .upsert_dictionary_entry(&DictionaryEntry::cached("run", r#"{"pos":"verb"}"#.into()))
            .unwrap();
        storage
    }

    #[test]
    fn test_collect_reads_everything() {
        let storage = seeded();
        let data = Exporter::new(&storage).collect().unwrap();

        assert_eq!(data.total(), 3);
        assert_eq!(data.notes[0].images, ["https://img/run.png"]);
        assert_eq!(data.notes[0].notebook_links[0].notebook_kind, NotebookKind::Book);
    }

    #[test]
    fn test_export_writes_three_files() {
        let storage = seeded();
        let temp = TempDir::new().unwrap();

        let stats = Exporter::new(&storage).export(temp.path()).unwrap();
        assert_eq!(stats.total(), 3);

        let events: Vec<serde_json::Value> = read_jsonl(&temp.path().join(LEARNING_LOGS_FILE)).unwrap();
        assert_eq!(events[0]["learned_at"], "2025-01-20");
        assert_eq!(events[0]["quiz_type"], "reverse");
        assert_eq!(events[0]["response_time_ms"], 800);

        let entries: Vec<serde_json::Value> = read_jsonl(&temp.path().join(DICTIONARY_FILE)).unwrap();
        assert_eq!(entries[0]["response"], r#"{"pos":"verb"}"#);
        assert_eq!(entries[0]["source_type"], "cached-lookup");

        let notes: Vec<Note> = read_jsonl(&temp.path().join(NOTES_FILE)).unwrap();
        assert_eq!(notes[0].usage, "ran");
    }

    #[test]
    fn test_failed_read_writes_nothing() {
        let mut spy = RecordingRepository::new(seeded());
        spy.fail_on("find_all_dictionary_entries");
        let temp = TempDir::new().unwrap();

        let err = Exporter::new(&spy).export(temp.path()).unwrap_err();
        assert!(err.to_string().contains("export dictionary entries"));
        assert!(!temp.path().join(NOTES_FILE).exists());
        assert!(!temp.path().join(LEARNING_LOGS_FILE).exists());
    }
}
