//! Repository traits.
//!
//! The reconcilers only ever talk to these traits. `SqliteStorage`
//! implements all three; tests wrap it to observe calls.

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{DictionaryEntry, LearningEvent, Note, NotebookKind, NotebookLink};

/// Notes and the rows they own.
pub trait NoteRepository {
    /// Look up a note by its (usage, entry) key.
    fn find_note(&self, usage: &str, entry: &str) -> Result<Option<Note>>;

    /// All notes with images, references and notebook links, oldest first.
    fn find_all_notes(&self) -> Result<Vec<Note>>;

    /// Insert a note, its images and references, and its first notebook
    /// link in one transaction.
    fn create_note(&mut self, note: &Note, link: &NotebookLink) -> Result<()>;

    /// Overwrite meaning, level and dictionary number of an existing note.
    fn update_note(&mut self, note: &Note) -> Result<()>;

    fn notebook_link_exists(
        &self,
        note_id: &str,
        kind: NotebookKind,
        notebook_id: &str,
        group: &str,
    ) -> Result<bool>;

    fn create_notebook_link(&mut self, link: &NotebookLink) -> Result<()>;
}

/// Learning events.
pub trait LearningLogRepository {
    /// All events, oldest first.
    fn find_all_learning_events(&self) -> Result<Vec<LearningEvent>>;

    fn learning_event_exists(
        &self,
        note_id: &str,
        quiz_type: &str,
        learned_at: NaiveDate,
    ) -> Result<bool>;

    fn create_learning_event(&mut self, event: &LearningEvent) -> Result<()>;
}

/// Cached dictionary entries.
pub trait DictionaryRepository {
    fn find_dictionary_entry(&self, word: &str) -> Result<Option<DictionaryEntry>>;

    /// All entries ordered by word.
    fn find_all_dictionary_entries(&self) -> Result<Vec<DictionaryEntry>>;

    /// Insert, or replace source type and response of the existing word.
    fn upsert_dictionary_entry(&mut self, entry: &DictionaryEntry) -> Result<()>;
}
