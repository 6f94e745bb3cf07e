//! Shared types for the reconcilers and the exporter.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{DictionaryEntry, LearningEvent, Note};

/// Options shared by every reconciler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Count what would change without writing.
    pub dry_run: bool,
    /// Overwrite the mutable fields of records that already exist.
    pub refresh_existing: bool,
}

/// Per-category counters produced by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub notes_new: usize,
    pub notes_skipped: usize,
    pub notes_updated: usize,
    pub links_new: usize,
    pub links_skipped: usize,
    pub events_new: usize,
    pub events_skipped: usize,
    pub events_warnings: usize,
    pub dictionary_new: usize,
    pub dictionary_skipped: usize,
    pub dictionary_updated: usize,
}

impl ImportResult {
    /// Add another phase's counters into this one.
    pub fn merge(&mut self, other: &Self) {
        self.notes_new += other.notes_new;
        self.notes_skipped += other.notes_skipped;
        self.notes_updated += other.notes_updated;
        self.links_new += other.links_new;
        self.links_skipped += other.links_skipped;
        self.events_new += other.events_new;
        self.events_skipped += other.events_skipped;
        self.events_warnings += other.events_warnings;
        self.dictionary_new += other.dictionary_new;
        self.dictionary_skipped += other.dictionary_skipped;
        self.dictionary_updated += other.dictionary_updated;
    }

    /// Number of records that were (or would be) written.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.notes_new
            + self.notes_updated
            + self.links_new
            + self.events_new
            + self.dictionary_new
            + self.dictionary_updated
    }

    /// Returns true if nothing was written.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changes() == 0
    }
}

/// Everything read back by the exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    /// Notes with their images, references and notebook links.
    pub notes: Vec<Note>,
    pub learning_events: Vec<LearningEvent>,
    pub dictionary_entries: Vec<DictionaryEntry>,
}

impl ExportData {
    /// Total number of records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.notes.len() + self.learning_events.len() + self.dictionary_entries.len()
    }
}

/// Error type for import and export operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A repository call failed.
    #[error("{step} failed for {key}")]
    Repository {
        /// Operation that failed, e.g. `create note`.
        step: &'static str,
        /// Record key being processed.
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// A dictionary payload could not be serialized.
    #[error("encode response failed for {word}")]
    Encode {
        word: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A backup line could not be parsed.
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// Line number (1-indexed).
        line: usize,
        message: String,
    },
}

impl SyncError {
    /// Wrap a repository failure with the failing step and record key.
    pub(crate) fn repository(step: &'static str, key: impl Into<String>) -> impl FnOnce(Error) -> Self {
        let key = key.into();
        move |source| Self::Repository {
            step,
            key,
            source: Box::new(source),
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
