//! Reconciliation engine.
//!
//! This module merges file-based vocabulary sources into the store and reads
//! the store back out for backup:
//!
//! - **Notes**: notebook occurrences → notes + notebook links
//! - **Learning logs**: per-notebook histories → learning events
//! - **Dictionary**: cached lookups → dictionary entries
//! - **Export**: store → three JSONL files
//!
//! Every reconciler makes a new/skip/update decision per record against the
//! repository traits in [`crate::storage`], so running the same import twice
//! writes nothing the second time.
//!
//! # Example
//!
//! ```ignore
//! use vocabsync::sync::{Exporter, ImportOptions, ImportResult, Importer, Reporter};
//!
//! let mut out = std::io::stdout();
//! let mut reporter = Reporter::new(&mut out);
//! let mut result = ImportResult::default();
//! Importer::new(&mut storage, ImportOptions::default())
//!     .import_all(&sources, &mut reporter, &mut result)?;
//!
//! let stats = Exporter::new(&storage).export(&backup_dir)?;
//! ```

mod dictionary;
mod export;
mod file;
mod import;
mod learning_logs;
mod notes;
mod report;
#[cfg(test)]
mod testing;
mod types;

pub use dictionary::DictionaryImporter;
pub use export::{
    write_export, ExportStats, Exporter, DICTIONARY_FILE, LEARNING_LOGS_FILE, NOTES_FILE,
};
pub use file::{atomic_write, read_jsonl, write_jsonl};
pub use import::Importer;
pub use learning_logs::LearningLogImporter;
pub use notes::NoteImporter;
pub use report::{Outcome, Reporter};
pub use types::{ExportData, ImportOptions, ImportResult, SyncError, SyncResult};
