//! Persisted entities for vocabsync.
//!
//! This module contains the rows the reconcilers write and the exporter
//! reads back:
//! - Note (with images, references and notebook links)
//! - LearningEvent
//! - DictionaryEntry

pub mod dictionary;
pub mod learning;
pub mod note;

pub use dictionary::{DictionaryEntry, SOURCE_TYPE_CACHED_LOOKUP};
pub use learning::{LearningEvent, LearningStatus, QuizType};
pub use note::{Note, NoteReference, NotebookKind, NotebookLink};
