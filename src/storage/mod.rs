//! SQLite storage layer for vocabsync.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode for concurrent reads
//! - Transaction discipline for atomic multi-row writes
//! - Uniqueness constraints backing every dedup key the reconcilers use
//!
//! # Submodules
//!
//! - [`repository`] - Repository traits consumed by the reconcilers
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - SQLite implementation of every repository

mod cancel;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use cancel::CancelToken;
pub use repository::{DictionaryRepository, LearningLogRepository, NoteRepository};
pub use sqlite::{SqliteStorage, StoreCounts};
