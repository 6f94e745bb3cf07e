//! vocabsync - vocabulary notebook reconciliation
//!
//! This crate provides the core functionality for the `vocabsync` CLI tool:
//! importing story, book and flashcard notebooks, learning histories and
//! cached dictionary lookups into SQLite, repeatably and without duplicates,
//! and exporting the store back out as JSONL backups.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Persisted entities (Note, NotebookLink, LearningEvent, DictionaryEntry)
//! - [`source`] - In-memory source collections and the YAML loader
//! - [`storage`] - Repository traits and the SQLite implementation
//! - [`sync`] - Reconcilers, exporter and JSONL files
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod source;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};
