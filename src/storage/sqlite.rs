//! SQLite storage implementation.
//!
//! This module provides the storage backend for vocabsync using SQLite.
//! Multi-row writes go through [`SqliteStorage::mutate`], which wraps them in
//! one IMMEDIATE transaction that rolls back when dropped on an error path.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, Transaction};
use tracing::trace;

use crate::error::{Error, Result};
use crate::model::{
    DictionaryEntry, LearningEvent, Note, NoteReference, NotebookKind, NotebookLink,
};
use crate::storage::cancel::CancelToken;
use crate::storage::repository::{DictionaryRepository, LearningLogRepository, NoteRepository};
use crate::storage::schema::apply_schema;

const DATE_FORMAT: &str = "%Y-%m-%d";

const NOTE_COLUMNS: &str =
    "id, usage, entry, meaning, level, dictionary_number, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, note_id, status, learned_at, quality, response_time_ms, \
     quiz_type, interval_days, easiness_factor, created_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    cancel: CancelToken,
}

/// Row counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreCounts {
    pub notes: usize,
    pub notebook_links: usize,
    pub learning_logs: usize,
    pub dictionary_entries: usize,
}

impl StoreCounts {
    /// Returns total number of rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.notes + self.notebook_links + self.learning_logs + self.dictionary_entries
    }
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self {
            conn,
            cancel: CancelToken::new(),
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            cancel: CancelToken::new(),
        })
    }

    /// Attach a cancellation token checked before every repository call.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn ensure_live(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    /// Execute a mutation inside an IMMEDIATE transaction.
    ///
    /// The transaction commits only if the closure succeeds; on any error
    /// it is dropped, which rolls it back.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        self.ensure_live()?;
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;

        tx.commit()?;
        trace!(op, "Mutation committed");

        Ok(result)
    }

    /// Row counts per table.
    ///
    /// # Errors
    ///
    /// Returns an error if a count query fails.
    pub fn counts(&self) -> Result<StoreCounts> {
        self.ensure_live()?;
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or_default())
        };

        Ok(StoreCounts {
            notes: count("notes")?,
            notebook_links: count("notebook_notes")?,
            learning_logs: count("learning_logs")?,
            dictionary_entries: count("dictionary_entries")?,
        })
    }

    // ==================
    // Note helpers
    // ==================

    /// Load images, references and links for the given notes.
    ///
    /// With `only` set, the child queries are restricted to that note id;
    /// otherwise every child row is read in one pass per table.
    fn attach_note_children(&self, notes: &mut [Note], only: Option<&str>) -> Result<()> {
        if notes.is_empty() {
            return Ok(());
        }
        let (filter, params) = match only {
            Some(note_id) => ("WHERE note_id = ?1", vec![note_id]),
            None => ("", Vec::new()),
        };

        let mut images: HashMap<String, Vec<String>> = HashMap::new();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT note_id, url FROM note_images {filter} ORDER BY note_id, sort_order"
        ))?;
        let rows = stmt.query_map(params_from_iter(&params), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (note_id, url) = row?;
            images.entry(note_id).or_default().push(url);
        }

        let mut references: HashMap<String, Vec<NoteReference>> = HashMap::new();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT note_id, url, description FROM note_references {filter} ORDER BY note_id, sort_order"
        ))?;
        let rows = stmt.query_map(params_from_iter(&params), |row| {
            Ok((
                row.get::<_, String>(0)?,
                NoteReference {
                    url: row.get(1)?,
                    description: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (note_id, reference) = row?;
            references.entry(note_id).or_default().push(reference);
        }

        let mut links: HashMap<String, Vec<NotebookLink>> = HashMap::new();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT note_id, notebook_type, notebook_id, group_name, subgroup, created_at
             FROM notebook_notes {filter} ORDER BY created_at, rowid"
        ))?;
        let rows = stmt.query_map(params_from_iter(&params), map_link)?;
        for row in rows {
            let link = row?;
            links.entry(link.note_id.clone()).or_default().push(link);
        }

        for note in notes {
            note.images = images.remove(&note.id).unwrap_or_default();
            note.references = references.remove(&note.id).unwrap_or_default();
            note.notebook_links = links.remove(&note.id).unwrap_or_default();
        }
        Ok(())
    }
}

// ==================
// Row mapping
// ==================

fn parse_text<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn parse_date(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_note(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        usage: row.get(1)?,
        entry: row.get(2)?,
        meaning: row.get(3)?,
        level: row.get(4)?,
        dictionary_number: row.get(5)?,
        images: Vec::new(),
        references: Vec::new(),
        notebook_links: Vec::new(),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_link(row: &Row) -> rusqlite::Result<NotebookLink> {
    Ok(NotebookLink {
        note_id: row.get(0)?,
        notebook_kind: parse_text::<NotebookKind>(row, 1)?,
        notebook_id: row.get(2)?,
        group: row.get(3)?,
        subgroup: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_event(row: &Row) -> rusqlite::Result<LearningEvent> {
    Ok(LearningEvent {
        id: row.get(0)?,
        note_id: row.get(1)?,
        status: parse_text(row, 2)?,
        learned_at: parse_date(row, 3)?,
        quality: row.get(4)?,
        response_time_ms: row.get(5)?,
        quiz_type: row.get(6)?,
        interval_days: row.get(7)?,
        easiness_factor: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_dictionary_entry(row: &Row) -> rusqlite::Result<DictionaryEntry> {
    Ok(DictionaryEntry {
        word: row.get(0)?,
        source_type: row.get(1)?,
        response: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn insert_link(tx: &Connection, note_id: &str, link: &NotebookLink) -> rusqlite::Result<usize> {
    tx.execute(
        "INSERT INTO notebook_notes (note_id, notebook_type, notebook_id, group_name, subgroup, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            note_id,
            link.notebook_kind.as_str(),
            link.notebook_id,
            link.group,
            link.subgroup,
            link.created_at
        ],
    )
}

// ==================
// Repositories
// ==================

impl NoteRepository for SqliteStorage {
    fn find_note(&self, usage: &str, entry: &str) -> Result<Option<Note>> {
        self.ensure_live()?;
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE usage = ?1 AND entry = ?2"),
                [usage, entry],
                map_note,
            )
            .optional()?;

        let Some(note) = note else {
            return Ok(None);
        };
        let note_id = note.id.clone();
        let mut notes = [note];
        self.attach_note_children(&mut notes, Some(note_id.as_str()))?;
        let [note] = notes;
        Ok(Some(note))
    }

    fn find_all_notes(&self) -> Result<Vec<Note>> {
        self.ensure_live()?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at, rowid"
        ))?;
        let mut notes = stmt
            .query_map([], map_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        self.attach_note_children(&mut notes, None)?;
        Ok(notes)
    }

    fn create_note(&mut self, note: &Note, link: &NotebookLink) -> Result<()> {
        self.mutate("create_note", |tx| {
            tx.execute(
                &format!("INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                rusqlite::params![
                    note.id,
                    note.usage,
                    note.entry,
                    note.meaning,
                    note.level,
                    note.dictionary_number,
                    note.created_at,
                    note.updated_at
                ],
            )?;

            for (order, url) in note.images.iter().enumerate() {
                tx.execute(
                    "INSERT INTO note_images (note_id, url, sort_order) VALUES (?1, ?2, ?3)",
                    rusqlite::params![note.id, url, order],
                )?;
            }

            for (order, reference) in note.references.iter().enumerate() {
                tx.execute(
                    "INSERT INTO note_references (note_id, url, description, sort_order)
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![note.id, reference.url, reference.description, order],
                )?;
            }

            insert_link(tx, &note.id, link)?;
            Ok(())
        })
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        self.ensure_live()?;
        let changed = self.conn.execute(
            "UPDATE notes SET meaning = ?1, level = ?2, dictionary_number = ?3, updated_at = ?4
             WHERE id = ?5",
            rusqlite::params![
                note.meaning,
                note.level,
                note.dictionary_number,
                chrono::Utc::now().timestamp_millis(),
                note.id
            ],
        )?;
        if changed == 0 {
            return Err(Error::Database(rusqlite::Error::QueryReturnedNoRows));
        }
        Ok(())
    }

    fn notebook_link_exists(
        &self,
        note_id: &str,
        kind: NotebookKind,
        notebook_id: &str,
        group: &str,
    ) -> Result<bool> {
        self.ensure_live()?;
        let exists = self
            .conn
            .prepare(
                "SELECT 1 FROM notebook_notes
                 WHERE note_id = ?1 AND notebook_type = ?2 AND notebook_id = ?3 AND group_name = ?4",
            )?
            .exists([note_id, kind.as_str(), notebook_id, group])?;
        Ok(exists)
    }

    fn create_notebook_link(&mut self, link: &NotebookLink) -> Result<()> {
        self.ensure_live()?;
        insert_link(&self.conn, &link.note_id, link)?;
        Ok(())
    }
}

impl LearningLogRepository for SqliteStorage {
    fn find_all_learning_events(&self) -> Result<Vec<LearningEvent>> {
        self.ensure_live()?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM learning_logs ORDER BY learned_at, created_at, rowid"
        ))?;
        let events = stmt
            .query_map([], map_event)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }

    fn learning_event_exists(
        &self,
        note_id: &str,
        quiz_type: &str,
        learned_at: NaiveDate,
    ) -> Result<bool> {
        self.ensure_live()?;
        let date = learned_at.format(DATE_FORMAT).to_string();
        let exists = self
            .conn
            .prepare(
                "SELECT 1 FROM learning_logs WHERE note_id = ?1 AND quiz_type = ?2 AND learned_at = ?3",
            )?
            .exists([note_id, quiz_type, date.as_str()])?;
        Ok(exists)
    }

    fn create_learning_event(&mut self, event: &LearningEvent) -> Result<()> {
        self.ensure_live()?;
        self.conn.execute(
            &format!(
                "INSERT INTO learning_logs ({EVENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            rusqlite::params![
                event.id,
                event.note_id,
                event.status.as_str(),
                event.learned_at.format(DATE_FORMAT).to_string(),
                event.quality,
                event.response_time_ms,
                event.quiz_type,
                event.interval_days,
                event.easiness_factor,
                event.created_at
            ],
        )?;
        Ok(())
    }
}

impl DictionaryRepository for SqliteStorage {
    fn find_dictionary_entry(&self, word: &str) -> Result<Option<DictionaryEntry>> {
        self.ensure_live()?;
        let entry = self
            .conn
            .query_row(
                "SELECT word, source_type, response, created_at, updated_at
                 FROM dictionary_entries WHERE word = ?1",
                [word],
                map_dictionary_entry,
            )
            .optional()?;
        Ok(entry)
    }

    fn find_all_dictionary_entries(&self) -> Result<Vec<DictionaryEntry>> {
        self.ensure_live()?;
        let mut stmt = self.conn.prepare(
            "SELECT word, source_type, response, created_at, updated_at
             FROM dictionary_entries ORDER BY word",
        )?;
        let entries = stmt
            .query_map([], map_dictionary_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn upsert_dictionary_entry(&mut self, entry: &DictionaryEntry) -> Result<()> {
        self.ensure_live()?;
        self.conn.execute(
            "INSERT INTO dictionary_entries (word, source_type, response, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(word) DO UPDATE SET
                source_type = excluded.source_type,
                response = excluded.response,
                updated_at = excluded.updated_at",
            rusqlite::params![
                entry.word,
                entry.source_type,
                entry.response,
                entry.created_at,
                entry.updated_at
            ],
        )?;
        Ok(())
    }
}
