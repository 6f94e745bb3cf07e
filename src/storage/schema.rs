//! Database schema definitions.
//!
//! Every dedup key the reconcilers check in application code is also a
//! uniqueness constraint here, so a second importer racing on the same
//! store fails instead of duplicating rows.

use rusqlite::{Connection, Result};
use tracing::debug;

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the vocabsync database.
///
/// Timestamps are stored as INTEGER (Unix milliseconds); review dates as
/// TEXT `YYYY-MM-DD`.
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- ====================
-- Notes
-- ====================

CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    usage TEXT NOT NULL,
    entry TEXT NOT NULL,
    meaning TEXT NOT NULL DEFAULT '',
    level TEXT NOT NULL DEFAULT '',
    dictionary_number INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(usage, entry)
);

CREATE INDEX IF NOT EXISTS idx_notes_entry ON notes(entry);

CREATE TABLE IF NOT EXISTS note_images (
    note_id TEXT NOT NULL,
    url TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (note_id, sort_order),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS note_references (
    note_id TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    sort_order INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (note_id, sort_order),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE
);

-- Notebook links: where a note was observed
CREATE TABLE IF NOT EXISTS notebook_notes (
    note_id TEXT NOT NULL,
    notebook_type TEXT NOT NULL CHECK (notebook_type IN ('story', 'book', 'flashcard')),
    notebook_id TEXT NOT NULL,
    group_name TEXT NOT NULL,
    subgroup TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    PRIMARY KEY (note_id, notebook_type, notebook_id, group_name),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_notebook_notes_notebook ON notebook_notes(notebook_type, notebook_id);

-- ====================
-- Learning Logs
-- ====================

CREATE TABLE IF NOT EXISTS learning_logs (
    id TEXT PRIMARY KEY,
    note_id TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('understood', 'misunderstood', 'usable')),
    learned_at TEXT NOT NULL,
    quality INTEGER NOT NULL DEFAULT 0,
    response_time_ms INTEGER NOT NULL DEFAULT 0,
    quiz_type TEXT NOT NULL,
    interval_days INTEGER NOT NULL DEFAULT 0,
    easiness_factor REAL NOT NULL DEFAULT 2.5,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE,
    UNIQUE(note_id, quiz_type, learned_at)
);

CREATE INDEX IF NOT EXISTS idx_learning_logs_learned_at ON learning_logs(learned_at);

-- ====================
-- Dictionary Cache
-- ====================

CREATE TABLE IF NOT EXISTS dictionary_entries (
    word TEXT PRIMARY KEY,
    source_type TEXT NOT NULL,
    response TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
";

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // Set pragmas before schema creation
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    debug!(version = CURRENT_SCHEMA_VERSION, "Schema applied");
    Ok(())
}
