//! Create the vocabsync database.
//!
//! The database lives at `~/.vocabsync/data/vocabsync.db` unless `--db` or
//! `VOCABSYNC_DB` says otherwise. With `VOCABSYNC_TEST_DB=1` it goes to
//! `~/.vocabsync/test/` instead.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    reinitialized: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the database already exists (without `force`) or
/// cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine vocabsync directory".to_string()))?;

    let existed = db_path.exists();
    if existed && !force {
        return Err(Error::AlreadyInitialized { path: db_path });
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if existed {
        remove_database(&db_path)?;
    }

    // Opening applies the schema
    SqliteStorage::open(&db_path)?;

    if json {
        let output = InitOutput {
            database: db_path,
            reinitialized: existed,
        };
        let payload = serde_json::to_string(&output)?;
        println!("{payload}");
    } else {
        println!("Initialized vocabsync database");
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: Run 'vocabsync import --stories <DIR>' to import notebooks.");
    }

    Ok(())
}

/// Remove a database file and its WAL side files.
fn remove_database(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(side)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_database() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("nested").join("vocab.db");

        execute(Some(&db), false, false).unwrap();
        assert!(db.exists());
        assert_eq!(SqliteStorage::open(&db).unwrap().counts().unwrap().total(), 0);
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("vocab.db");

        execute(Some(&db), false, false).unwrap();
        let result = execute(Some(&db), false, false);
        assert!(matches!(result, Err(Error::AlreadyInitialized { .. })));
    }

    #[test]
    fn test_init_force_starts_fresh() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("vocab.db");
        execute(Some(&db), false, false).unwrap();
        {
            let storage = SqliteStorage::open(&db).unwrap();
            storage
                .conn()
                .execute(
                    "INSERT INTO dictionary_entries (word, source_type, response, created_at, updated_at)
                     VALUES ('lucid', 'cached-lookup', '{}', 0, 0)",
                    [],
                )
                .unwrap();
        }

        execute(Some(&db), true, false).unwrap();
        assert_eq!(SqliteStorage::open(&db).unwrap().counts().unwrap().total(), 0);
    }
}
