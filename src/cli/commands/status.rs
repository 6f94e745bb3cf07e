//! Status command implementation.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::resolve_db_path;
use crate::error::Result;
use crate::storage::StoreCounts;

#[derive(Serialize)]
struct StatusOutput {
    database: Option<PathBuf>,
    counts: StoreCounts,
}

/// Execute the status command: row counts per table.
///
/// # Errors
///
/// Returns an error if the database is missing or cannot be queried.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let storage = super::open_storage(db_path)?;
    let counts = storage.counts()?;
    let database = resolve_db_path(db_path.map(PathBuf::as_path));

    if json {
        let output = StatusOutput { database, counts };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("vocabsync status");
    println!("================");
    println!();
    if let Some(path) = &database {
        println!("Database: {}", path.display());
        println!();
    }
    println!("  Notes:              {}", counts.notes);
    println!("  Notebook links:     {}", counts.notebook_links);
    println!("  Learning logs:      {}", counts.learning_logs);
    println!("  Dictionary entries: {}", counts.dictionary_entries);

    Ok(())
}
