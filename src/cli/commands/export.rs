//! Export command implementation.

use std::path::PathBuf;

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::sync::{Exporter, DICTIONARY_FILE, LEARNING_LOGS_FILE, NOTES_FILE};

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the database is missing, a read fails, or a file
/// cannot be written.
pub fn execute(output: Option<&PathBuf>, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let output_dir = load_config()?.export_dir(output.map(PathBuf::as_path))?;
    let storage = super::open_storage(db_path)?;

    let stats = Exporter::new(&storage)
        .export(&output_dir)
        .map_err(Error::Export)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "output_dir": output_dir.display().to_string(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Export complete: {}", output_dir.display());
        println!();
        println!("  Notes:              {:>6}  {NOTES_FILE}", stats.notes);
        println!("  Learning logs:      {:>6}  {LEARNING_LOGS_FILE}", stats.learning_events);
        println!("  Dictionary entries: {:>6}  {DICTIONARY_FILE}", stats.dictionary_entries);
    }

    Ok(())
}
