//! Command implementations.

pub mod completions;
pub mod export;
pub mod import;
pub mod init;
pub mod status;
pub mod version;

use std::path::PathBuf;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;

/// Open the resolved database, failing if `init` has not been run.
///
/// The storage keeps its default, never-cancelled [`CancelToken`](crate::storage::CancelToken).
fn open_storage(db_path: Option<&PathBuf>) -> Result<SqliteStorage> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or(Error::NotInitialized)?;

    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    SqliteStorage::open(&db_path)
}
