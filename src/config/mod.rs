//! Configuration management.
//!
//! This module resolves the database path and the source/export directories.
//!
//! # Layout
//!
//! - **Database**: `~/.vocabsync/data/vocabsync.db`
//! - **Config file**: `~/.vocabsync/config.json` (or `VOCABSYNC_CONFIG`)
//! - **Exports**: `~/.vocabsync/export/` unless configured otherwise
//!
//! Command-line flags always win over the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::source::SourcePaths;

/// Source and export directories read from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabSyncConfig {
    pub stories_directories: Vec<PathBuf>,
    pub flashcards_directories: Vec<PathBuf>,
    pub learning_notes_directory: Option<PathBuf>,
    pub dictionaries_directory: Option<PathBuf>,
    pub export_directory: Option<PathBuf>,
}

/// Source directories given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub stories: Vec<PathBuf>,
    pub flashcards: Vec<PathBuf>,
    pub learning_notes: Option<PathBuf>,
    pub dictionaries: Option<PathBuf>,
}

impl VocabSyncConfig {
    /// Merge command-line directories over the configured ones.
    ///
    /// A non-empty list on the command line replaces the configured list.
    #[must_use]
    pub fn source_paths(&self, overrides: &SourceOverrides) -> SourcePaths {
        let pick = |cli: &[PathBuf], configured: &[PathBuf]| {
            if cli.is_empty() {
                configured.to_vec()
            } else {
                cli.to_vec()
            }
        };

        SourcePaths {
            stories: pick(&overrides.stories, &self.stories_directories),
            flashcards: pick(&overrides.flashcards, &self.flashcards_directories),
            learning_notes: overrides
                .learning_notes
                .clone()
                .or_else(|| self.learning_notes_directory.clone()),
            dictionaries: overrides
                .dictionaries
                .clone()
                .or_else(|| self.dictionaries_directory.clone()),
        }
    }

    /// Export directory: explicit flag, then config, then `~/.vocabsync/export`.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn export_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.export_directory {
            return Ok(path.clone());
        }
        global_vocabsync_dir()
            .map(|dir| dir.join("export"))
            .ok_or_else(|| Error::Config("Could not determine home directory".into()))
    }
}

/// Get the global vocabsync directory, `~/.vocabsync/`.
#[must_use]
pub fn global_vocabsync_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".vocabsync"))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `VOCABSYNC_TEST_DB=1` (or any non-empty
/// value other than `0`/`false`).
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("VOCABSYNC_TEST_DB")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

/// Get the test database path, `~/.vocabsync/test/vocabsync.db`.
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_vocabsync_dir().map(|dir| dir.join("test").join("vocabsync.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided (`--db` or `VOCABSYNC_DB`), use it
/// 2. `VOCABSYNC_TEST_DB` → test database
/// 3. Global location: `~/.vocabsync/data/vocabsync.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    global_vocabsync_dir().map(|dir| dir.join("data").join("vocabsync.db"))
}

/// Path of the config file: `VOCABSYNC_CONFIG` or `~/.vocabsync/config.json`.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("VOCABSYNC_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    global_vocabsync_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

/// Load the configuration from its default location.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<VocabSyncConfig> {
    load_config_from(&config_path()?)
}

/// Load the configuration from `path`. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<VocabSyncConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(VocabSyncConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/vocab.db");
        assert_eq!(resolve_db_path(Some(&explicit)), Some(explicit));
    }

    #[test]
    fn test_test_db_path_is_separate() {
        let global = global_vocabsync_dir().unwrap();
        let test = test_db_path().unwrap();

        assert!(test.to_string_lossy().contains("test"));
        assert!(test.ends_with("vocabsync.db"));
        assert_ne!(global.join("data").join("vocabsync.db"), test);
    }

    #[test]
    fn test_truthy_values() {
        for value in ["", "0", "false", "FALSE"] {
            assert!(!is_truthy(value), "{value} should be falsy");
        }
        for value in ["1", "true", "yes"] {
            assert!(is_truthy(value), "{value} should be truthy");
        }
    }

    #[test]
    fn test_missing_config_is_default() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, VocabSyncConfig::default());
    }

    #[test]
    fn test_partial_config_parses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"stories_directories": ["/notes/stories"], "learning_notes_directory": "/notes/learning"}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.stories_directories, [PathBuf::from("/notes/stories")]);
        assert_eq!(config.learning_notes_directory, Some(PathBuf::from("/notes/learning")));
        assert!(config.flashcards_directories.is_empty());
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = VocabSyncConfig {
            stories_directories: vec!["/config/stories".into()],
            flashcards_directories: vec!["/config/cards".into()],
            learning_notes_directory: Some("/config/learning".into()),
            dictionaries_directory: None,
            export_directory: Some("/config/export".into()),
        };
        let overrides = SourceOverrides {
            stories: vec!["/cli/stories".into()],
            dictionaries: Some("/cli/dict".into()),
            ..SourceOverrides::default()
        };

        let paths = config.source_paths(&overrides);
        assert_eq!(paths.stories, [PathBuf::from("/cli/stories")]);
        assert_eq!(paths.flashcards, [PathBuf::from("/config/cards")]);
        assert_eq!(paths.learning_notes, Some(PathBuf::from("/config/learning")));
        assert_eq!(paths.dictionaries, Some(PathBuf::from("/cli/dict")));

        assert_eq!(config.export_dir(None).unwrap(), PathBuf::from("/config/export"));
        assert_eq!(
            config.export_dir(Some(Path::new("/cli/out"))).unwrap(),
            PathBuf::from("/cli/out")
        );
    }
}
