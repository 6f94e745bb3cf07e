//! YAML directory loader.
//!
//! Reads every `*.yml` / `*.yaml` file of a directory in sorted path order,
//! so repeated imports see the same source order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{DictionaryResponse, FlashcardNotebook, LearningHistory, StoryNotebook};

/// Directories to read sources from. Absent entries load nothing.
#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    pub stories: Vec<PathBuf>,
    pub flashcards: Vec<PathBuf>,
    pub learning_notes: Option<PathBuf>,
    pub dictionaries: Option<PathBuf>,
}

/// Every source collection, loaded.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    pub stories: Vec<StoryNotebook>,
    pub flashcards: Vec<FlashcardNotebook>,
    /// Keyed by notebook id (the history file stem).
    pub histories: BTreeMap<String, Vec<LearningHistory>>,
    pub dictionary: Vec<DictionaryResponse>,
}

impl SourceSet {
    /// Load all configured sources.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending path if a directory cannot be
    /// listed or a file cannot be parsed.
    pub fn load(paths: &SourcePaths) -> Result<Self> {
        let mut set = Self::default();

        for dir in &paths.stories {
            set.stories.extend(load_dir::<StoryNotebook>(dir)?);
        }
        for dir in &paths.flashcards {
            set.flashcards.extend(load_dir::<FlashcardNotebook>(dir)?);
        }
        if let Some(dir) = &paths.learning_notes {
            set.histories = load_histories(dir)?;
        }
        if let Some(dir) = &paths.dictionaries {
            set.dictionary = load_dir::<DictionaryResponse>(dir)?;
        }

        debug!(
            stories = set.stories.len(),
            flashcards = set.flashcards.len(),
            histories = set.histories.len(),
            dictionary = set.dictionary.len(),
            "Sources loaded"
        );
        Ok(set)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
            && self.flashcards.is_empty()
            && self.histories.is_empty()
            && self.dictionary.is_empty()
    }
}

/// Sorted YAML files directly inside `dir`.
fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Source directory not found: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    yaml_files(dir)?.iter().map(|path| parse_file(path)).collect()
}

fn load_histories(dir: &Path) -> Result<BTreeMap<String, Vec<LearningHistory>>> {
    let mut histories = BTreeMap::new();
    for path in yaml_files(dir)? {
        let Some(notebook_id) = path.file_stem().and_then(|s| s.to_str()) else {
            bail!("Invalid history file name: {}", path.display());
        };
        let parsed: Vec<LearningHistory> = parse_file(&path)?;
        histories
            .entry(notebook_id.to_string())
            .or_insert_with(Vec::new)
            .extend(parsed);
    }
    Ok(histories)
}
