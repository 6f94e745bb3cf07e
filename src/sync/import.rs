//! Import driver.
//!
//! Runs the reconcilers in dependency order: notes, then learning logs
//! (which resolve against the notes), then the dictionary cache.

use tracing::info;

use crate::error::{Error, Result};
use crate::source::{occurrences, SourceSet};
use crate::storage::{DictionaryRepository, LearningLogRepository, NoteRepository};
use crate::sync::dictionary::DictionaryImporter;
use crate::sync::learning_logs::LearningLogImporter;
use crate::sync::notes::NoteImporter;
use crate::sync::report::Reporter;
use crate::sync::types::{ImportOptions, ImportResult};

/// Imports a loaded [`SourceSet`] into a store.
pub struct Importer<'a, R: ?Sized> {
    repo: &'a mut R,
    options: ImportOptions,
}

impl<'a, R> Importer<'a, R>
where
    R: NoteRepository + LearningLogRepository + DictionaryRepository + ?Sized,
{
    #[must_use]
    pub fn new(repo: &'a mut R, options: ImportOptions) -> Self {
        Self { repo, options }
    }

    /// Run every phase, accumulating counters into `result`.
    ///
    /// A failed note phase stops the import, since the learning-log index
    /// would be incomplete. A failed dictionary phase leaves the counters of
    /// the earlier phases in `result`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Import`] naming the phase that failed.
    pub fn import_all(
        &mut self,
        sources: &SourceSet,
        reporter: &mut Reporter<'_>,
        result: &mut ImportResult,
    ) -> Result<()> {
        let found = occurrences(&sources.stories, &sources.flashcards);

        let mut notes = NoteImporter::new(&mut *self.repo, self.options);
        let phase = notes
            .import(&found, reporter)
            .map_err(|source| Error::Import {
                phase: "notes",
                source,
            })?;
        result.merge(&phase);
        let pending = notes.into_planned_notes();

        let phase = LearningLogImporter::new(&mut *self.repo, self.options)
            .with_pending_notes(pending)
            .import(&sources.histories, reporter)
            .map_err(|source| Error::Import {
                phase: "learning logs",
                source,
            })?;
        result.merge(&phase);

        let phase = DictionaryImporter::new(&mut *self.repo, self.options)
            .import(&sources.dictionary, reporter)
            .map_err(|source| Error::Import {
                phase: "dictionary",
                source,
            })?;
        result.merge(&phase);

        info!(
            changes = result.changes(),
            warnings = result.events_warnings,
            dry_run = self.options.dry_run,
            "Import finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::source::DictionaryResponse;
    use crate::storage::SqliteStorage;
    use crate::sync::testing::{
        card, deck_notebook, definition, expression, flashcard_history, record, story,
        story_history, RecordingRepository,
    };

    fn sources() -> SourceSet {
        SourceSet {
            stories: vec![story(
                "friends",
                "Episode 1",
                "Cafe",
                vec![
                    definition("break the ice", "start a conversation", "to initiate social interaction"),
                    definition("resilient", "", "able to recover quickly"),
                ],
            )],
            flashcards: vec![deck_notebook("core", "Deck 1", vec![card("lucid", "")])],
            histories: BTreeMap::from([
                (
                    "friends".to_string(),
                    vec![story_history(
                        "friends",
                        vec![
                            expression("start a conversation", vec![record(20, "")], vec![record(21, "")]),
                            expression("unknown-phrase", vec![record(20, "")], vec![]),
                        ],
                    )],
                ),
                (
                    "core".to_string(),
                    vec![flashcard_history("core", vec![expression("lucid", vec![record(22, "freeform")], vec![])])],
                ),
            ]),
            dictionary: vec![DictionaryResponse {
                word: "resilient".into(),
                response: serde_json::json!({"senses": ["able to recover"]}),
            }],
        }
    }

    fn run<R>(repo: &mut R, options: ImportOptions) -> (ImportResult, Result<()>)
    where
        R: NoteRepository + LearningLogRepository + DictionaryRepository,
    {
        let mut sink = std::io::sink();
        let mut reporter = Reporter::new(&mut sink);
        let mut result = ImportResult::default();
        let outcome = Importer::new(repo, options).import_all(&sources(), &mut reporter, &mut result);
        (result, outcome)
    }

    #[test]
    fn test_first_import() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let (result, outcome) = run(&mut storage, ImportOptions::default());
        outcome.unwrap();

        assert_eq!(
            result,
            ImportResult {
                notes_new: 3,
                links_new: 3,
                events_new: 3,
                events_warnings: 1,
                dictionary_new: 1,
                ..ImportResult::default()
            }
        );
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        run(&mut storage, ImportOptions::default()).1.unwrap();
        let (result, outcome) = run(&mut storage, ImportOptions::default());
        outcome.unwrap();

        assert_eq!(result.changes(), 0);
        assert_eq!(result.notes_skipped, 3);
        assert_eq!(result.links_skipped, 3);
        assert_eq!(result.events_skipped, 3);
        assert_eq!(result.events_warnings, 1);
        assert_eq!(result.dictionary_skipped, 1);
    }

    #[test]
    fn test_dry_run_previews_first_import() {
        let mut real = SqliteStorage::open_memory().unwrap();
        let (expected, outcome) = run(&mut real, ImportOptions::default());
        outcome.unwrap();

        let mut spy = RecordingRepository::new(SqliteStorage::open_memory().unwrap());
        let (previewed, outcome) = run(
            &mut spy,
            ImportOptions {
                dry_run: true,
                refresh_existing: false,
            },
        );
        outcome.unwrap();

        assert_eq!(previewed, expected);
        assert_eq!(spy.writes(), 0);
    }

    #[test]
    fn test_note_failure_stops_later_phases() {
        let mut spy = RecordingRepository::new(SqliteStorage::open_memory().unwrap());
        spy.fail_on("create_note");

        let (result, outcome) = run(&mut spy, ImportOptions::default());
        let err = outcome.unwrap_err();

        assert!(matches!(err, Error::Import { phase: "notes", .. }));
        assert_eq!(result, ImportResult::default());
        assert!(spy.inner().find_all_dictionary_entries().unwrap().is_empty());
    }

    #[test]
    fn test_dictionary_failure_keeps_earlier_phases() {
        let mut spy = RecordingRepository::new(SqliteStorage::open_memory().unwrap());
        spy.fail_on("upsert_dictionary_entry");

        let (result, outcome) = run(&mut spy, ImportOptions::default());
        let err = outcome.unwrap_err();

        assert!(matches!(err, Error::Import { phase: "dictionary", .. }));
        assert_eq!(err.exit_code(), 6);
        assert_eq!(result.notes_new, 3);
        assert_eq!(result.events_new, 3);
        assert_eq!(result.dictionary_new, 0);
        assert_eq!(spy.inner().find_all_notes().unwrap().len(), 3);
        assert_eq!(spy.inner().find_all_learning_events().unwrap().len(), 3);
    }
}
