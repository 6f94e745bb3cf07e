//! Dictionary cache reconciliation.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::model::DictionaryEntry;
use crate::source::DictionaryResponse;
use crate::storage::DictionaryRepository;
use crate::sync::report::{Outcome, Reporter};
use crate::sync::types::{ImportOptions, ImportResult, SyncError, SyncResult};

/// Reconciles cached lookup responses into dictionary entries, keyed by word.
pub struct DictionaryImporter<'a, R: DictionaryRepository + ?Sized> {
    repo: &'a mut R,
    options: ImportOptions,
    planned_words: HashSet<String>,
}

impl<'a, R: DictionaryRepository + ?Sized> DictionaryImporter<'a, R> {
    #[must_use]
    pub fn new(repo: &'a mut R, options: ImportOptions) -> Self {
        Self {
            repo,
            options,
            planned_words: HashSet::new(),
        }
    }

    /// Import every response in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized or a repository
    /// call fails.
    pub fn import(
        &mut self,
        responses: &[DictionaryResponse],
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<ImportResult> {
        let mut result = ImportResult::default();

        for response in responses {
            self.import_response(response, &mut result, reporter)?;
        }

        info!(
            new = result.dictionary_new,
            skipped = result.dictionary_skipped,
            updated = result.dictionary_updated,
            dry_run = self.options.dry_run,
            "Dictionary reconciled"
        );
        Ok(result)
    }

    fn import_response(
        &mut self,
        response: &DictionaryResponse,
        result: &mut ImportResult,
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<()> {
        let word = response.word.as_str();
        let payload = serde_json::to_string(&response.response).map_err(|source| SyncError::Encode {
            word: word.to_string(),
            source,
        })?;

        let existing = if self.planned_words.contains(word) {
            Some(DictionaryEntry::cached(word, String::new()))
        } else {
            self.repo
                .find_dictionary_entry(word)
                .map_err(SyncError::repository("find dictionary entry", word))?
        };

        match existing {
            None => {
                let entry = DictionaryEntry::cached(word, payload);
                if self.options.dry_run {
                    self.planned_words.insert(word.to_string());
                } else {
                    self.repo
                        .upsert_dictionary_entry(&entry)
                        .map_err(SyncError::repository("create dictionary entry", word))?;
                }
                debug!(word, "New dictionary entry");
                result.dictionary_new += 1;
                reporter.record(Outcome::New, "dictionary", word)?;
            }
            Some(_) if !self.options.refresh_existing => {
                debug!(word, "Dictionary entry exists");
                result.dictionary_skipped += 1;
                reporter.record(Outcome::Skip, "dictionary", word)?;
            }
            Some(mut entry) => {
                entry.response = payload;
                entry.updated_at = chrono::Utc::now().timestamp_millis();
                if !self.options.dry_run {
                    self.repo
                        .upsert_dictionary_entry(&entry)
                        .map_err(SyncError::repository("update dictionary entry", word))?;
                }
                debug!(word, "Updated dictionary entry");
                result.dictionary_updated += 1;
                reporter.record(Outcome::Update, "dictionary", word)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SOURCE_TYPE_CACHED_LOOKUP;
    use crate::storage::SqliteStorage;
    use crate::sync::testing::RecordingRepository;
    use serde_json::json;

    fn response(word: &str, payload: serde_json::Value) -> DictionaryResponse {
        DictionaryResponse {
            word: word.into(),
            response: payload,
        }
    }

    fn run<R: DictionaryRepository>(
        repo: &mut R,
        responses: &[DictionaryResponse],
        options: ImportOptions,
    ) -> ImportResult {
        let mut sink = std::io::sink();
        let mut reporter = Reporter::new(&mut sink);
        DictionaryImporter::new(repo, options)
            .import(responses, &mut reporter)
            .unwrap()
    }

    #[test]
    fn test_new_entry_is_cached_lookup() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let result = run(
            &mut storage,
            &[response("resilient", json!({"senses": ["able to recover"]}))],
            ImportOptions::default(),
        );

        assert_eq!(result.dictionary_new, 1);
        let entry = storage.find_dictionary_entry("resilient").unwrap().unwrap();
        assert_eq!(entry.source_type, SOURCE_TYPE_CACHED_LOOKUP);
        let payload: serde_json::Value = serde_json::from_str(&entry.response).unwrap();
        assert_eq!(payload["senses"][0], "able to recover");
    }

    #[test]
    fn test_existing_entry_is_skipped_without_write() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage
            .upsert_dictionary_entry(&DictionaryEntry::cached("resilient", "{}".into()))
            .unwrap();
        let mut spy = RecordingRepository::new(storage);

        let result = run(
            &mut spy,
            &[response("resilient", json!({"v": 2}))],
            ImportOptions::default(),
        );

        assert_eq!(result.dictionary_skipped, 1);
        assert_eq!(result.dictionary_new, 0);
        assert_eq!(spy.writes(), 0);
        let entry = spy.inner().find_dictionary_entry("resilient").unwrap().unwrap();
        assert_eq!(entry.response, "{}");
    }

    #[test]
    fn test_refresh_replaces_payload() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        run(&mut storage, &[response("resilient", json!({"v": 1}))], ImportOptions::default());

        let result = run(
            &mut storage,
            &[response("resilient", json!({"v": 2}))],
            ImportOptions {
                dry_run: false,
                refresh_existing: true,
            },
        );

        assert_eq!(result.dictionary_updated, 1);
        let entries = storage.find_all_dictionary_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].response, r#"{"v":2}"#);
    }

    #[test]
    fn test_dry_run_counts_duplicates_like_real_run() {
        let input = [
            response("resilient", json!({"v": 1})),
            response("lucid", json!(null)),
            response("resilient", json!({"v": 2})),
        ];
        let options = ImportOptions {
            dry_run: false,
            refresh_existing: true,
        };

        let mut real = SqliteStorage::open_memory().unwrap();
        let expected = run(&mut real, &input, options);
        assert_eq!(expected.dictionary_new, 2);
        assert_eq!(expected.dictionary_updated, 1);

        let mut spy = RecordingRepository::new(SqliteStorage::open_memory().unwrap());
        let previewed = run(
            &mut spy,
            &input,
            ImportOptions {
                dry_run: true,
                ..options
            },
        );
        assert_eq!(previewed, expected);
        assert_eq!(spy.writes(), 0);
    }
}
