//! Learning-log reconciliation.
//!
//! Histories only carry the canonical expression text, so events are
//! resolved to notes by Entry. The index is built once per import from
//! every stored note, plus any notes a preceding dry run planned.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::model::{LearningEvent, Note, QuizType};
use crate::source::{ExpressionHistory, LearningHistory, LearningRecord};
use crate::storage::{LearningLogRepository, NoteRepository};
use crate::sync::report::{Outcome, Reporter};
use crate::sync::types::{ImportOptions, ImportResult, SyncError, SyncResult};

/// A note an expression can resolve to.
#[derive(Debug, Clone)]
struct Candidate {
    note_id: String,
    usage: String,
}

/// Notes grouped by Entry, each group in creation order.
#[derive(Debug, Default)]
struct EntryIndex {
    by_entry: HashMap<String, Vec<Candidate>>,
}

impl EntryIndex {
    fn insert(&mut self, note: &Note) {
        self.by_entry
            .entry(note.entry.clone())
            .or_default()
            .push(Candidate {
                note_id: note.id.clone(),
                usage: note.usage.clone(),
            });
    }

    /// Resolve an expression to one note.
    ///
    /// With several notes sharing the Entry, the one whose usage equals the
    /// expression wins, otherwise the earliest created.
    fn resolve(&self, expression: &str) -> Option<&Candidate> {
        let candidates = self.by_entry.get(expression)?;
        if candidates.len() == 1 {
            return candidates.first();
        }

        if let Some(exact) = candidates.iter().find(|c| c.usage == expression) {
            return Some(exact);
        }

        let chosen = candidates.first()?;
        warn!(
            expression,
            candidates = candidates.len(),
            note_id = %chosen.note_id,
            "Ambiguous entry, using earliest note"
        );
        Some(chosen)
    }
}

/// One event drawn from a forward or reverse list.
struct FlatEvent<'h> {
    record: &'h LearningRecord,
    quiz_type: &'h str,
    easiness_factor: f64,
}

/// Forward events then reverse events, in source order.
fn flatten(group: &ExpressionHistory) -> Vec<FlatEvent<'_>> {
    let forward = group.learned_logs.iter().map(|record| FlatEvent {
        record,
        quiz_type: if record.quiz_type.is_empty() {
            QuizType::Notebook.as_str()
        } else {
            &record.quiz_type
        },
        easiness_factor: group.easiness_factor,
    });
    let reverse = group.reverse_logs.iter().map(|record| FlatEvent {
        record,
        quiz_type: QuizType::Reverse.as_str(),
        easiness_factor: group.reverse_easiness_factor,
    });
    forward.chain(reverse).collect()
}

/// Reconciles learning histories into learning events.
pub struct LearningLogImporter<'a, R: NoteRepository + LearningLogRepository + ?Sized> {
    repo: &'a mut R,
    options: ImportOptions,
    pending_notes: Vec<Note>,
    planned_events: HashSet<(String, String, NaiveDate)>,
}

impl<'a, R: NoteRepository + LearningLogRepository + ?Sized> LearningLogImporter<'a, R> {
    #[must_use]
    pub fn new(repo: &'a mut R, options: ImportOptions) -> Self {
        Self {
            repo,
            options,
            pending_notes: Vec::new(),
            planned_events: HashSet::new(),
        }
    }

    /// Also resolve against notes that are not stored yet.
    ///
    /// Used in dry runs with the notes the note importer planned.
    #[must_use]
    pub fn with_pending_notes(mut self, notes: Vec<Note>) -> Self {
        self.pending_notes = notes;
        self
    }

    /// Import every history, keyed by notebook id.
    ///
    /// # Errors
    ///
    /// Returns the first repository failure. Unresolved expressions are not
    /// errors; they are counted in `events_warnings`.
    pub fn import(
        &mut self,
        histories: &BTreeMap<String, Vec<LearningHistory>>,
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<ImportResult> {
        let index = self.build_index()?;
        let mut result = ImportResult::default();

        for (notebook_id, list) in histories {
            for history in list {
                for group in history.expression_groups() {
                    self.import_group(notebook_id, group, &index, &mut result, reporter)?;
                }
            }
        }

        info!(
            new = result.events_new,
            skipped = result.events_skipped,
            warnings = result.events_warnings,
            dry_run = self.options.dry_run,
            "Learning logs reconciled"
        );
        Ok(result)
    }

    fn build_index(&self) -> SyncResult<EntryIndex> {
        let notes = self
            .repo
            .find_all_notes()
            .map_err(SyncError::repository("load notes", "all notes"))?;

        let mut index = EntryIndex::default();
        for note in notes.iter().chain(&self.pending_notes) {
            index.insert(note);
        }
        debug!(entries = index.by_entry.len(), "Entry index built");
        Ok(index)
    }

    fn import_group(
        &mut self,
        notebook_id: &str,
        group: &ExpressionHistory,
        index: &EntryIndex,
        result: &mut ImportResult,
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<()> {
        let events = flatten(group);
        let Some(note) = index.resolve(group.expression.trim()) else {
            for event in &events {
                warn!(
                    notebook_id,
                    expression = %group.expression,
                    learned_at = %event.record.learned_at,
                    "No note for expression, skipping event"
                );
                result.events_warnings += 1;
                reporter.record(
                    Outcome::Warn,
                    "log",
                    &format!("{} ({notebook_id}): no matching note", group.expression),
                )?;
            }
            return Ok(());
        };

        for event in events {
            self.import_event(note, &group.expression, &event, result, reporter)?;
        }
        Ok(())
    }

    fn import_event(
        &mut self,
        note: &Candidate,
        expression: &str,
        event: &FlatEvent<'_>,
        result: &mut ImportResult,
        reporter: &mut Reporter<'_>,
    ) -> SyncResult<()> {
        let learned_at = event.record.learned_at;
        let key = (note.note_id.clone(), event.quiz_type.to_string(), learned_at);
        let key_text = format!("{}/{}/{learned_at}", note.note_id, event.quiz_type);
        let subject = format!("{expression} {} {learned_at}", event.quiz_type);

        let exists = self.planned_events.contains(&key)
            || self
                .repo
                .learning_event_exists(&note.note_id, event.quiz_type, learned_at)
                .map_err(SyncError::repository("find learning log", &key_text))?;

        if exists {
            result.events_skipped += 1;
            reporter.record(Outcome::Skip, "log", &subject)?;
            return Ok(());
        }

        if self.options.dry_run {
            self.planned_events.insert(key);
        } else {
            let record = event.record;
            let stored = LearningEvent::new(&note.note_id, record.status, learned_at, event.quiz_type)
                .with_review(
                    record.quality,
                    record.response_time_ms,
                    record.interval_days,
                    event.easiness_factor,
                );
            self.repo
                .create_learning_event(&stored)
                .map_err(SyncError::repository("create learning log", &key_text))?;
        }
        debug!(note_id = %note.note_id, quiz_type = event.quiz_type, %learned_at, "New learning log");
        result.events_new += 1;
        reporter.record(Outcome::New, "log", &subject)?;
        Ok(())
    }
}
