//! Test fixtures shared by the reconciler tests.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::{DictionaryEntry, LearningEvent, LearningStatus, Note, NotebookKind, NotebookLink};
use crate::source::{
    Definition, ExpressionHistory, FlashcardDeck, FlashcardNotebook, HistoryKind, HistoryMetadata,
    LearningHistory, LearningRecord, SceneHistory, StoryEpisode, StoryNotebook, StoryScene,
};
use crate::storage::{DictionaryRepository, LearningLogRepository, NoteRepository};

/// Wraps a repository, counts write calls and can inject failures.
pub struct RecordingRepository<R> {
    inner: R,
    writes: usize,
    fail_on: Option<&'static str>,
}

impl<R> RecordingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            writes: 0,
            fail_on: None,
        }
    }

    /// Make every call to `method` fail.
    pub fn fail_on(&mut self, method: &'static str) {
        self.fail_on = Some(method);
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn check(&self, method: &str) -> Result<()> {
        if self.fail_on == Some(method) {
            return Err(Error::Other(format!("injected failure in {method}")));
        }
        Ok(())
    }

    fn write(&mut self, method: &str) -> Result<()> {
        self.check(method)?;
        self.writes += 1;
        Ok(())
    }
}

impl<R: NoteRepository> NoteRepository for RecordingRepository<R> {
    fn find_note(&self, usage: &str, entry: &str) -> Result<Option<Note>> {
        self.check("find_note")?;
        self.inner.find_note(usage, entry)
    }

    fn find_all_notes(&self) -> Result<Vec<Note>> {
        self.check("find_all_notes")?;
        self.inner.find_all_notes()
    }

    fn create_note(&mut self, note: &Note, link: &NotebookLink) -> Result<()> {
        self.write("create_note")?;
        self.inner.create_note(note, link)
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        self.write("update_note")?;
        self.inner.update_note(note)
    }

    fn notebook_link_exists(
        &self,
        note_id: &str,
        kind: NotebookKind,
        notebook_id: &str,
        group: &str,
    ) -> Result<bool> {
        self.check("notebook_link_exists")?;
        self.inner.notebook_link_exists(note_id, kind, notebook_id, group)
    }

    fn create_notebook_link(&mut self, link: &NotebookLink) -> Result<()> {
        self.write("create_notebook_link")?;
        self.inner.create_notebook_link(link)
    }
}

impl<R: LearningLogRepository> LearningLogRepository for RecordingRepository<R> {
    fn find_all_learning_events(&self) -> Result<Vec<LearningEvent>> {
        self.check("find_all_learning_events")?;
        self.inner.find_all_learning_events()
    }

    fn learning_event_exists(
        &self,
        note_id: &str,
        quiz_type: &str,
        learned_at: NaiveDate,
    ) -> Result<bool> {
        self.check("learning_event_exists")?;
        self.inner.learning_event_exists(note_id, quiz_type, learned_at)
    }

    fn create_learning_event(&mut self, event: &LearningEvent) -> Result<()> {
        self.write("create_learning_event")?;
        self.inner.create_learning_event(event)
    }
}

impl<R: DictionaryRepository> DictionaryRepository for RecordingRepository<R> {
    fn find_dictionary_entry(&self, word: &str) -> Result<Option<DictionaryEntry>> {
        self.check("find_dictionary_entry")?;
        self.inner.find_dictionary_entry(word)
    }

    fn find_all_dictionary_entries(&self) -> Result<Vec<DictionaryEntry>> {
        self.check("find_all_dictionary_entries")?;
        self.inner.find_all_dictionary_entries()
    }

    fn upsert_dictionary_entry(&mut self, entry: &DictionaryEntry) -> Result<()> {
        self.write("upsert_dictionary_entry")?;
        self.inner.upsert_dictionary_entry(entry)
    }
}

pub fn definition(expression: &str, definition: &str, meaning: &str) -> Definition {
    Definition {
        expression: expression.into(),
        definition: definition.into(),
        meaning: meaning.into(),
        level: "A2".into(),
        dictionary_number: 1,
        ..Definition::default()
    }
}

pub fn card(expression: &str, definition: &str) -> Definition {
    self::definition(expression, definition, "")
}

/// A story notebook with one episode holding one scene.
pub fn story(id: &str, episode: &str, scene: &str, definitions: Vec<Definition>) -> StoryNotebook {
    StoryNotebook {
        id: id.into(),
        name: id.into(),
        episodes: vec![StoryEpisode {
            title: episode.into(),
            scenes: vec![StoryScene {
                title: scene.into(),
                definitions,
            }],
        }],
        ..StoryNotebook::default()
    }
}

/// A flashcard notebook with one deck.
pub fn deck_notebook(id: &str, deck: &str, cards: Vec<Definition>) -> FlashcardNotebook {
    FlashcardNotebook {
        id: id.into(),
        name: id.into(),
        decks: vec![FlashcardDeck {
            title: deck.into(),
            cards,
        }],
    }
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

pub fn record(day: u32, quiz_type: &str) -> LearningRecord {
    LearningRecord {
        status: LearningStatus::Understood,
        learned_at: date(day),
        quality: 4,
        response_time_ms: 1200,
        quiz_type: quiz_type.into(),
        interval_days: 1,
    }
}

pub fn expression(
    expression: &str,
    learned: Vec<LearningRecord>,
    reverse: Vec<LearningRecord>,
) -> ExpressionHistory {
    ExpressionHistory {
        expression: expression.into(),
        easiness_factor: 2.6,
        reverse_easiness_factor: 2.2,
        learned_logs: learned,
        reverse_logs: reverse,
    }
}

/// A story history with every expression in one scene.
pub fn story_history(notebook_id: &str, expressions: Vec<ExpressionHistory>) -> LearningHistory {
    LearningHistory {
        metadata: HistoryMetadata {
            notebook_id: notebook_id.into(),
            title: "Episode 1".into(),
            kind: HistoryKind::Story,
        },
        expressions: Vec::new(),
        scenes: vec![SceneHistory {
            title: "Cafe".into(),
            expressions,
        }],
    }
}

/// A flashcard history with a flat expression list.
pub fn flashcard_history(notebook_id: &str, expressions: Vec<ExpressionHistory>) -> LearningHistory {
    LearningHistory {
        metadata: HistoryMetadata {
            notebook_id: notebook_id.into(),
            title: "Deck 1".into(),
            kind: HistoryKind::Flashcard,
        },
        expressions,
        scenes: Vec::new(),
    }
}
