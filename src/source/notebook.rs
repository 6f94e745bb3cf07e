//! Story, book and flashcard notebooks.
//!
//! Story and book notebooks nest vocabulary under episodes and scenes;
//! flashcard notebooks nest cards under decks. Both carry the same
//! [`Definition`] shape, and [`SourceNotebook`] flattens either into a list
//! of [`Occurrence`] values so the note reconciler sees a single type.

use serde::{Deserialize, Serialize};

use crate::model::{NoteReference, NotebookKind};

/// One vocabulary entry as written in a notebook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Expression as it appears in the text.
    pub expression: String,
    /// Canonical form, when it differs from the expression.
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub dictionary_number: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub references: Vec<NoteReference>,
}

impl Definition {
    /// Surface form used as the note's usage, without surrounding whitespace.
    #[must_use]
    pub fn usage(&self) -> &str {
        self.expression.trim()
    }

    /// Canonical key used as the note's entry.
    ///
    /// Both the definition and the expression are trimmed, so `" run"` and
    /// `"run"` are the same entry. Falls back to the expression when no
    /// definition was written.
    #[must_use]
    pub fn entry(&self) -> &str {
        match self.definition.trim() {
            "" => self.usage(),
            definition => definition,
        }
    }
}

/// Whether a narrative notebook is a story or a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryKind {
    #[default]
    Story,
    Book,
}

/// A scene inside an episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryScene {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

/// An episode or chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryEpisode {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub scenes: Vec<StoryScene>,
}

/// A story or book notebook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryNotebook {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: StoryKind,
    #[serde(default)]
    pub episodes: Vec<StoryEpisode>,
}

/// A titled set of cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Definition>,
}

/// A flashcard notebook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashcardNotebook {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub decks: Vec<FlashcardDeck>,
}

/// A notebook of any kind, borrowed for adaptation.
#[derive(Debug, Clone, Copy)]
pub enum SourceNotebook<'a> {
    Story(&'a StoryNotebook),
    Book(&'a StoryNotebook),
    Flashcard(&'a FlashcardNotebook),
}

impl<'a> SourceNotebook<'a> {
    /// Wrap a narrative notebook according to its declared kind.
    #[must_use]
    pub fn narrative(notebook: &'a StoryNotebook) -> Self {
        match notebook.kind {
            StoryKind::Story => Self::Story(notebook),
            StoryKind::Book => Self::Book(notebook),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NotebookKind {
        match self {
            Self::Story(_) => NotebookKind::Story,
            Self::Book(_) => NotebookKind::Book,
            Self::Flashcard(_) => NotebookKind::Flashcard,
        }
    }

    /// Every vocabulary occurrence in source order.
    #[must_use]
    pub fn occurrences(&self) -> Vec<Occurrence<'a>> {
        let kind = self.kind();
        match *self {
            Self::Story(notebook) | Self::Book(notebook) => notebook
                .episodes
                .iter()
                .flat_map(|episode| {
                    episode.scenes.iter().flat_map(move |scene| {
                        scene.definitions.iter().map(move |definition| Occurrence {
                            kind,
                            notebook_id: &notebook.id,
                            group: &episode.title,
                            subgroup: &scene.title,
                            definition,
                        })
                    })
                })
                .collect(),
            Self::Flashcard(notebook) => notebook
                .decks
                .iter()
                .flat_map(|deck| {
                    deck.cards.iter().map(move |definition| Occurrence {
                        kind,
                        notebook_id: &notebook.id,
                        group: &deck.title,
                        subgroup: "",
                        definition,
                    })
                })
                .collect(),
        }
    }
}

/// A single vocabulary entry together with where it was found.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub kind: NotebookKind,
    pub notebook_id: &'a str,
    pub group: &'a str,
    pub subgroup: &'a str,
    pub definition: &'a Definition,
}

/// Flatten all notebooks into occurrences: narrative notebooks first, then
/// flashcards, each in source order.
#[must_use]
pub fn occurrences<'a>(
    stories: &'a [StoryNotebook],
    flashcards: &'a [FlashcardNotebook],
) -> Vec<Occurrence<'a>> {
    stories
        .iter()
        .map(SourceNotebook::narrative)
        .chain(flashcards.iter().map(SourceNotebook::Flashcard))
        .flat_map(|notebook| notebook.occurrences())
        .collect()
}
