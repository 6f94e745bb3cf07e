//! Note model for vocabsync.
//!
//! A note is one vocabulary entry keyed by the pair (usage, entry). It owns
//! its images and references, and is linked to every notebook group it was
//! observed in.

use serde::{Deserialize, Serialize};

/// Kind of notebook a vocabulary occurrence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotebookKind {
    Story,
    Book,
    Flashcard,
}

impl NotebookKind {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Book => "book",
            Self::Flashcard => "flashcard",
        }
    }
}

impl std::fmt::Display for NotebookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotebookKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "story" => Ok(Self::Story),
            "book" => Ok(Self::Book),
            "flashcard" => Ok(Self::Flashcard),
            _ => Err(format!("Unknown notebook kind: {s}")),
        }
    }
}

/// A reference link attached to a note (article, dictionary page, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteReference {
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// Association between a note and the notebook group it was observed in.
///
/// At most one link exists per (note, kind, notebook id, group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookLink {
    pub note_id: String,
    pub notebook_kind: NotebookKind,
    pub notebook_id: String,
    /// Chapter, episode or deck title.
    pub group: String,
    /// Scene title; empty for flashcards.
    pub subgroup: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl NotebookLink {
    /// The uniqueness key of this link. Subgroup is deliberately not part of it.
    #[must_use]
    pub fn key(&self) -> (String, NotebookKind, String, String) {
        (
            self.note_id.clone(),
            self.notebook_kind,
            self.notebook_id.clone(),
            self.group.clone(),
        )
    }
}

/// A vocabulary note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier (`note_` prefix)
    pub id: String,

    /// Surface form as it appeared in the source text (e.g. "ran")
    pub usage: String,

    /// Canonical headword or definition key (e.g. "run")
    pub entry: String,

    pub meaning: String,

    pub level: String,

    /// Sense number in the learner's dictionary, 0 when unknown
    pub dictionary_number: i32,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub references: Vec<NoteReference>,

    #[serde(default)]
    pub notebook_links: Vec<NotebookLink>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Note {
    /// Create a new note with a fresh id and empty content.
    pub fn new(usage: &str, entry: &str) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let id = format!("note_{}", &uuid::Uuid::new_v4().to_string()[..12]);

        Self {
            id,
            usage: usage.to_string(),
            entry: entry.to_string(),
            meaning: String::new(),
            level: String::new(),
            dictionary_number: 0,
            images: Vec::new(),
            references: Vec::new(),
            notebook_links: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set meaning, level and dictionary number.
    #[must_use]
    pub fn with_content(mut self, meaning: &str, level: &str, dictionary_number: i32) -> Self {
        self.meaning = meaning.to_string();
        self.level = level.to_string();
        self.dictionary_number = dictionary_number;
        self
    }

    /// Attach image links and references.
    #[must_use]
    pub fn with_attachments(mut self, images: Vec<String>, references: Vec<NoteReference>) -> Self {
        self.images = images;
        self.references = references;
        self
    }
}
