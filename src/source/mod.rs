//! Source collections, already materialized in memory.
//!
//! The reconcilers never read files. They consume the values defined here:
//!
//! - [`notebook`] - story/book notebooks and flashcard notebooks, plus the
//!   adapter that collapses all three kinds into [`Occurrence`]
//! - [`history`] - per-notebook learning histories
//! - [`dictionary`] - cached dictionary lookups
//! - [`loader`] - YAML directory loader used by the binary

pub mod dictionary;
pub mod history;
pub mod loader;
pub mod notebook;

pub use dictionary::DictionaryResponse;
pub use history::{
    ExpressionHistory, HistoryKind, HistoryMetadata, LearningHistory, LearningRecord,
    SceneHistory,
};
pub use loader::{SourcePaths, SourceSet};
pub use notebook::{
    occurrences, Definition, FlashcardDeck, FlashcardNotebook, Occurrence, SourceNotebook,
    StoryEpisode, StoryKind, StoryNotebook, StoryScene,
};
