//! Learning events recorded against notes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStatus {
    Understood,
    Misunderstood,
    Usable,
}

impl LearningStatus {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Understood => "understood",
            Self::Misunderstood => "misunderstood",
            Self::Usable => "usable",
        }
    }
}

impl std::str::FromStr for LearningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "understood" => Ok(Self::Understood),
            "misunderstood" => Ok(Self::Misunderstood),
            "usable" => Ok(Self::Usable),
            _ => Err(format!("Unknown learning status: {s}")),
        }
    }
}

/// Pedagogical mode a review was recorded under.
///
/// Stored events keep the quiz type as free text so values written by other
/// tools survive a round trip; these are the ones vocabsync itself assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizType {
    /// Recognition inside the notebook it was learned from.
    Notebook,
    /// Free recall.
    Freeform,
    /// Production (meaning to expression).
    Reverse,
}

impl QuizType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notebook => "notebook",
            Self::Freeform => "freeform",
            Self::Reverse => "reverse",
        }
    }
}

/// One recorded review outcome for a note.
///
/// At most one event exists per (note, quiz type, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningEvent {
    /// Unique identifier (`log_` prefix)
    pub id: String,
    pub note_id: String,
    pub status: LearningStatus,
    /// Day the review happened; exported as `YYYY-MM-DD`.
    pub learned_at: NaiveDate,
    /// Self-assessed recall quality, 1-5
    pub quality: i32,
    pub response_time_ms: i64,
    pub quiz_type: String,
    pub interval_days: i32,
    pub easiness_factor: f64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl LearningEvent {
    /// Create an event with a fresh id and no review measurements.
    pub fn new(note_id: &str, status: LearningStatus, learned_at: NaiveDate, quiz_type: &str) -> Self {
        Self {
            id: format!("log_{}", &uuid::Uuid::new_v4().to_string()[..12]),
            note_id: note_id.to_string(),
            status,
            learned_at,
            quality: 0,
            response_time_ms: 0,
            quiz_type: quiz_type.to_string(),
            interval_days: 0,
            easiness_factor: 0.0,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Set the review measurements.
    #[must_use]
    pub fn with_review(
        mut self,
        quality: i32,
        response_time_ms: i64,
        interval_days: i32,
        easiness_factor: f64,
    ) -> Self {
        self.quality = quality;
        self.response_time_ms = response_time_ms;
        self.interval_days = interval_days;
        self.easiness_factor = easiness_factor;
        self
    }

    /// The uniqueness key of this event.
    #[must_use]
    pub fn key(&self) -> (String, String, NaiveDate) {
        (self.note_id.clone(), self.quiz_type.clone(), self.learned_at)
    }
}
