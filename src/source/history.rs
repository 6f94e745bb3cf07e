//! Learning histories, one list per notebook.
//!
//! Flashcard histories hold a flat list of expression groups. Story and book
//! histories nest the groups under scenes. The `type` tag in the metadata
//! decides which list is read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::LearningStatus;

/// Starting easiness factor for an expression with no recorded value.
pub const DEFAULT_EASINESS_FACTOR: f64 = 2.5;

fn default_easiness_factor() -> f64 {
    DEFAULT_EASINESS_FACTOR
}

/// Which shape a history uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    #[default]
    Story,
    Flashcard,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetadata {
    #[serde(default)]
    pub notebook_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: HistoryKind,
}

/// A single recorded review as it appears in the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub status: LearningStatus,
    pub learned_at: NaiveDate,
    #[serde(default)]
    pub quality: i32,
    #[serde(default)]
    pub response_time_ms: i64,
    /// May be empty in older histories.
    #[serde(default)]
    pub quiz_type: String,
    #[serde(default)]
    pub interval_days: i32,
}

/// Every review recorded for one expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionHistory {
    pub expression: String,
    #[serde(default = "default_easiness_factor")]
    pub easiness_factor: f64,
    #[serde(default = "default_easiness_factor")]
    pub reverse_easiness_factor: f64,
    #[serde(default)]
    pub learned_logs: Vec<LearningRecord>,
    #[serde(default)]
    pub reverse_logs: Vec<LearningRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneHistory {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub expressions: Vec<ExpressionHistory>,
}

/// One learning history document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningHistory {
    #[serde(default)]
    pub metadata: HistoryMetadata,
    /// Read for flashcard histories.
    #[serde(default)]
    pub expressions: Vec<ExpressionHistory>,
    /// Read for story and book histories.
    #[serde(default)]
    pub scenes: Vec<SceneHistory>,
}

impl LearningHistory {
    /// Expression groups in source order, selected by the history type.
    #[must_use]
    pub fn expression_groups(&self) -> Vec<&ExpressionHistory> {
        match self.metadata.kind {
            HistoryKind::Flashcard => self.expressions.iter().collect(),
            HistoryKind::Story => self
                .scenes
                .iter()
                .flat_map(|scene| scene.expressions.iter())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(expression: &str) -> ExpressionHistory {
        ExpressionHistory {
            expression: expression.to_string(),
            easiness_factor: DEFAULT_EASINESS_FACTOR,
            reverse_easiness_factor: DEFAULT_EASINESS_FACTOR,
            learned_logs: Vec::new(),
            reverse_logs: Vec::new(),
        }
    }

    #[test]
    fn test_type_tag_selects_list() {
        let mut history = LearningHistory {
            metadata: HistoryMetadata {
                kind: HistoryKind::Flashcard,
                ..HistoryMetadata::default()
            },
            expressions: vec![group("flat")],
            scenes: vec![SceneHistory {
                title: "Scene".into(),
                expressions: vec![group("nested")],
            }],
        };

        let names: Vec<&str> = history
            .expression_groups()
            .iter()
            .map(|g| g.expression.as_str())
            .collect();
        assert_eq!(names, ["flat"]);

        history.metadata.kind = HistoryKind::Story;
        let names: Vec<&str> = history
            .expression_groups()
            .iter()
            .map(|g| g.expression.as_str())
            .collect();
        assert_eq!(names, ["nested"]);
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let json = r#"{"expression":"resilient","learned_logs":[{"status":"understood","learned_at":"2025-01-20"}]}"#;
        let parsed: ExpressionHistory = serde_json::from_str(json).unwrap();

        assert!((parsed.easiness_factor - DEFAULT_EASINESS_FACTOR).abs() < f64::EPSILON);
        assert!(parsed.reverse_logs.is_empty());
        assert_eq!(parsed.learned_logs[0].quiz_type, "");
        assert_eq!(parsed.learned_logs[0].quality, 0);
    }
}
