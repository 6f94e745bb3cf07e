//! Cached dictionary lookups.

use serde::{Deserialize, Serialize};

/// A lookup response as cached on disk: the word plus an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryResponse {
    pub word: String,
    #[serde(default)]
    pub response: serde_json::Value,
}
