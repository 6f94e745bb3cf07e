//! Cached dictionary lookups.

use serde::{Deserialize, Serialize};

/// Source type recorded for entries imported from the lookup cache.
pub const SOURCE_TYPE_CACHED_LOOKUP: &str = "cached-lookup";

/// A cached lookup result, keyed by word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    pub source_type: String,
    /// Raw lookup payload, serialized JSON. Exported as an embedded string.
    pub response: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl DictionaryEntry {
    /// Create an entry from the lookup cache.
    pub fn cached(word: &str, response: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            word: word.to_string(),
            source_type: SOURCE_TYPE_CACHED_LOOKUP.to_string(),
            response,
            created_at: now,
            updated_at: now,
        }
    }
}
