//! Document configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Maximum number of changelists kept for undo. `None` keeps everything;
    /// once the limit is exceeded the oldest entry is dropped.
    pub history_limit: Option<usize>,
}

impl DocumentConfig {
    /// Configuration with a bounded undo history.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history_limit: Some(limit),
        }
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
