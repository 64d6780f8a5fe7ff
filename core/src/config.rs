use serde::Deserialize;

pub const DEFAULT_SHARD_COUNT: usize = 64;

/// Construction-time settings for a [`crate::SearchServer`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Words dropped from documents and queries.
    pub stop_words: Vec<String>,
    /// Number of independently locked shards used by parallel ranking.
    pub shard_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { stop_words: Vec::new(), shard_count: DEFAULT_SHARD_COUNT }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
