use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lifetime of responses that carry no answers.
    #[serde(default = "default_negative_ttl_secs")]
    pub negative_ttl_secs: u32,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            negative_ttl_secs: default_negative_ttl_secs(),
            max_entries: default_max_entries(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_negative_ttl_secs() -> u32 {
    300
}

fn default_max_entries() -> usize {
    10_000
}

fn default_purge_interval_secs() -> u64 {
    60
}
