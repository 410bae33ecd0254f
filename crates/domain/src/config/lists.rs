use crate::list_scope::ListScope;
use serde::{Deserialize, Serialize};

/// One `[[blocklists]]` or `[[allowlists]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DomainListConfig {
    /// Client address, or `0.0.0.0` / `*` for every client.
    #[serde(default = "default_scope_ip")]
    pub ip: String,

    /// Hosts-format files.
    #[serde(default)]
    pub lists: Vec<String>,
}

impl DomainListConfig {
    pub fn scope(&self) -> Result<ListScope, String> {
        self.ip.parse()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ListsConfig {
    /// Seconds between list reloads; 0 loads once at startup.
    #[serde(default)]
    pub reload_interval_secs: u64,
}

fn default_scope_ip() -> String {
    "0.0.0.0".to_string()
}
