use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            report_interval_secs: default_report_interval_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_report_interval_secs() -> u64 {
    60
}
