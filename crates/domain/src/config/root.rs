use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::lists::{DomainListConfig, ListsConfig};
use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;
use super::server::ServerConfig;
use super::upstream::{ForwarderMode, UpstreamConfig};

const LOCAL_CONFIG_PATH: &str = "sieve-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/sieve-dns/config.toml";

/// Main configuration structure for Sieve DNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub blocklists: Vec<DomainListConfig>,

    #[serde(default)]
    pub allowlists: Vec<DomainListConfig>,

    #[serde(default)]
    pub lists: ListsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. sieve-dns.toml in current directory
    /// 3. /etc/sieve-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(mode) = overrides.mode {
            if mode != self.upstream.mode && overrides.forwarders.is_empty() {
                // forwarders written for another transport would not parse
                self.upstream.forwarders.clear();
            }
            self.upstream.mode = mode;
        }
        if !overrides.forwarders.is_empty() {
            self.upstream.forwarders = overrides.forwarders;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.server.socket_addr()?;

        if self.upstream.retry_budget == 0 {
            return Err(ConfigError::Validation(
                "upstream.retry_budget must be at least 1".to_string(),
            ));
        }

        if self.upstream.effective_forwarders().is_empty() {
            return Err(ConfigError::Validation(
                "No upstream forwarders configured".to_string(),
            ));
        }

        for list in self.blocklists.iter().chain(&self.allowlists) {
            list.scope().map_err(ConfigError::Validation)?;
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub mode: Option<ForwarderMode>,
    pub forwarders: Vec<String>,
    pub log_level: Option<String>,
}
