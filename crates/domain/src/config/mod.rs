pub mod cache;
pub mod errors;
pub mod lists;
pub mod logging;
pub mod metrics;
pub mod root;
pub mod server;
pub mod upstream;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use lists::{DomainListConfig, ListsConfig};
pub use logging::LoggingConfig;
pub use metrics::MetricsConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::{ForwarderMode, UpstreamConfig};
