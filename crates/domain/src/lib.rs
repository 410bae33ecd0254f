//! Sieve DNS Domain Layer
pub mod config;
pub mod errors;
pub mod forwarder;
pub mod list_scope;
pub mod query_log;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError, ForwarderMode};
pub use errors::DomainError;
pub use forwarder::Forwarder;
pub use list_scope::{normalize_domain, ListScope};
pub use query_log::{QueryLog, QueryStatus};
pub use wire::{
    DomainName, Message, Question, RData, RecordClass, RecordType, ResourceRecord, ResponseCode,
};
