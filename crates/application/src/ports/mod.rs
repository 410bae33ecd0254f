mod dns_client;
mod dns_resolver;
mod domain_lists;
mod maintenance;
mod query_logger;

pub use dns_client::DnsClient;
pub use dns_resolver::{DnsResolver, Resolution};
pub use domain_lists::{AllowlistPort, BlockMatch, BlocklistPort};
pub use maintenance::{
    CacheMaintenancePort, ListReloadOutcome, ListReloadPort, MetricsPort, MetricsSnapshot,
};
pub use query_logger::QueryLogger;
