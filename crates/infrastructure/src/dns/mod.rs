pub mod block_filter;
pub mod cache;
pub mod load_balancer;
pub mod metrics;
pub mod query_logger;
pub mod resolver;
pub mod server;
pub mod transport;

pub use block_filter::{AllowlistService, BlocklistService, ListLoader};
pub use cache::DnsCache;
pub use load_balancer::{provider_for, EndpointProvider, RoundRobinProvider, SingleProvider};
pub use metrics::DnsMetrics;
pub use query_logger::TracingQueryLogger;
pub use resolver::ResolverBuilder;
pub use server::UdpDnsServer;
pub use transport::{create_client, TransportOptions};
