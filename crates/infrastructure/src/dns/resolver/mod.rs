//! Resolver pipeline stages.
//!
//! Production order, outermost first: query logging, list filter, cache,
//! upstream client. [`ResolverBuilder`] is the only place that links them.

pub mod builder;
pub mod cache_layer;
pub mod list_filter;
pub mod query_logging;
pub mod upstream;

pub use builder::ResolverBuilder;
pub use cache_layer::CachedResolver;
pub use list_filter::ListFilterResolver;
pub use query_logging::QueryLoggingResolver;
pub use upstream::UpstreamResolver;

use sieve_dns_domain::{Message, Question, ResponseCode};

/// A response for `question` that no upstream produced.
pub(crate) fn synthesized_response(question: &Question, rcode: ResponseCode) -> Message {
    Message::response_to(&Message::query(0, question.clone()), rcode)
}
