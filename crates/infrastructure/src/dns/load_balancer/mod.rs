//! Forwarder selection for the upstream clients.
//!
//! Every client asks its provider for the next endpoint before each attempt,
//! so a retry after a failure lands on the next forwarder in rotation.

mod round_robin;

pub use round_robin::{RoundRobinProvider, SingleProvider};

use sieve_dns_domain::DomainError;
use std::sync::Arc;

pub trait EndpointProvider<T>: Send + Sync {
    fn next_endpoint(&self) -> T;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One endpoint gets a [`SingleProvider`], several get a [`RoundRobinProvider`].
pub fn provider_for<T>(mut endpoints: Vec<T>) -> Result<Arc<dyn EndpointProvider<T>>, DomainError>
where
    T: Clone + Send + Sync + 'static,
{
    if endpoints.len() == 1 {
        if let Some(endpoint) = endpoints.pop() {
            return Ok(Arc::new(SingleProvider::new(endpoint)));
        }
    }
    Ok(Arc::new(RoundRobinProvider::new(endpoints)?))
}
