use super::EndpointProvider;
use sieve_dns_domain::DomainError;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct SingleProvider<T> {
    endpoint: T,
}

impl<T> SingleProvider<T> {
    pub fn new(endpoint: T) -> Self {
        Self { endpoint }
    }
}

impl<T: Clone + Send + Sync> EndpointProvider<T> for SingleProvider<T> {
    fn next_endpoint(&self) -> T {
        self.endpoint.clone()
    }

    fn len(&self) -> usize {
        1
    }
}

/// Hands out endpoints in order, wrapping around, safe to share across tasks.
pub struct RoundRobinProvider<T> {
    endpoints: Vec<T>,
    counter: AtomicUsize,
}

impl<T> RoundRobinProvider<T> {
    pub fn new(endpoints: Vec<T>) -> Result<Self, DomainError> {
        if endpoints.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "Round-robin provider needs at least one endpoint".into(),
            ));
        }
        Ok(Self {
            endpoints,
            counter: AtomicUsize::new(0),
        })
    }

    fn next_index(&self) -> usize {
        self.counter.fetch_add(1, Ordering::Relaxed) % self.endpoints.len()
    }
}

impl<T: Clone + Send + Sync> EndpointProvider<T> for RoundRobinProvider<T> {
    fn next_endpoint(&self) -> T {
        self.endpoints[self.next_index()].clone()
    }

    fn len(&self) -> usize {
        self.endpoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_provider_always_returns_its_endpoint() {
        let provider = SingleProvider::new("one");
        assert_eq!(provider.next_endpoint(), "one");
        assert_eq!(provider.next_endpoint(), "one");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn round_robin_cycles_in_order() {
        let provider = RoundRobinProvider::new(vec!["one", "two"]).unwrap();
        let picks: Vec<_> = (0..5).map(|_| provider.next_endpoint()).collect();
        assert_eq!(picks, vec!["one", "two", "one", "two", "one"]);
    }

    #[test]
    fn round_robin_rejects_empty_list() {
        assert!(RoundRobinProvider::<&str>::new(vec![]).is_err());
    }
}
