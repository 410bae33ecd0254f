use sieve_dns_domain::ListScope;
use std::net::IpAddr;

/// A blocklist hit and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMatch {
    pub scope: ListScope,
    pub override_ip: Option<IpAddr>,
}

/// Per-client domain blocklist with a global tier.
pub trait BlocklistPort: Send + Sync {
    fn lookup(&self, client: IpAddr, domain: &str) -> Option<BlockMatch>;

    fn is_blocked(&self, client: IpAddr, domain: &str) -> bool {
        self.lookup(client, domain).is_some()
    }

    fn add(&self, scope: ListScope, domain: &str, override_ip: Option<IpAddr>);

    fn add_all(&self, scope: ListScope, entries: Vec<(String, Option<IpAddr>)>);

    fn remove(&self, scope: ListScope, domain: &str) -> bool;

    fn remove_all(&self, scope: ListScope) -> usize;

    fn clear(&self);

    fn size(&self) -> usize;
}

/// Per-client domain allowlist with a global tier.
pub trait AllowlistPort: Send + Sync {
    fn is_allowed(&self, client: IpAddr, domain: &str) -> bool;

    fn add(&self, scope: ListScope, domain: &str);

    fn add_all(&self, scope: ListScope, domains: Vec<String>);

    fn remove(&self, scope: ListScope, domain: &str) -> bool;

    fn remove_all(&self, scope: ListScope) -> usize;

    fn clear(&self);

    fn size(&self) -> usize;
}
