use sieve_dns_domain::{normalize_domain, ListScope};
use std::collections::HashMap;

/// Domain tables partitioned by scope. Keys are stored normalized.
#[derive(Debug)]
pub(crate) struct ScopedTable<V> {
    scopes: HashMap<ListScope, HashMap<String, V>>,
    len: usize,
}

impl<V> Default for ScopedTable<V> {
    fn default() -> Self {
        Self {
            scopes: HashMap::new(),
            len: 0,
        }
    }
}

impl<V> ScopedTable<V> {
    /// Returns whether `domain` was new in `scope`.
    pub(crate) fn insert(&mut self, scope: ListScope, domain: &str, value: V) -> bool {
        let inserted = self
            .scopes
            .entry(scope)
            .or_default()
            .insert(normalize_domain(domain), value)
            .is_none();
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub(crate) fn get(&self, scope: ListScope, key: &str) -> Option<&V> {
        self.scopes.get(&scope)?.get(key)
    }

    pub(crate) fn remove(&mut self, scope: ListScope, domain: &str) -> bool {
        let Some(table) = self.scopes.get_mut(&scope) else {
            return false;
        };
        let removed = table.remove(&normalize_domain(domain)).is_some();
        if table.is_empty() {
            self.scopes.remove(&scope);
        }
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub(crate) fn remove_scope(&mut self, scope: ListScope) -> usize {
        let removed = self.scopes.remove(&scope).map_or(0, |table| table.len());
        self.len -= removed;
        removed
    }

    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.len;
        self.scopes.clear();
        self.len = 0;
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
