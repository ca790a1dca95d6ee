use crate::compile::HeaderSet;
use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_HEADER_CACHE_ENTRIES};
use crate::core::policy::PolicyVersion;
use crate::utils::CachedValue;
use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct HeaderCache {
    entries: RwLock<LruCache<PolicyVersion, CachedValue<Arc<HeaderSet>>>>,
    ttl: Duration,
}

impl HeaderCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_HEADER_CACHE_ENTRIES).unwrap());
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            ttl,
        }
    }

    // A zero TTL turns the cache into a passthrough.
    pub fn get(&self, version: &PolicyVersion) -> Option<Arc<HeaderSet>> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut entries = self.entries.write();
        if let Some(cached) = entries.get(version) {
            if cached.is_valid() {
                return Some(Arc::clone(cached.value()));
            }
            entries.pop(version);
        }
        None
    }

    pub fn store(&self, version: PolicyVersion, headers: Arc<HeaderSet>) {
        if self.ttl.is_zero() || headers.is_empty() {
            return;
        }
        self.entries
            .write()
            .put(version, CachedValue::new(headers, self.ttl));
    }

    pub fn get_or_compute<F>(&self, version: &PolicyVersion, compute: F) -> (Arc<HeaderSet>, bool)
    where
        F: FnOnce() -> HeaderSet,
    {
        if let Some(found) = self.get(version) {
            return (found, true);
        }
        let headers = Arc::new(compute());
        self.store(version.clone(), Arc::clone(&headers));
        (headers, false)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for HeaderCache {
    fn default() -> Self {
        Self::new(
            DEFAULT_HEADER_CACHE_ENTRIES,
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        )
    }
}
