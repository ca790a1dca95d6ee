use crate::cache::HeaderCache;
use crate::compile::{self, HeaderSet};
use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_HEADER_CACHE_ENTRIES};
use crate::core::policy::{Policy, PolicySnapshot};
use crate::hooks::TransformRegistry;
use crate::monitoring::stats::CspStats;
use crate::security::nonce::NonceGenerator;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct CspEngine {
    active: Arc<ArcSwap<PolicySnapshot>>,
    cache: Arc<HeaderCache>,
    hooks: Arc<TransformRegistry>,
    nonce_generator: Arc<NonceGenerator>,
    stats: Arc<CspStats>,
}

impl CspEngine {
    pub fn new(policy: Policy) -> Self {
        CspEngineBuilder::default().policy(policy).build()
    }

    #[inline]
    pub fn builder() -> CspEngineBuilder {
        CspEngineBuilder::default()
    }

    // Swapping the snapshot invalidates every cached compilation at once.
    pub fn install(&self, policy: Policy) {
        self.active.store(Arc::new(PolicySnapshot::new(policy)));
        self.cache.clear();
        self.stats.increment_policy_update_count();
    }

    pub fn update_policy<F>(&self, update: F)
    where
        F: FnOnce(&mut Policy),
    {
        let mut policy = self.active.load().policy().clone();
        update(&mut policy);
        self.install(policy);
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        self.active.load_full()
    }

    pub fn compiled(&self, snapshot: &PolicySnapshot) -> Arc<HeaderSet> {
        let (headers, hit) = self.cache.get_or_compute(snapshot.version(), || {
            compile::compile(snapshot.policy(), &self.hooks)
        });
        if hit {
            self.stats.increment_cache_hit_count();
        } else {
            self.stats.increment_cache_miss_count();
        }
        headers
    }

    pub fn generate_nonce(&self) -> String {
        self.stats.increment_nonce_generation_count();
        self.nonce_generator.generate()
    }

    #[inline]
    pub fn hooks(&self) -> &TransformRegistry {
        &self.hooks
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }

    #[inline]
    pub fn cache(&self) -> &HeaderCache {
        &self.cache
    }

    #[inline]
    pub fn nonce_generator(&self) -> &NonceGenerator {
        &self.nonce_generator
    }
}

impl Default for CspEngine {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

pub struct CspEngineBuilder {
    policy: Policy,
    cache_capacity: usize,
    cache_ttl: Duration,
    nonce_generator: Option<NonceGenerator>,
}

impl Default for CspEngineBuilder {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            cache_capacity: DEFAULT_HEADER_CACHE_ENTRIES,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            nonce_generator: None,
        }
    }
}

impl CspEngineBuilder {
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn nonce_generator(mut self, generator: NonceGenerator) -> Self {
        self.nonce_generator = Some(generator);
        self
    }

    pub fn build(self) -> CspEngine {
        CspEngine {
            active: Arc::new(ArcSwap::from_pointee(PolicySnapshot::new(self.policy))),
            cache: Arc::new(HeaderCache::new(self.cache_capacity, self.cache_ttl)),
            hooks: Arc::new(TransformRegistry::default()),
            nonce_generator: Arc::new(self.nonce_generator.unwrap_or_default()),
            stats: Arc::new(CspStats::new()),
        }
    }
}
