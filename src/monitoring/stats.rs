use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct CspStats {
    request_count: AtomicUsize,
    nonce_generation_count: AtomicUsize,
    policy_update_count: AtomicUsize,
    cache_hit_count: AtomicUsize,
    cache_miss_count: AtomicUsize,
    header_emit_count: AtomicUsize,
    body_rewrite_count: AtomicUsize,
    header_generation_time_ns: AtomicUsize,
    start_time: Instant,
}

impl Default for CspStats {
    fn default() -> Self {
        Self {
            request_count: Default::default(),
            nonce_generation_count: Default::default(),
            policy_update_count: Default::default(),
            cache_hit_count: Default::default(),
            cache_miss_count: Default::default(),
            header_emit_count: Default::default(),
            body_rewrite_count: Default::default(),
            header_generation_time_ns: Default::default(),
            start_time: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    pub request_count: usize,
    pub requests_per_second: f64,
    pub nonce_generation_count: usize,
    pub policy_update_count: usize,
    pub cache_hit_count: usize,
    pub cache_miss_count: usize,
    pub header_emit_count: usize,
    pub body_rewrite_count: usize,
    pub avg_header_generation_time_ns: f64,
}

impl CspStats {
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn nonce_generation_count(&self) -> usize {
        self.nonce_generation_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn policy_update_count(&self) -> usize {
        self.policy_update_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cache_hit_count(&self) -> usize {
        self.cache_hit_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cache_miss_count(&self) -> usize {
        self.cache_miss_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn header_emit_count(&self) -> usize {
        self.header_emit_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn body_rewrite_count(&self) -> usize {
        self.body_rewrite_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn avg_header_generation_time_ns(&self) -> f64 {
        let count = self.request_count.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            self.header_generation_time_ns.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    #[inline]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    #[inline]
    pub fn requests_per_second(&self) -> f64 {
        let uptime = self.start_time.elapsed().as_secs_f64();
        if uptime > 0.0 {
            self.request_count() as f64 / uptime
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.uptime_secs(),
            request_count: self.request_count(),
            requests_per_second: self.requests_per_second(),
            nonce_generation_count: self.nonce_generation_count(),
            policy_update_count: self.policy_update_count(),
            cache_hit_count: self.cache_hit_count(),
            cache_miss_count: self.cache_miss_count(),
            header_emit_count: self.header_emit_count(),
            body_rewrite_count: self.body_rewrite_count(),
            avg_header_generation_time_ns: self.avg_header_generation_time_ns(),
        }
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_nonce_generation_count(&self) {
        self.nonce_generation_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_policy_update_count(&self) {
        self.policy_update_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_cache_hit_count(&self) {
        self.cache_hit_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_cache_miss_count(&self) {
        self.cache_miss_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_header_emit_count(&self) {
        self.header_emit_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_body_rewrite_count(&self) {
        self.body_rewrite_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_header_generation_time(&self, time_ns: usize) {
        self.header_generation_time_ns
            .fetch_add(time_ns, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.nonce_generation_count.store(0, Ordering::Relaxed);
        self.policy_update_count.store(0, Ordering::Relaxed);
        self.cache_hit_count.store(0, Ordering::Relaxed);
        self.cache_miss_count.store(0, Ordering::Relaxed);
        self.header_emit_count.store(0, Ordering::Relaxed);
        self.body_rewrite_count.store(0, Ordering::Relaxed);
        self.header_generation_time_ns.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for CspStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSP Middleware Statistics:")?;
        writeln!(f, "  Uptime: {} seconds", self.uptime_secs())?;
        writeln!(f, "  Requests processed: {}", self.request_count())?;
        writeln!(
            f,
            "  Requests per second: {:.2}",
            self.requests_per_second()
        )?;
        writeln!(f, "  Nonces generated: {}", self.nonce_generation_count())?;
        writeln!(f, "  Policy updates: {}", self.policy_update_count())?;
        writeln!(f, "  Cache hits: {}", self.cache_hit_count())?;
        writeln!(f, "  Cache misses: {}", self.cache_miss_count())?;
        writeln!(f, "  Headers emitted: {}", self.header_emit_count())?;
        writeln!(f, "  Bodies rewritten: {}", self.body_rewrite_count())?;
        writeln!(
            f,
            "  Average header generation time: {:.2} ns",
            self.avg_header_generation_time_ns()
        )?;
        Ok(())
    }
}
