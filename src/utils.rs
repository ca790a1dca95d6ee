use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub(crate) struct CachedValue<T> {
    value: T,
    timestamp: Instant,
    ttl: Duration,
}

impl<T> CachedValue<T> {
    #[inline]
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            timestamp: Instant::now(),
            ttl,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.timestamp.elapsed() < self.ttl
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }
}
