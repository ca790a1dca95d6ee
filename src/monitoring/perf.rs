use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct PerformanceTimer {
    start: Instant,
}

impl PerformanceTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn log_if_slow(&self, threshold: Duration, what: &str) {
        let elapsed = self.start.elapsed();
        if elapsed > threshold {
            log::debug!("{what} took {elapsed:?}");
        }
    }
}

impl Default for PerformanceTimer {
    fn default() -> Self {
        Self::new()
    }
}
