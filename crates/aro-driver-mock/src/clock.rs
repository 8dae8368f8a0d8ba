//! Time sources for the synthetic producer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Time elapsed since the synthetic producer started.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Time since the fixed start point.
    fn elapsed(&self) -> Duration;
}

/// Wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Clock whose start point is now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Clock with an explicit start point.
    pub fn starting_at(start: Instant) -> Self {
        Self { start }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock stopped at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(saturating_nanos(by), Ordering::AcqRel);
    }

    /// Jump to an absolute elapsed time.
    pub fn set(&self, elapsed: Duration) {
        self.nanos.store(saturating_nanos(elapsed), Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
