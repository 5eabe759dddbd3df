//! Pool sizing and timing knobs

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sizing and timing configuration for a [`Pool`](crate::Pool).
///
/// Immutable once the pool is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Sessions opened eagerly at startup; the trim floor
    init_size: usize,
    /// Hard ceiling on sessions belonging to the pool
    max_size: usize,
    /// Idle age beyond which surplus sessions are trimmed; also the
    /// scavenger's wake interval
    max_idle_time: Duration,
    /// Deadline for [`Pool::acquire`](crate::Pool::acquire)
    acquire_timeout: Duration,
}

impl PoolConfig {
    /// Create a configuration with the given initial and maximum sizes.
    ///
    /// # Panics
    ///
    /// Panics if `init_size` is 0 or exceeds `max_size`.
    pub fn new(init_size: usize, max_size: usize) -> Self {
        assert!(
            init_size > 0,
            "init_size must be greater than 0, got {init_size}"
        );
        assert!(
            init_size <= max_size,
            "init_size ({init_size}) cannot exceed max_size ({max_size})"
        );

        Self {
            init_size,
            max_size,
            max_idle_time: Duration::from_secs(60),
            acquire_timeout: Duration::from_millis(100),
        }
    }

    /// Set the idle trim threshold (and scavenger period).
    pub fn with_max_idle_time(mut self, max_idle_time: Duration) -> Self {
        self.max_idle_time = max_idle_time;
        self
    }

    /// Set the acquire deadline.
    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    /// Sessions opened at startup.
    pub fn init_size(&self) -> usize {
        self.init_size
    }

    /// Hard ceiling on pool-owned sessions.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Idle trim threshold.
    pub fn max_idle_time(&self) -> Duration {
        self.max_idle_time
    }

    /// Acquire deadline.
    pub fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }
}

impl Default for PoolConfig {
    /// Matches the configuration-file defaults.
    fn default() -> Self {
        Self::new(5, 10)
    }
}
