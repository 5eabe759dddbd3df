//! Point-in-time pool counters

use serde::{Deserialize, Serialize};

/// Snapshot of the pool's session accounting.
///
/// `total == idle + in_use` at the instant the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Sessions belonging to the pool, idle or lent out
    total: usize,
    /// Sessions waiting in the idle queue
    idle: usize,
    /// Sessions currently lent to a handle
    in_use: usize,
}

impl PoolStats {
    pub(crate) fn new(total: usize, idle: usize) -> Self {
        Self {
            total,
            idle,
            in_use: total - idle,
        }
    }

    /// Sessions belonging to the pool.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Sessions available to lend.
    pub fn idle(&self) -> usize {
        self.idle
    }

    /// Sessions currently borrowed.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Fraction of pool-owned sessions currently borrowed (0.0 to 1.0).
    pub fn utilization(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.in_use as f64 / self.total as f64
        }
    }

    /// Whether every owned session is lent out.
    pub fn is_saturated(&self) -> bool {
        self.idle == 0 && self.total > 0
    }
}
