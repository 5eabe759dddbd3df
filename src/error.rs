//! Error types for tidepool

use std::time::Duration;

use thiserror::Error;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Configuration error: {0}")]
    ConfigLoad(String),

    #[error("Initial connection setup failed: {0}")]
    InitialOpen(String),

    #[error("Timed out after {0:?} waiting for an idle session")]
    AcquireTimeout(Duration),

    #[error("Pool has been shut down")]
    PoolClosed,

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;
