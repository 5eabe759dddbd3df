//! Connection pooling
//!
//! The pool opens `init_size` sessions eagerly, lends them out FIFO, and
//! leans on two background threads: a producer that opens new sessions on
//! demand up to `max_size`, and a scavenger that validates idle sessions
//! and trims the pool back toward `init_size`.
//!
//! # Example
//!
//! ```ignore
//! use tidepool::{Endpoint, MySqlDriver, Pool, PoolConfig};
//! use std::sync::Arc;
//!
//! let config = PoolConfig::new(5, 10)
//!     .with_acquire_timeout(std::time::Duration::from_millis(100));
//!
//! let pool = Pool::connect(Endpoint::default(), config, Arc::new(MySqlDriver::new()))?;
//! let mut session = pool.acquire()?;
//! session.execute("DELETE FROM carts WHERE abandoned = 1")?;
//! // session returns to the pool here
//! ```

mod config;
mod handle;
mod pool;
mod stats;


pub use config::PoolConfig;
pub use handle::PooledSession;
pub use pool::Pool;
pub use stats::PoolStats;
