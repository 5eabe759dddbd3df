//! Tidepool, a bounded client-side MySQL connection pool
//!
//! This crate amortises the cost of establishing database sessions by
//! keeping a bounded set of pre-connected, validated sessions available
//! for short-term borrowing. Borrowed sessions hand themselves back when
//! they go out of scope; a background producer grows the pool on demand
//! up to a ceiling, and a scavenger trims long-idle sessions back toward
//! the initial size.
//!
//! # Example
//!
//! ```no_run
//! use tidepool::Pool;
//!
//! let pool = Pool::instance()?;
//! let mut session = pool.acquire()?;
//! session.execute("INSERT INTO visits (page) VALUES ('home')")?;
//! // the session returns to the pool at the end of scope
//! # Ok::<(), tidepool::PoolError>(())
//! ```
//!
//! The process-wide [`Pool::instance`] reads `db_config.ini` from the
//! working directory. Embedders that want their own lifecycle (or a
//! different driver) construct pools directly with [`Pool::connect`].

pub mod config;
mod driver;
mod error;
mod events;
#[cfg(feature = "mysql")]
mod mysql;
pub mod pool;
mod session;
mod types;

pub use config::{ConfigSource, Settings};
pub use driver::{Driver, DriverSession, Endpoint};
pub use error::{PoolError, Result};
pub use events::{EventSink, TracingSink};
#[cfg(feature = "mysql")]
pub use mysql::MySqlDriver;
pub use pool::{Pool, PoolConfig, PoolStats, PooledSession};
pub use session::Session;
pub use types::{QueryResult, Value};
