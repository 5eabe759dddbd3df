//! The seam between the pool and a concrete MySQL client library
//!
//! The pool never talks to a server directly; it goes through a
//! [`Driver`] that opens connections and a [`DriverSession`] per live
//! connection. Swapping the driver out is how the tests inject failures.

use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::types::QueryResult;

/// Connection target captured at pool startup.
///
/// Stored inside every [`Session`](crate::Session) so a broken session
/// can be reopened without further arguments.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Server hostname or IP
    pub host: String,
    /// Server TCP port
    pub port: u16,
    /// Authentication user
    pub username: String,
    /// Authentication password
    pub password: String,
    /// Initial database
    pub database: String,
}

impl Endpoint {
    /// Create an endpoint from its parts.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// `host:port`, for log messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Endpoint {
    /// Matches the configuration-file defaults.
    fn default() -> Self {
        Self::new("localhost", 3306, "root", "", "test")
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// A database driver capable of opening sessions against an endpoint.
pub trait Driver: Send + Sync + 'static {
    /// Short driver name, e.g. `"mysql"`.
    fn name(&self) -> &'static str;

    /// Open a new connection to `endpoint`.
    fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn DriverSession>>;
}

/// One live connection as seen by the pool.
///
/// Dropping the value closes the connection.
pub trait DriverSession: Send {
    /// Server round-trip liveness probe.
    ///
    /// `timeout_hint` is advisory; drivers whose ping has no deadline
    /// parameter may ignore it.
    fn ping(&mut self, timeout_hint: Duration) -> bool;

    /// Run a statement, returning the number of affected rows.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Run a query, returning its rows.
    fn query(&mut self, sql: &str) -> Result<QueryResult>;
}

#[cfg(test)]
mod tests {
    use super::Endpoint;

    #[test]
    fn debug_output_redacts_password() {
        let endpoint = Endpoint::new("db.internal", 3306, "app", "hunter2", "orders");
        let rendered = format!("{endpoint:?}");
        assert!(rendered.contains("db.internal"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn default_endpoint_matches_config_defaults() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.address(), "localhost:3306");
        assert_eq!(endpoint.username, "root");
        assert_eq!(endpoint.database, "test");
    }
}
