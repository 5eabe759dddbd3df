//! A single pooled database session

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::driver::{Driver, DriverSession, Endpoint};
use crate::error::{PoolError, Result};
use crate::types::QueryResult;

/// One logical connection to the configured server.
///
/// Tracks when it was last used so the pool can trim sessions that have
/// sat idle too long. The endpoint is captured at construction, so a
/// broken session can be reopened without further arguments.
///
/// A session is exclusively owned: either by the pool's idle queue or by
/// the one [`PooledSession`](crate::PooledSession) it was lent through.
pub struct Session {
    driver: Arc<dyn Driver>,
    conn: Option<Box<dyn DriverSession>>,
    endpoint: Endpoint,
    last_active: Instant,
}

impl Session {
    /// Open a new session against `endpoint`.
    pub fn connect(driver: Arc<dyn Driver>, endpoint: Endpoint) -> Result<Self> {
        let conn = driver.connect(&endpoint)?;
        Ok(Self {
            driver,
            conn: Some(conn),
            endpoint,
            last_active: Instant::now(),
        })
    }

    /// Re-establish the connection, closing any existing one first.
    pub fn open(&mut self) -> Result<()> {
        self.close();
        self.conn = Some(self.driver.connect(&self.endpoint)?);
        self.last_active = Instant::now();
        Ok(())
    }

    /// Close and reopen with the endpoint captured at construction.
    ///
    /// Refreshes the last-active timestamp on success.
    pub fn reopen(&mut self) -> Result<()> {
        tracing::debug!(endpoint = %self.endpoint.address(), "reopening session");
        self.open()
    }

    /// Drop the underlying connection. Close errors are not observable;
    /// the driver handle is simply released.
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Whether the session currently holds a driver connection.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Server round-trip liveness probe. A closed session is never healthy.
    ///
    /// The probe does not advance the last-active timestamp; only actual
    /// use (or an explicit [`touch`](Session::touch)) does, so idle-age
    /// accounting is unaffected by background validation.
    pub fn healthy(&mut self, timeout_hint: Duration) -> bool {
        match self.conn.as_mut() {
            Some(conn) => conn.ping(timeout_hint),
            None => false,
        }
    }

    /// Time since the session was last used.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    /// Mark the session as just used.
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// The endpoint this session connects to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Run a statement, returning the number of affected rows.
    pub fn execute(&mut self, sql: &str) -> Result<u64> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let affected = conn.execute(sql)?;
        self.last_active = Instant::now();
        Ok(affected)
    }

    /// Run a query, returning its rows.
    pub fn query(&mut self, sql: &str) -> Result<QueryResult> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let result = conn.query(sql)?;
        self.last_active = Instant::now();
        Ok(result)
    }
}

fn closed() -> PoolError {
    PoolError::Driver("session is closed".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    struct StubDriver;

    impl Driver for StubDriver {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn connect(&self, _endpoint: &Endpoint) -> Result<Box<dyn DriverSession>> {
            Ok(Box::new(StubConn))
        }
    }

    struct StubConn;

    impl DriverSession for StubConn {
        fn ping(&mut self, _timeout_hint: Duration) -> bool {
            true
        }

        fn execute(&mut self, _sql: &str) -> Result<u64> {
            Ok(1)
        }

        fn query(&mut self, _sql: &str) -> Result<QueryResult> {
            Ok(QueryResult::empty())
        }
    }

    fn stub_session() -> Session {
        Session::connect(Arc::new(StubDriver), Endpoint::default()).expect("stub connect")
    }

    #[test]
    fn use_refreshes_idle_age() {
        let mut session = stub_session();
        thread::sleep(Duration::from_millis(30));
        assert!(session.idle_for() >= Duration::from_millis(30));
        session.execute("UPDATE t SET x = 1").expect("stub execute");
        assert!(session.idle_for() < Duration::from_millis(30));
    }

    #[test]
    fn probe_does_not_refresh_idle_age() {
        let mut session = stub_session();
        thread::sleep(Duration::from_millis(30));
        assert!(session.healthy(Duration::from_secs(1)));
        assert!(session.idle_for() >= Duration::from_millis(30));
    }

    #[test]
    fn closed_session_rejects_work() {
        let mut session = stub_session();
        session.close();
        assert!(!session.is_open());
        assert!(!session.healthy(Duration::from_secs(1)));
        assert!(session.execute("SELECT 1").is_err());
        assert!(session.query("SELECT 1").is_err());
    }

    #[test]
    fn reopen_restores_a_closed_session() {
        let mut session = stub_session();
        session.close();
        session.reopen().expect("stub reopen");
        assert!(session.is_open());
        assert!(session.healthy(Duration::from_secs(1)));
    }
}
