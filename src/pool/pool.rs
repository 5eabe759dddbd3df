//! The pool core: bounded idle queue, producer and scavenger threads

use std::collections::VecDeque;
use std::sync::Arc;
#[cfg(feature = "mysql")]
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::config::PoolConfig;
use super::handle::PooledSession;
use super::stats::PoolStats;
use crate::driver::{Driver, Endpoint};
use crate::error::{PoolError, Result};
use crate::events::{EventSink, TracingSink};
use crate::session::Session;

/// Hint passed to the driver's liveness probe.
const PING_TIMEOUT_HINT: Duration = Duration::from_secs(5);

/// Producer backoff bounds after a failed open.
const RETRY_BASE: Duration = Duration::from_millis(100);
const RETRY_CAP: Duration = Duration::from_secs(5);

#[cfg(feature = "mysql")]
static INSTANCE: OnceLock<Arc<Pool>> = OnceLock::new();
#[cfg(feature = "mysql")]
static INSTANCE_INIT: Mutex<()> = Mutex::new(());

/// A bounded pool of MySQL sessions.
///
/// Construction opens `init_size` sessions synchronously; a failure
/// there aborts construction, the pool never starts degraded. Borrow
/// sessions with [`acquire`](Pool::acquire); they return themselves when
/// the [`PooledSession`] goes out of scope.
///
/// The pool owns two named threads. The producer opens a new session
/// whenever the idle queue has been observed empty and the total is
/// below `max_size`; it grows on pressure, never speculatively. The
/// scavenger wakes every `max_idle_time`, revives or drops broken idle
/// sessions, and trims sessions idle beyond the threshold until the
/// total is back at `init_size`.
pub struct Pool {
    inner: Arc<PoolInner>,
    producer: Mutex<Option<JoinHandle<()>>>,
    scavenger: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool").finish_non_exhaustive()
    }
}

pub(crate) struct PoolInner {
    endpoint: Endpoint,
    config: PoolConfig,
    driver: Arc<dyn Driver>,
    sink: Arc<dyn EventSink>,
    state: Mutex<PoolState>,
    cond: Condvar,
}

/// All mutable pool state, guarded by the one mutex.
struct PoolState {
    /// FIFO queue of healthy sessions available to lend
    idle: VecDeque<Session>,
    /// Sessions belonging to the pool: `idle.len()` plus lent-out handles
    total: usize,
    /// Monotonic false-to-true
    shutdown: bool,
}

impl Pool {
    /// The lazily-constructed process-wide pool.
    ///
    /// Reads `db_config.ini` from the working directory and connects
    /// with [`MySqlDriver`](crate::MySqlDriver). The first caller builds
    /// the pool; construction failures propagate to every caller. The
    /// instance lives for the rest of the process.
    #[cfg(feature = "mysql")]
    pub fn instance() -> Result<Arc<Pool>> {
        if let Some(pool) = INSTANCE.get() {
            return Ok(pool.clone());
        }
        // serialise construction so a lost race cannot open a second
        // set of sessions
        let _guard = INSTANCE_INIT.lock();
        if let Some(pool) = INSTANCE.get() {
            return Ok(pool.clone());
        }
        let pool = Arc::new(Pool::from_config_file(crate::config::DEFAULT_CONFIG_FILE)?);
        let _ = INSTANCE.set(pool.clone());
        Ok(pool)
    }

    /// Build a pool from a configuration file, using the MySQL driver.
    #[cfg(feature = "mysql")]
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Pool> {
        let settings = crate::config::Settings::load(path)?;
        Pool::connect(
            settings.endpoint,
            settings.pool,
            Arc::new(crate::mysql::MySqlDriver::new()),
        )
    }

    /// Open a pool against `endpoint` with the given driver.
    pub fn connect(endpoint: Endpoint, config: PoolConfig, driver: Arc<dyn Driver>) -> Result<Pool> {
        Self::with_sink(endpoint, config, driver, Arc::new(TracingSink))
    }

    /// Like [`Pool::connect`], with a caller-supplied event sink.
    pub fn with_sink(
        endpoint: Endpoint,
        config: PoolConfig,
        driver: Arc<dyn Driver>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Pool> {
        let mut idle = VecDeque::with_capacity(config.init_size());
        for _ in 0..config.init_size() {
            let session = match Session::connect(driver.clone(), endpoint.clone()) {
                Ok(session) => session,
                Err(err) => {
                    sink.error(&format!("initial open failed: {err}"));
                    return Err(PoolError::InitialOpen(err.to_string()));
                }
            };
            idle.push_back(session);
        }
        let total = idle.len();
        sink.info(&format!(
            "pool ready with {total} sessions to {}",
            endpoint.address()
        ));

        let inner = Arc::new(PoolInner {
            endpoint,
            config,
            driver,
            sink,
            state: Mutex::new(PoolState {
                idle,
                total,
                shutdown: false,
            }),
            cond: Condvar::new(),
        });

        let producer = {
            let inner = inner.clone();
            thread::Builder::new()
                .name("tidepool-producer".into())
                .spawn(move || producer_loop(inner))?
        };
        let scavenger = {
            let scavenger_inner = inner.clone();
            match thread::Builder::new()
                .name("tidepool-scavenger".into())
                .spawn(move || scavenger_loop(scavenger_inner))
            {
                Ok(handle) => handle,
                Err(err) => {
                    // tear the producer down again before bailing out
                    inner.state.lock().shutdown = true;
                    inner.cond.notify_all();
                    let _ = producer.join();
                    return Err(err.into());
                }
            }
        };

        Ok(Pool {
            inner,
            producer: Mutex::new(Some(producer)),
            scavenger: Mutex::new(Some(scavenger)),
        })
    }

    /// Borrow a session, waiting up to the configured acquire timeout.
    ///
    /// Sessions are lent FIFO and probed for liveness on the way out; a
    /// session that cannot be revived is dropped and the wait continues
    /// against the original deadline.
    pub fn acquire(&self) -> Result<PooledSession> {
        PoolInner::acquire(&self.inner)
    }

    /// Point-in-time counters.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.state.lock();
        PoolStats::new(state.total, state.idle.len())
    }

    /// The pool's sizing and timing configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// The endpoint this pool connects to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    /// Shut the pool down: wake and join the background threads, then
    /// drop every idle session. Outstanding borrows keep working; their
    /// sessions are dropped when returned. Idempotent; also runs on drop.
    pub fn close(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.shutdown {
                return;
            }
            state.shutdown = true;
        }
        self.inner.cond.notify_all();
        if let Some(handle) = self.producer.lock().take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.scavenger.lock().take() {
            let _ = handle.join();
        }
        let drained = {
            let mut state = self.inner.state.lock();
            let drained = state.idle.len();
            state.total -= drained;
            state.idle.clear();
            drained
        };
        self.inner
            .sink
            .info(&format!("pool shut down, dropped {drained} idle sessions"));
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.close();
    }
}

impl PoolInner {
    fn acquire(inner: &Arc<PoolInner>) -> Result<PooledSession> {
        let deadline = Instant::now() + inner.config.acquire_timeout();
        let mut state = inner.state.lock();
        loop {
            if state.shutdown {
                return Err(PoolError::PoolClosed);
            }
            while state.idle.is_empty() {
                if state.shutdown {
                    return Err(PoolError::PoolClosed);
                }
                if inner.cond.wait_until(&mut state, deadline).timed_out()
                    && state.idle.is_empty()
                {
                    drop(state);
                    inner.sink.warn("no idle session within the acquire timeout");
                    return Err(PoolError::AcquireTimeout(inner.config.acquire_timeout()));
                }
            }
            let mut session = state.idle.pop_front().expect("idle queue is non-empty");
            drop(state);

            // probe with the lock released; the driver may block on I/O
            if session.healthy(PING_TIMEOUT_HINT) {
                inner.cond.notify_all();
                return Ok(PooledSession::new(session, Arc::downgrade(inner)));
            }

            inner
                .sink
                .warn("borrowed session failed its liveness probe, reopening");
            match session.reopen() {
                Ok(()) => {
                    session.touch();
                    inner.cond.notify_all();
                    return Ok(PooledSession::new(session, Arc::downgrade(inner)));
                }
                Err(err) => {
                    inner
                        .sink
                        .error(&format!("reopen failed, dropping session: {err}"));
                    drop(session);
                    // keep waiting within the original deadline
                    state = inner.state.lock();
                    state.total -= 1;
                    inner.cond.notify_all();
                }
            }
        }
    }

    /// Return protocol, invoked from a handle drop.
    pub(crate) fn restore(&self, mut session: Session) {
        let mut state = self.state.lock();
        if state.shutdown {
            state.total -= 1;
            self.cond.notify_all();
            drop(state);
            self.sink.info("session returned after shutdown, closing it");
            return;
        }
        if session.is_open() && session.healthy(PING_TIMEOUT_HINT) {
            session.touch();
            state.idle.push_back(session);
            self.cond.notify_all();
            return;
        }
        state.total -= 1;
        self.cond.notify_all();
        drop(state);
        self.sink.warn("dropping broken session on return");
    }

    /// Destroy a borrowed session without returning it.
    pub(crate) fn discard(&self, session: Session) {
        drop(session);
        let mut state = self.state.lock();
        state.total -= 1;
        self.cond.notify_all();
        drop(state);
        self.sink.info("session released by caller, dropping it");
    }
}

/// Opens replacement sessions whenever demand empties the idle queue.
fn producer_loop(inner: Arc<PoolInner>) {
    let mut retry_delay = RETRY_BASE;
    loop {
        {
            let mut state = inner.state.lock();
            // demand means: nothing idle and room to grow
            while !state.shutdown
                && (!state.idle.is_empty() || state.total >= inner.config.max_size())
            {
                inner.cond.wait(&mut state);
            }
            if state.shutdown {
                return;
            }
        }

        match Session::connect(inner.driver.clone(), inner.endpoint.clone()) {
            Ok(session) => {
                retry_delay = RETRY_BASE;
                let mut state = inner.state.lock();
                if state.shutdown {
                    return;
                }
                state.idle.push_back(session);
                state.total += 1;
                tracing::debug!(total = state.total, "producer opened a session");
                inner.cond.notify_all();
            }
            Err(err) => {
                inner
                    .sink
                    .warn(&format!("failed to open a new session: {err}"));
                // back off before retrying, but stay responsive to shutdown
                let wakeup = Instant::now() + retry_delay;
                let mut state = inner.state.lock();
                while !state.shutdown && !inner.cond.wait_until(&mut state, wakeup).timed_out() {}
                if state.shutdown {
                    return;
                }
                retry_delay = (retry_delay * 2).min(RETRY_CAP);
            }
        }
    }
}

/// Validates idle sessions and trims surplus ones every `max_idle_time`.
fn scavenger_loop(inner: Arc<PoolInner>) {
    let period = inner.config.max_idle_time();
    loop {
        let mut state = inner.state.lock();
        let wakeup = Instant::now() + period;
        while !state.shutdown {
            if inner.cond.wait_until(&mut state, wakeup).timed_out() {
                break;
            }
        }
        if state.shutdown {
            return;
        }

        // Sweep in place. Only pool-owned idle sessions are touched, so
        // sessions currently lent out are never probed here.
        let mut kept = VecDeque::with_capacity(state.idle.len());
        while let Some(mut session) = state.idle.pop_front() {
            if !session.healthy(PING_TIMEOUT_HINT) {
                inner
                    .sink
                    .warn("idle session failed its liveness probe, reopening");
                if let Err(err) = session.reopen() {
                    state.total -= 1;
                    inner
                        .sink
                        .error(&format!("reopen failed, dropping idle session: {err}"));
                    continue;
                }
            } else if session.idle_for() >= period && state.total > inner.config.init_size() {
                state.total -= 1;
                inner.sink.info("trimming session idle beyond the threshold");
                continue;
            }
            kept.push_back(session);
        }
        state.idle = kept;

        if state.total < inner.config.init_size() {
            inner.cond.notify_all();
        }
    }
}
