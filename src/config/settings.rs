//! Recognised configuration keys and their defaults

use std::path::Path;
use std::time::Duration;

use super::source::ConfigSource;
use crate::driver::Endpoint;
use crate::error::{PoolError, Result};
use crate::pool::PoolConfig;

/// Everything the pool needs from a configuration file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where to connect
    pub endpoint: Endpoint,
    /// Sizing and timing knobs
    pub pool: PoolConfig,
}

impl Settings {
    /// Load settings from the file at `path`, dispatching on its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = super::load(path).map_err(|err| {
            tracing::error!(path = %path.display(), %err, "failed to load configuration");
            err
        })?;
        let settings = Self::from_source(source.as_ref())?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(settings)
    }

    /// Read the recognised keys out of an already-loaded source.
    ///
    /// Unknown keys are ignored; missing keys take their defaults.
    /// Nonsensical sizing (zero sizes, `initSize > maxSize`, out-of-range
    /// port, non-positive timeouts) is rejected here so bad file data
    /// cannot panic the pool later.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let port = source.get_int("port", 3306);
        let port = u16::try_from(port)
            .map_err(|_| PoolError::ConfigLoad(format!("port {port} is out of range")))?;

        let endpoint = Endpoint::new(
            source.get_string("ip", "localhost"),
            port,
            source.get_string("username", "root"),
            source.get_string("password", ""),
            source.get_string("dbname", "test"),
        );

        let init_size = source.get_int("initSize", 5);
        let max_size = source.get_int("maxSize", 10);
        if init_size < 1 || max_size < init_size {
            return Err(PoolError::ConfigLoad(format!(
                "invalid pool sizing: initSize={init_size}, maxSize={max_size}"
            )));
        }

        let max_idle_time = source.get_int("maxIdleTime", 60);
        let acquire_timeout = source.get_int("connectionTimeOut", 100);
        if max_idle_time < 1 || acquire_timeout < 1 {
            return Err(PoolError::ConfigLoad(format!(
                "timeouts must be positive: maxIdleTime={max_idle_time}, \
                 connectionTimeOut={acquire_timeout}"
            )));
        }

        Ok(Self {
            endpoint,
            pool: PoolConfig::new(init_size as usize, max_size as usize)
                .with_max_idle_time(Duration::from_secs(max_idle_time as u64))
                .with_acquire_timeout(Duration::from_millis(acquire_timeout as u64)),
        })
    }
}
