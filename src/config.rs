//! Configuration loading
//!
//! A configuration file is chosen by the caller (default
//! [`DEFAULT_CONFIG_FILE`]) and its extension selects the backend: `.ini`
//! for INI files, `.yaml`/`.yml` for YAML. Backends present a uniform
//! typed key lookup through [`ConfigSource`]; the recognised keys and
//! their defaults live in [`Settings`].
//!
//! Backends are cargo features (`ini`, `yaml`, both default-on). Naming
//! a file whose backend is compiled out is a construction error, not a
//! silent fallback.

#[cfg(feature = "ini")]
mod ini;
mod settings;
mod source;
#[cfg(feature = "yaml")]
mod yaml;

#[cfg(test)]
mod tests;

#[cfg(feature = "ini")]
pub use self::ini::IniSource;
#[cfg(feature = "yaml")]
pub use self::yaml::YamlSource;
pub use settings::Settings;
pub use source::ConfigSource;

use std::path::Path;

use crate::error::{PoolError, Result};

/// Default configuration file looked up by [`Pool::instance`](crate::Pool::instance).
pub const DEFAULT_CONFIG_FILE: &str = "db_config.ini";

/// Load the configuration backend matching `path`'s extension.
pub fn load(path: impl AsRef<Path>) -> Result<Box<dyn ConfigSource>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| {
            PoolError::ConfigLoad(format!("{}: missing file extension", path.display()))
        })?;
    match extension.as_str() {
        "ini" => load_ini(path),
        "yaml" | "yml" => load_yaml(path),
        other => Err(PoolError::ConfigLoad(format!(
            "{}: unsupported configuration format `.{other}`",
            path.display()
        ))),
    }
}

#[cfg(feature = "ini")]
fn load_ini(path: &Path) -> Result<Box<dyn ConfigSource>> {
    Ok(Box::new(IniSource::load(path)?))
}

#[cfg(not(feature = "ini"))]
fn load_ini(path: &Path) -> Result<Box<dyn ConfigSource>> {
    Err(PoolError::ConfigLoad(format!(
        "{}: INI support is not enabled",
        path.display()
    )))
}

#[cfg(feature = "yaml")]
fn load_yaml(path: &Path) -> Result<Box<dyn ConfigSource>> {
    Ok(Box::new(YamlSource::load(path)?))
}

#[cfg(not(feature = "yaml"))]
fn load_yaml(path: &Path) -> Result<Box<dyn ConfigSource>> {
    Err(PoolError::ConfigLoad(format!(
        "{}: YAML support is not enabled",
        path.display()
    )))
}
