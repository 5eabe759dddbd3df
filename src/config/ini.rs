//! INI-backed configuration source

use std::path::Path;

use ini::Ini;

use super::source::ConfigSource;
use crate::error::{PoolError, Result};

/// Configuration read from an INI file's default section.
#[derive(Debug)]
pub struct IniSource {
    doc: Ini,
}

impl IniSource {
    /// Parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let doc = Ini::load_from_file(path)
            .map_err(|e| PoolError::ConfigLoad(format!("{}: {e}", path.display())))?;
        Ok(Self { doc })
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.doc.general_section().get(key)
    }
}

impl ConfigSource for IniSource {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.raw(key)
            .map(str::to_owned)
            .unwrap_or_else(|| default.to_owned())
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.raw(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.raw(key).and_then(parse_bool).unwrap_or(default)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
