//! YAML-backed configuration source

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use super::source::ConfigSource;
use crate::error::{PoolError, Result};

/// Configuration read from a YAML document's top-level mapping.
#[derive(Debug)]
pub struct YamlSource {
    doc: Value,
}

impl YamlSource {
    /// Parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PoolError::ConfigLoad(format!("{}: {e}", path.display())))?;
        let doc = serde_yaml::from_str(&text)
            .map_err(|e| PoolError::ConfigLoad(format!("{}: {e}", path.display())))?;
        Ok(Self { doc })
    }

    fn raw(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }
}

impl ConfigSource for YamlSource {
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.raw(key) {
            Some(Value::String(s)) => s.clone(),
            // scalar keys written without quotes still read as strings
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_owned(),
        }
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.raw(key).and_then(Value::as_i64).unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.raw(key).and_then(Value::as_bool).unwrap_or(default)
    }
}
