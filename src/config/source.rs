//! Typed key lookup over a loaded configuration file

/// Typed view over one configuration backend.
///
/// Lookups never fail: missing keys and values that do not coerce to
/// the requested type yield the caller's default.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// String value for `key`, or `default`.
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Integer value for `key`, or `default`.
    fn get_int(&self, key: &str, default: i64) -> i64;

    /// Boolean value for `key`, or `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool;
}
