//! Where configuration and logging settings are looked up.
//!
//! [`FilterConfig::from_env`](crate::config::FilterConfig::from_env) and the
//! logging setup read `ATTRFILTER_*` variables through [`EnvSource`], so tests
//! can hand them a [`MapEnvSource`] instead of touching the process
//! environment.

use std::collections::HashMap;

/// A lookup of `ATTRFILTER_*` settings by variable name.
pub trait EnvSource: Send + Sync {
    /// The value of `name`, if set.
    fn get(&self, name: &str) -> Option<String>;

    /// Whether `name` is set.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed settings, mostly for tests.
///
/// ```rust
/// use attrfilter_query::{FilterConfig, MapEnvSource, OperatorPolicy};
///
/// let source = MapEnvSource::new().set("ATTRFILTER_OPERATOR_POLICY", "strict");
/// let config = FilterConfig::from_env_source(&source).unwrap();
/// assert_eq!(config.operator_policy, OperatorPolicy::Strict);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// An empty source; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
