//! Logging setup.
//!
//! The crate emits `tracing` events and never installs a subscriber on its
//! own. Applications that do not have one can call [`init`], which reads:
//!
//! - `ATTRFILTER_DEBUG=true|1|yes` - enable debug logging
//! - `ATTRFILTER_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `ATTRFILTER_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! Installing the subscriber needs the `tracing-subscriber` feature.
//!
//! ```rust,no_run
//! use attrfilter_query::logging;
//!
//! logging::init();
//! ```
//!
//! Events emitted by the crate:
//!
//! ```rust,ignore
//! debug!(namespace = %ns, depth = 2, operator = %op, "decoded filter");
//! warn!(token = %token, operator = %op, "unrecognized filter operator, treating as existence check");
//! debug!(table = %table, params = 4, "compiled filter predicate");
//! ```
//!
//! Bound values never appear in compile events.

use std::sync::Once;

use crate::env::{EnvSource, StdEnvSource};

/// Enables debug logging when set to a truthy value.
pub const ENV_DEBUG: &str = "ATTRFILTER_DEBUG";
/// Overrides the log level.
pub const ENV_LOG_LEVEL: &str = "ATTRFILTER_LOG_LEVEL";
/// Selects the output format.
pub const ENV_LOG_FORMAT: &str = "ATTRFILTER_LOG_FORMAT";

static INIT: Once = Once::new();

/// Logging settings resolved from an environment source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Whether debug logging was requested.
    pub debug: bool,
    /// Level directive (`trace` through `error`).
    pub level: &'static str,
    /// Output format (`json`, `pretty` or `compact`).
    pub format: &'static str,
    /// Whether any logging variable was set at all.
    pub requested: bool,
}

impl LogSettings {
    /// Resolve settings from an environment source.
    pub fn from_source(source: &impl EnvSource) -> Self {
        let debug = is_truthy(source.get(ENV_DEBUG).as_deref());

        let fallback = if debug { "debug" } else { "warn" };
        let level_var = source.get(ENV_LOG_LEVEL);
        let level = level_var.as_deref().and_then(parse_level).unwrap_or(fallback);

        let format = match source.get(ENV_LOG_FORMAT).map(|f| f.to_lowercase()).as_deref() {
            Some("pretty") => "pretty",
            Some("compact") => "compact",
            _ => "json",
        };

        Self {
            debug,
            level,
            format,
            requested: debug || level_var.is_some(),
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_source(&StdEnvSource)
    }

    /// The `EnvFilter` directive covering this workspace's crates.
    pub fn directive(&self) -> String {
        format!(
            "attrfilter={0},attrfilter_query={0},attrfilter_axum={0}",
            self.level
        )
    }
}

fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Check if debug logging is enabled via `ATTRFILTER_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    is_truthy(StdEnvSource.get(ENV_DEBUG).as_deref())
}

fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// The configured log level. Defaults to "debug" when `ATTRFILTER_DEBUG` is
/// enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    LogSettings::from_env().level
}

/// The configured log format. Defaults to "json".
pub fn get_log_format() -> &'static str {
    LogSettings::from_env().format
}

/// Install a global subscriber according to the environment.
///
/// Only the first call has an effect. Nothing is installed when neither
/// `ATTRFILTER_DEBUG` nor `ATTRFILTER_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        let settings = LogSettings::from_env();
        if !settings.requested {
            return;
        }
        install(settings);
    });
}

/// Install a global subscriber at `level`, ignoring `ATTRFILTER_DEBUG` and
/// `ATTRFILTER_LOG_LEVEL`. Unknown levels fall back to "warn".
pub fn init_with_level(level: &str) {
    INIT.call_once(|| {
        let mut settings = LogSettings::from_env();
        settings.level = parse_level(level).unwrap_or("warn");
        install(settings);
    });
}

/// Install a global subscriber at debug level.
pub fn init_debug() {
    init_with_level("debug");
}

#[cfg(feature = "tracing-subscriber")]
fn install(settings: LogSettings) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_new(settings.directive()).unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = match settings.format {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
        "compact" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init(),
    };

    if result.is_ok() {
        tracing::info!(
            level = settings.level,
            format = settings.format,
            "filter logging initialized"
        );
    }
}

#[cfg(not(feature = "tracing-subscriber"))]
fn install(_settings: LogSettings) {}

/// Debug event emitted only when `ATTRFILTER_DEBUG` is enabled.
#[macro_export]
macro_rules! filter_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::__private::tracing::debug!($($arg)*);
        }
    };
}

/// Trace event emitted only when `ATTRFILTER_DEBUG` is enabled.
#[macro_export]
macro_rules! filter_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::__private::tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = LogSettings::from_source(&MapEnvSource::new());
        assert!(!settings.debug);
        assert!(!settings.requested);
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.format, "json");
    }

    #[test]
    fn test_debug_flag() {
        let source = MapEnvSource::new().set(ENV_DEBUG, "YES");
        let settings = LogSettings::from_source(&source);
        assert!(settings.debug);
        assert!(settings.requested);
        assert_eq!(settings.level, "debug");
    }

    #[test]
    fn test_explicit_level_and_format() {
        let source = MapEnvSource::new()
            .set(ENV_LOG_LEVEL, "TRACE")
            .set(ENV_LOG_FORMAT, "compact");
        let settings = LogSettings::from_source(&source);
        assert_eq!(settings.level, "trace");
        assert_eq!(settings.format, "compact");
        assert_eq!(
            settings.directive(),
            "attrfilter=trace,attrfilter_query=trace,attrfilter_axum=trace"
        );
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("True")));
        assert!(!is_truthy(Some("no")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("Info"), Some("info"));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let source = MapEnvSource::new().set(ENV_LOG_LEVEL, "loud");
        assert_eq!(LogSettings::from_source(&source).level, "warn");
    }
}
