//! Error types for filter decoding and configuration.
//!
//! Every error carries a stable [`ErrorCode`] so callers can map failures to
//! responses without matching on message text.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: F{category}{number}
//! - 1xxx: Decode errors (bad numbers, unknown operators, malformed tokens)
//! - 7xxx: Configuration errors
//!
//! ```rust
//! use attrfilter_query::{decode, ErrorCode};
//!
//! let err = decode("ns~age~gt~abc").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::InvalidNumber);
//! assert_eq!(err.code().code(), "F1001");
//! ```

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

use crate::clause::Operator;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Decode errors (1xxx)
    /// A `gt`/`lt` value is not a base-10 integer (F1001).
    InvalidNumber = 1001,
    /// The namespace segment is empty (F1002).
    EmptyNamespace = 1002,
    /// The operator segment is not one of `eq`, `like`, `gt`, `lt` (F1003).
    UnrecognizedOperator = 1003,
    /// The token has an unsupported number of `~` segments (F1004).
    MalformedSegmentCount = 1004,
    /// A value condition has no key path to compare at (F1005).
    MissingKeyPath = 1005,

    // Configuration errors (7xxx)
    /// Invalid configuration value (F7001).
    InvalidConfiguration = 7001,
    /// Configuration file could not be read (F7002).
    ConfigurationIo = 7002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "F1001").
    pub fn code(&self) -> String {
        format!("F{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidNumber => "Invalid numeric filter value",
            Self::EmptyNamespace => "Empty filter namespace",
            Self::UnrecognizedOperator => "Unrecognized filter operator",
            Self::MalformedSegmentCount => "Malformed filter token",
            Self::MissingKeyPath => "Filter condition without key path",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::ConfigurationIo => "Configuration file unreadable",
        }
    }

    /// Whether the error was caused by client input rather than setup.
    pub fn is_client_error(&self) -> bool {
        (*self as u16) < 2000
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors produced while decoding a filter token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A numeric comparison carried a value that is not an integer.
    #[error("invalid number {value:?} for `{operator}` filter: {source}")]
    InvalidNumber {
        /// The comparison operator (`gt` or `lt`).
        operator: Operator,
        /// The raw value segment.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The namespace segment is empty.
    #[error("filter {token:?} has an empty namespace")]
    EmptyNamespace {
        /// The offending token.
        token: String,
    },

    /// The operator segment is not recognized (strict mode only).
    #[error("filter {token:?} uses unrecognized operator {operator:?}")]
    UnrecognizedOperator {
        /// The offending token.
        token: String,
        /// The operator segment as written.
        operator: String,
    },

    /// The token has an unsupported segment count (strict mode only).
    #[error("filter {token:?} has {segments} segments, expected 1, 2 or 4")]
    MalformedSegmentCount {
        /// The offending token.
        token: String,
        /// Number of `~`-separated segments found.
        segments: usize,
    },

    /// A clause built outside the decoder has a value condition but no key
    /// path.
    #[error("filter on namespace {namespace:?} has a `{operator}` condition but no key path")]
    MissingKeyPath {
        /// The clause namespace.
        namespace: String,
        /// The operator that needs a key path.
        operator: Operator,
    },
}

impl DecodeError {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidNumber { .. } => ErrorCode::InvalidNumber,
            Self::EmptyNamespace { .. } => ErrorCode::EmptyNamespace,
            Self::UnrecognizedOperator { .. } => ErrorCode::UnrecognizedOperator,
            Self::MalformedSegmentCount { .. } => ErrorCode::MalformedSegmentCount,
            Self::MissingKeyPath { .. } => ErrorCode::MissingKeyPath,
        }
    }

    /// A short hint on how to fix the token.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidNumber { .. } => "Use a base-10 integer such as `ns~age~gt~21`",
            Self::EmptyNamespace { .. } => "Start the filter with a namespace, e.g. `ns~key`",
            Self::UnrecognizedOperator { .. } => "Use one of `eq`, `like`, `gt` or `lt`",
            Self::MalformedSegmentCount { .. } => {
                "Use `ns`, `ns~key.path` or `ns~key.path~op~value`"
            }
            Self::MissingKeyPath { .. } => "Add a key path, e.g. `ns~key~eq~value`",
        }
    }
}

/// Errors produced while loading a [`FilterConfig`](crate::config::FilterConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting holds a value outside its allowed set.
    #[error("invalid value {value:?} for {name}: {message}")]
    InvalidValue {
        /// Setting or environment variable name.
        name: String,
        /// The rejected value.
        value: String,
        /// What was expected.
        message: String,
    },

    /// The TOML document could not be parsed.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidValue { .. } | Self::Toml(_) => ErrorCode::InvalidConfiguration,
            Self::Io(_) => ErrorCode::ConfigurationIo,
        }
    }
}
