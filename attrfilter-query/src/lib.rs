//! # attrfilter-query
//!
//! Attribute filters carried in URL query strings, and their translation into
//! parameterized PostgreSQL predicates over a JSON column.
//!
//! A filter token names a namespace, optionally a key path inside the row's
//! JSON document, and optionally a comparison:
//!
//! ```text
//! metadata                      every row in the `metadata` namespace
//! metadata~owner.team           rows whose document has owner.team
//! metadata~owner.team~eq~infra  rows where owner.team is "infra"
//! metadata~name~like~web        rows where name LIKE 'web%'
//! metadata~cpu.cores~gt~8       rows where cpu.cores > 8
//! metadata~cpu.cores~lt~64      rows where cpu.cores < 64
//! ```
//!
//! ## Decoding and compiling
//!
//! ```rust
//! use attrfilter_query::{compile, decode, FilterValue};
//!
//! let clause = decode("metadata~cpu.cores~gt~8").unwrap();
//! let predicate = compile(&clause, "server_attributes");
//!
//! assert_eq!(
//!     predicate.sql,
//!     "(server_attributes.namespace = $1 AND \
//!      json_extract_path_text(server_attributes.data::JSON, $2, $3)::bigint > $4)"
//! );
//! assert_eq!(predicate.params[3], FilterValue::Int(8));
//! ```
//!
//! ## Building links
//!
//! ```rust
//! use attrfilter_query::{encode, FilterClause};
//! use attrfilter_query::encode::append_to_url;
//! use url::Url;
//!
//! let clauses = [
//!     FilterClause::equal("metadata", ["owner", "team"], "infra"),
//!     FilterClause::exists("metadata", ["rack"]),
//! ];
//!
//! let mut url = Url::parse("https://example.com/servers").unwrap();
//! append_to_url(&mut url, "attr", &clauses);
//! assert_eq!(
//!     url.as_str(),
//!     "https://example.com/servers?attr=metadata%7Eowner.team%7Eeq%7Einfra&attr=metadata%7Erack"
//! );
//! ```
//!
//! ## Combining clauses
//!
//! Several clauses under one query key are combined by the caller with
//! [`Combinator::All`] or [`Combinator::Any`]; nothing here assumes either.
//!
//! ## Error Handling
//!
//! ```rust
//! use attrfilter_query::{decode, DecodeError, ErrorCode};
//!
//! let err = decode("metadata~cpu~lt~many").unwrap_err();
//! assert!(matches!(err, DecodeError::InvalidNumber { .. }));
//! assert_eq!(err.code(), ErrorCode::InvalidNumber);
//! ```

pub mod clause;
pub mod compile;
pub mod config;
pub mod decode;
pub mod encode;
pub mod env;
pub mod error;
pub mod filter;
pub mod logging;
pub mod query;
pub mod sql;

pub use clause::{Condition, FilterClause, Operator, ParseOperatorError};
pub use compile::{Combinator, Predicate, PredicateCompiler, compile};
pub use config::FilterConfig;
pub use decode::{Decoder, OperatorPolicy, decode, decode_all};
pub use encode::{encode, encode_all};
pub use env::{EnvSource, MapEnvSource, StdEnvSource};
pub use error::{ConfigError, ConfigResult, DecodeError, DecodeResult, ErrorCode};
pub use filter::FilterValue;
pub use query::QueryValues;
pub use sql::{ParamStyle, SqlBuilder};

// Re-export logging utilities
pub use logging::{
    LogSettings, get_log_format, get_log_level, init as init_logging, init_debug,
    init_with_level, is_debug_enabled,
};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clause::{Condition, FilterClause, Operator};
    pub use crate::compile::{Combinator, Predicate, PredicateCompiler};
    pub use crate::config::FilterConfig;
    pub use crate::decode::{Decoder, OperatorPolicy};
    pub use crate::error::{DecodeError, DecodeResult};
    pub use crate::filter::FilterValue;
    pub use crate::query::QueryValues;
}
