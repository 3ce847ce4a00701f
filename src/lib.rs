//! # attrfilter
//!
//! Attribute filters carried in URL query strings, compiled into
//! parameterized PostgreSQL predicates over a JSON document column.
//!
//! - Decode `ns~key.path~op~value` tokens into typed clauses
//! - Encode clauses back into tokens and links
//! - Compile clauses into SQL fragments with bound parameters
//! - Optional axum extractors behind the `axum` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use attrfilter::prelude::*;
//!
//! let query = QueryValues::parse("attr=metadata~owner.team~eq~infra&attr=metadata~rack");
//! let clauses = query.decode_filters(&Decoder::new(), "attr").unwrap();
//!
//! let predicate = PredicateCompiler::new().compile_all(&clauses, "servers", Combinator::All);
//! assert_eq!(
//!     predicate.sql,
//!     "((servers.namespace = $1 AND \
//!      json_extract_path_text(servers.data::JSONB, $2, $3) = $4) AND \
//!      (servers.namespace = $5 AND servers.data::JSONB ? $6))"
//! );
//! assert_eq!(predicate.param_count(), 6);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Token decoding, encoding and predicate compilation.
pub mod query {
    pub use attrfilter_query::*;
}

/// Axum extractors and layer.
#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
pub mod axum {
    pub use attrfilter_axum::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use attrfilter_query::prelude::*;

    #[cfg(feature = "axum")]
    pub use attrfilter_axum::{AttributeFilters, FilterKey, FilterLayer, QueryFilters};
}

// Re-export key types at the crate root
pub use attrfilter_query::{
    Combinator, DecodeError, FilterClause, FilterConfig, Predicate, compile, decode, encode,
};
