//! Axum integration for query-string attribute filters.
//!
//! # Features
//!
//! - **Extractors**: [`AttributeFilters`] decodes every token under a fixed
//!   query key; [`QueryFilters`] exposes all repeated query values for
//!   handlers that pick the key at runtime
//! - **Layer**: [`FilterLayer`] puts a [`FilterConfig`] into request
//!   extensions so extractors decode with its policy
//! - **Rejections**: decode failures become `400 Bad Request`
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use attrfilter_axum::{AttributeFilters, FilterKey, FilterLayer};
//! use attrfilter_query::{Combinator, FilterConfig};
//!
//! struct Attr;
//! impl FilterKey for Attr {
//!     const KEY: &'static str = "attr";
//! }
//!
//! async fn list_servers(filters: AttributeFilters<Attr>) -> String {
//!     let predicate = FilterConfig::default()
//!         .compiler()
//!         .compile_all(filters.iter(), "server_attributes", Combinator::All);
//!     predicate.sql
//! }
//!
//! let app = Router::new()
//!     .route("/servers", get(list_servers))
//!     .layer(FilterLayer::new(FilterConfig::default()));
//! ```

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tower::{Layer, Service};
use tracing::{debug, info};

pub use attrfilter_query::prelude::*;
use attrfilter_query::ErrorCode;

/// Errors returned to clients when filters cannot be decoded.
#[derive(Error, Debug)]
pub enum FilterRejection {
    /// A token under `key` failed to decode.
    #[error("invalid filter in `{key}`: {source}")]
    Decode {
        /// The query key holding the bad token.
        key: String,
        /// The decode failure.
        #[source]
        source: DecodeError,
    },
}

impl FilterRejection {
    /// The error code of the underlying failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Decode { source, .. } => source.code(),
        }
    }
}

impl IntoResponse for FilterRejection {
    fn into_response(self) -> Response {
        let Self::Decode { key, source } = &self;
        debug!(key = %key, code = %source.code(), "rejecting request with invalid filter");

        let body = serde_json::json!({
            "error": {
                "code": source.code().code(),
                "description": source.code().description(),
                "message": self.to_string(),
                "key": key,
                "hint": source.suggestion(),
            }
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Result type for filter extraction.
pub type Result<T> = std::result::Result<T, FilterRejection>;

/// Names the query key an [`AttributeFilters`] extractor reads.
pub trait FilterKey {
    /// The query parameter name, e.g. `"attr"`.
    const KEY: &'static str;
}

fn request_decoder(parts: &Parts) -> Decoder {
    parts
        .extensions
        .get::<Arc<FilterConfig>>()
        .map(|config| config.decoder())
        .unwrap_or_default()
}

fn query_values(parts: &Parts) -> QueryValues {
    QueryValues::parse(parts.uri.query().unwrap_or_default())
}

/// All query values of the request, grouped by key.
///
/// Decoding is left to the handler, which can choose the key and the
/// decoder. Extraction itself never fails.
#[derive(Debug, Clone)]
pub struct QueryFilters {
    values: QueryValues,
    decoder: Decoder,
}

impl QueryFilters {
    /// The raw query values.
    pub fn values(&self) -> &QueryValues {
        &self.values
    }

    /// The decoder taken from the request's [`FilterConfig`], or the
    /// lenient default.
    pub fn decoder(&self) -> Decoder {
        self.decoder
    }

    /// Decode every token under `key` with the request's decoder.
    pub fn decode(&self, key: &str) -> Result<Vec<FilterClause>> {
        self.decode_with(&self.decoder, key)
    }

    /// Decode every token under `key` with a specific decoder.
    pub fn decode_with(&self, decoder: &Decoder, key: &str) -> Result<Vec<FilterClause>> {
        self.values
            .decode_filters(decoder, key)
            .map_err(|source| FilterRejection::Decode {
                key: key.to_string(),
                source,
            })
    }
}

impl<S> FromRequestParts<S> for QueryFilters
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self {
            values: query_values(parts),
            decoder: request_decoder(parts),
        })
    }
}

/// The decoded filters under query key `K::KEY`, in request order.
///
/// Rejects the request with `400 Bad Request` on the first bad token.
pub struct AttributeFilters<K> {
    clauses: Vec<FilterClause>,
    _key: PhantomData<fn() -> K>,
}

impl<K> AttributeFilters<K> {
    /// Take the decoded clauses.
    pub fn into_inner(self) -> Vec<FilterClause> {
        self.clauses
    }
}

impl<K> Deref for AttributeFilters<K> {
    type Target = [FilterClause];

    fn deref(&self) -> &Self::Target {
        &self.clauses
    }
}

impl<K> std::fmt::Debug for AttributeFilters<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AttributeFilters").field(&self.clauses).finish()
    }
}

impl<K, S> FromRequestParts<S> for AttributeFilters<K>
where
    K: FilterKey,
    S: Send + Sync,
{
    type Rejection = FilterRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let values = query_values(parts);
        let clauses = values
            .decode_filters(&request_decoder(parts), K::KEY)
            .map_err(|source| FilterRejection::Decode {
                key: K::KEY.to_string(),
                source,
            })?;

        debug!(key = K::KEY, count = clauses.len(), "extracted attribute filters");
        Ok(Self {
            clauses,
            _key: PhantomData,
        })
    }
}

/// Tower layer that makes a [`FilterConfig`] available to the extractors.
#[derive(Debug, Clone)]
pub struct FilterLayer {
    config: Arc<FilterConfig>,
}

impl FilterLayer {
    /// Create a new filter layer.
    pub fn new(config: FilterConfig) -> Self {
        info!(policy = ?config.operator_policy, "FilterLayer created");
        Self {
            config: Arc::new(config),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl<S> Layer<S> for FilterLayer {
    type Service = FilterMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FilterMiddleware {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Middleware service produced by [`FilterLayer`].
#[derive(Debug, Clone)]
pub struct FilterMiddleware<S> {
    inner: S,
    config: Arc<FilterConfig>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for FilterMiddleware<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        request.extensions_mut().insert(self.config.clone());
        self.inner.call(request)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        AttributeFilters, FilterKey, FilterLayer, FilterMiddleware, FilterRejection,
        QueryFilters, Result,
    };
    pub use attrfilter_query::prelude::*;
}
