//! Repeated query-string values.
//!
//! Filters arrive as repeated parameters (`?attr=a~x&attr=b~y`). [`QueryValues`]
//! keeps every value for every key in arrival order so the decoder sees the
//! exact sequence the client sent.
//!
//! ```rust
//! use attrfilter_query::QueryValues;
//!
//! let query = QueryValues::parse("attr=ns%7Ea&page=2&attr=other");
//! assert_eq!(query.get_all("attr"), ["ns~a", "other"]);
//! ```

use indexmap::IndexMap;
use url::Url;
use url::form_urlencoded;

use crate::clause::FilterClause;
use crate::decode::Decoder;
use crate::error::DecodeResult;

/// Query-string values grouped by key, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    values: IndexMap<String, Vec<String>>,
}

impl QueryValues {
    /// An empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (percent-encoded) query string, without the leading `?`.
    pub fn parse(query: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Collect the query pairs of a URL.
    pub fn from_url(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs())
    }

    /// Build from already-decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_default().push(value.into());
        }
        Self { values }
    }

    /// Every value under `key`, in order. Empty if the key is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Whether any value exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Decode every token under `key`, stopping at the first error.
    pub fn decode_filters(&self, decoder: &Decoder, key: &str) -> DecodeResult<Vec<FilterClause>> {
        let tokens = self.get_all(key);
        crate::filter_debug!(key = %key, tokens = tokens.len(), "decoding query filters");
        decoder.decode_all(tokens)
    }
}
