//! The filter clause data model.
//!
//! A [`FilterClause`] selects rows by `namespace` and, optionally, by a
//! condition on a path inside the row's JSON document.
//!
//! ```rust
//! use attrfilter_query::{Condition, FilterClause, Operator};
//!
//! let clause = FilterClause::greater_than("metadata", ["cpu", "cores"], 8);
//! assert_eq!(clause.namespace(), "metadata");
//! assert_eq!(clause.keys(), ["cpu", "cores"]);
//! assert_eq!(clause.operator(), Operator::GreaterThan);
//! assert_eq!(clause.condition(), &Condition::GreaterThan(8));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::normalize_like;
use crate::error::DecodeError;

/// Comparison mode applied at a key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Assert that the path exists, ignoring its value.
    None,
    /// Text equality (`eq`).
    Equal,
    /// SQL `LIKE` pattern match (`like`).
    Like,
    /// Integer greater-than (`gt`).
    GreaterThan,
    /// Integer less-than (`lt`).
    LessThan,
}

impl Operator {
    /// The wire spelling of this operator. `None` has no wire form and
    /// returns an empty string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Equal => "eq",
            Self::Like => "like",
            Self::GreaterThan => "gt",
            Self::LessThan => "lt",
        }
    }

    /// Whether the operator compares integers.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an operator spelling fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized operator {0:?}")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Equal),
            "like" => Ok(Self::Like),
            "gt" => Ok(Self::GreaterThan),
            "lt" => Ok(Self::LessThan),
            other => Err(ParseOperatorError(other.to_string())),
        }
    }
}

/// An operator together with its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "operator", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// The path must exist.
    Exists,
    /// The text at the path equals the value.
    Equal(String),
    /// The text at the path matches the `LIKE` pattern.
    Like(String),
    /// The integer at the path is greater than the value.
    GreaterThan(i64),
    /// The integer at the path is less than the value.
    LessThan(i64),
}

impl Condition {
    /// The operator of this condition.
    pub const fn operator(&self) -> Operator {
        match self {
            Self::Exists => Operator::None,
            Self::Equal(_) => Operator::Equal,
            Self::Like(_) => Operator::Like,
            Self::GreaterThan(_) => Operator::GreaterThan,
            Self::LessThan(_) => Operator::LessThan,
        }
    }

    /// The value in its wire form, or `None` for an existence check.
    pub fn value(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Exists => None,
            Self::Equal(v) | Self::Like(v) => Some(Cow::Borrowed(v.as_str())),
            Self::GreaterThan(n) | Self::LessThan(n) => Some(Cow::Owned(n.to_string())),
        }
    }
}

/// One decoded filter: a namespace, an optional key path and a condition.
///
/// Fields are private so a clause cannot change after construction.
/// Deserialization applies the decoder's rules: the namespace must be
/// non-empty, value conditions need a key path and `LIKE` patterns get a
/// trailing `%` when they carry none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFilterClause")]
pub struct FilterClause {
    namespace: String,
    keys: Vec<String>,
    condition: Condition,
}

#[derive(Deserialize)]
struct RawFilterClause {
    namespace: String,
    #[serde(default)]
    keys: Vec<String>,
    condition: Condition,
}

impl TryFrom<RawFilterClause> for FilterClause {
    type Error = DecodeError;

    fn try_from(raw: RawFilterClause) -> Result<Self, Self::Error> {
        if raw.namespace.is_empty() {
            return Err(DecodeError::EmptyNamespace {
                token: String::new(),
            });
        }
        if raw.keys.is_empty() && raw.condition != Condition::Exists {
            return Err(DecodeError::MissingKeyPath {
                namespace: raw.namespace,
                operator: raw.condition.operator(),
            });
        }

        let condition = match raw.condition {
            Condition::Like(pattern) => Condition::Like(normalize_like(&pattern)),
            other => other,
        };
        Ok(Self {
            namespace: raw.namespace,
            keys: raw.keys,
            condition,
        })
    }
}

impl FilterClause {
    /// Build a clause from its parts.
    ///
    /// A value condition with an empty key path is accepted here but cannot be
    /// compiled; use the named constructors to stay within the valid shapes.
    pub fn new<K, S>(namespace: impl Into<String>, keys: K, condition: Condition) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            condition,
        }
    }

    /// Match every row in a namespace.
    pub fn namespace_only(namespace: impl Into<String>) -> Self {
        Self::new(namespace, Vec::<String>::new(), Condition::Exists)
    }

    /// Match rows where the key path exists.
    pub fn exists<K, S>(namespace: impl Into<String>, keys: K) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(namespace, keys, Condition::Exists)
    }

    /// Match rows where the text at the key path equals `value`.
    pub fn equal<K, S>(namespace: impl Into<String>, keys: K, value: impl Into<String>) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(namespace, keys, Condition::Equal(value.into()))
    }

    /// Match rows where the text at the key path matches a `LIKE` pattern.
    ///
    /// A trailing `%` is appended when the pattern has no wildcard, as the
    /// decoder does.
    pub fn like<K, S>(namespace: impl Into<String>, keys: K, pattern: impl AsRef<str>) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern = normalize_like(pattern.as_ref());
        Self::new(namespace, keys, Condition::Like(pattern))
    }

    /// Match rows where the integer at the key path is greater than `value`.
    pub fn greater_than<K, S>(namespace: impl Into<String>, keys: K, value: i64) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(namespace, keys, Condition::GreaterThan(value))
    }

    /// Match rows where the integer at the key path is less than `value`.
    pub fn less_than<K, S>(namespace: impl Into<String>, keys: K, value: i64) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(namespace, keys, Condition::LessThan(value))
    }

    /// The attribute namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The key path inside the JSON document.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The condition applied at the key path.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.condition.operator()
    }

    /// The comparison value in wire form.
    pub fn value(&self) -> Option<Cow<'_, str>> {
        self.condition.value()
    }

    /// Whether the clause only restricts the namespace.
    pub fn is_namespace_only(&self) -> bool {
        self.keys.is_empty()
    }
}
