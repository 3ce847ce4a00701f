//! Bound parameter values.

use serde::{Deserialize, Serialize};

/// A value bound to a placeholder in a compiled predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Integer value.
    Int(i64),
    /// String value.
    String(String),
}

impl FilterValue {
    /// Get the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Get the integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::String(_) => None,
        }
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<&String> for FilterValue {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}
