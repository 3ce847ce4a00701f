//! Token decoder.
//!
//! Tokens have one of three shapes:
//!
//! ```text
//! namespace
//! namespace~key.path
//! namespace~key.path~operator~value
//! ```
//!
//! The decoder is lenient by default: a token with 3 or 5+ segments decodes as
//! an existence check on its key path, and an unknown operator degrades to an
//! existence check as well. Links already handed out keep working this way.
//! [`OperatorPolicy::Strict`] turns both cases into errors.
//!
//! ```rust
//! use attrfilter_query::{decode, Condition};
//!
//! let clause = decode("metadata~name~like~web").unwrap();
//! assert_eq!(clause.condition(), &Condition::Like("web%".into()));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clause::{Condition, FilterClause, Operator};
use crate::error::{DecodeError, DecodeResult};

/// Separator between token segments.
pub const SEGMENT_SEPARATOR: char = '~';
/// Separator between keys of a key path.
pub const KEY_SEPARATOR: char = '.';
/// `LIKE` wildcard appended to patterns that carry none.
pub const LIKE_WILDCARD: char = '%';

/// How the decoder treats tokens it does not fully understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorPolicy {
    /// Unknown operators and odd segment counts fall back to existence checks.
    #[default]
    Lenient,
    /// Unknown operators and odd segment counts are decode errors.
    Strict,
}

impl OperatorPolicy {
    /// Parse a policy name (`lenient` or `strict`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Decodes filter tokens into [`FilterClause`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    policy: OperatorPolicy,
}

impl Decoder {
    /// A decoder with the lenient policy.
    pub const fn new() -> Self {
        Self {
            policy: OperatorPolicy::Lenient,
        }
    }

    /// A decoder that rejects unknown operators and malformed tokens.
    pub const fn strict() -> Self {
        Self {
            policy: OperatorPolicy::Strict,
        }
    }

    /// A decoder with the given policy.
    pub const fn with_policy(policy: OperatorPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    pub const fn policy(&self) -> OperatorPolicy {
        self.policy
    }

    /// Decode a single token.
    pub fn decode(&self, token: &str) -> DecodeResult<FilterClause> {
        crate::filter_trace!(token = %token, policy = ?self.policy, "decoding filter token");

        let parts: Vec<&str> = token.split(SEGMENT_SEPARATOR).collect();

        let namespace = parts[0];
        if namespace.is_empty() {
            return Err(DecodeError::EmptyNamespace {
                token: token.to_string(),
            });
        }

        if parts.len() == 1 {
            debug!(namespace = %namespace, "decoded namespace-only filter");
            return Ok(FilterClause::namespace_only(namespace));
        }

        let keys = parts[1].split(KEY_SEPARATOR);

        if parts.len() != 4 {
            if parts.len() != 2 {
                if self.policy == OperatorPolicy::Strict {
                    return Err(DecodeError::MalformedSegmentCount {
                        token: token.to_string(),
                        segments: parts.len(),
                    });
                }
                warn!(
                    token = %token,
                    segments = parts.len(),
                    "filter has unexpected segment count, treating as existence check"
                );
            }
            return Ok(FilterClause::exists(namespace, keys));
        }

        let condition = match parts[2].parse::<Operator>() {
            Ok(op) => parse_condition(op, parts[3])?,
            Err(_) if self.policy == OperatorPolicy::Strict => {
                return Err(DecodeError::UnrecognizedOperator {
                    token: token.to_string(),
                    operator: parts[2].to_string(),
                });
            }
            Err(_) => {
                warn!(
                    token = %token,
                    operator = %parts[2],
                    "unrecognized filter operator, treating as existence check"
                );
                Condition::Exists
            }
        };

        let clause = FilterClause::new(namespace, keys, condition);
        debug!(
            namespace = %clause.namespace(),
            depth = clause.keys().len(),
            operator = %clause.operator(),
            "decoded filter"
        );
        Ok(clause)
    }

    /// Decode every token in order, stopping at the first error.
    pub fn decode_all<I, S>(&self, tokens: I) -> DecodeResult<Vec<FilterClause>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| self.decode(token.as_ref()))
            .collect()
    }
}

fn parse_condition(op: Operator, value: &str) -> DecodeResult<Condition> {
    let condition = match op {
        Operator::None => Condition::Exists,
        Operator::Equal => Condition::Equal(value.to_string()),
        Operator::Like => Condition::Like(normalize_like(value)),
        Operator::GreaterThan => Condition::GreaterThan(parse_number(op, value)?),
        Operator::LessThan => Condition::LessThan(parse_number(op, value)?),
    };
    Ok(condition)
}

fn parse_number(operator: Operator, value: &str) -> DecodeResult<i64> {
    value
        .parse::<i64>()
        .map_err(|source| DecodeError::InvalidNumber {
            operator,
            value: value.to_string(),
            source,
        })
}

/// Append a trailing `%` to a pattern that has no wildcard.
pub fn normalize_like(pattern: &str) -> String {
    let mut pattern = pattern.to_string();
    if !pattern.contains(LIKE_WILDCARD) {
        pattern.push(LIKE_WILDCARD);
    }
    pattern
}

/// Decode a token with the lenient policy.
pub fn decode(token: &str) -> DecodeResult<FilterClause> {
    Decoder::new().decode(token)
}

/// Decode tokens in order with the lenient policy, stopping at the first error.
pub fn decode_all<I, S>(tokens: I) -> DecodeResult<Vec<FilterClause>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Decoder::new().decode_all(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_namespace_only() {
        let clause = decode("ns").unwrap();
        assert_eq!(clause, FilterClause::namespace_only("ns"));
        assert!(clause.keys().is_empty());
        assert_eq!(clause.operator(), Operator::None);
    }

    #[test]
    fn test_existence_check() {
        let clause = decode("ns~a.b").unwrap();
        assert_eq!(clause.namespace(), "ns");
        assert_eq!(clause.keys(), ["a", "b"]);
        assert_eq!(clause.operator(), Operator::None);
    }

    #[test]
    fn test_equal() {
        let clause = decode("ns~a~eq~5").unwrap();
        assert_eq!(clause.condition(), &Condition::Equal("5".into()));
    }

    #[test]
    fn test_equal_keeps_value_verbatim() {
        let clause = decode("ns~a~eq~50%").unwrap();
        assert_eq!(clause.condition(), &Condition::Equal("50%".into()));
    }

    #[test]
    fn test_like_appends_wildcard() {
        let clause = decode("ns~a~like~foo").unwrap();
        assert_eq!(clause.condition(), &Condition::Like("foo%".into()));
    }

    #[test]
    fn test_like_keeps_existing_wildcard() {
        let clause = decode("ns~a~like~f%o").unwrap();
        assert_eq!(clause.condition(), &Condition::Like("f%o".into()));

        let clause = decode("ns~a~like~%").unwrap();
        assert_eq!(clause.condition(), &Condition::Like("%".into()));
    }

    #[test]
    fn test_like_empty_value() {
        let clause = decode("ns~a~like~").unwrap();
        assert_eq!(clause.condition(), &Condition::Like("%".into()));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert_eq!(
            decode("ns~a~gt~5").unwrap().condition(),
            &Condition::GreaterThan(5)
        );
        assert_eq!(
            decode("ns~a~lt~-12").unwrap().condition(),
            &Condition::LessThan(-12)
        );
    }

    #[test]
    fn test_zero_is_a_real_bound() {
        assert_eq!(
            decode("ns~a~gt~0").unwrap().condition(),
            &Condition::GreaterThan(0)
        );
        assert_eq!(
            decode("ns~a~lt~0").unwrap().condition(),
            &Condition::LessThan(0)
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = decode("ns~a~gt~abc").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidNumber);
        match err {
            DecodeError::InvalidNumber {
                operator, value, ..
            } => {
                assert_eq!(operator, Operator::GreaterThan);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(decode("ns~a~lt~1.5").is_err());
        assert!(decode("ns~a~lt~").is_err());
    }

    #[test]
    fn test_empty_namespace() {
        assert_eq!(
            decode("").unwrap_err().code(),
            ErrorCode::EmptyNamespace
        );
        assert_eq!(
            decode("~a~eq~1").unwrap_err().code(),
            ErrorCode::EmptyNamespace
        );
    }

    #[test]
    fn test_lenient_unknown_operator() {
        let clause = decode("ns~a.b~between~5").unwrap();
        assert_eq!(clause, FilterClause::exists("ns", ["a", "b"]));
    }

    #[test]
    fn test_lenient_segment_counts() {
        assert_eq!(
            decode("ns~a~eq").unwrap(),
            FilterClause::exists("ns", ["a"])
        );
        assert_eq!(
            decode("ns~a~eq~x~y").unwrap(),
            FilterClause::exists("ns", ["a"])
        );
    }

    #[test]
    fn test_empty_key_path() {
        let clause = decode("ns~").unwrap();
        assert_eq!(clause.keys(), [""]);
    }

    #[test]
    fn test_strict_rejects_unknown_operator() {
        let err = Decoder::strict().decode("ns~a~between~5").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnrecognizedOperator {
                token: "ns~a~between~5".into(),
                operator: "between".into(),
            }
        );
    }

    #[test]
    fn test_strict_rejects_segment_counts() {
        let decoder = Decoder::strict();
        assert_eq!(
            decoder.decode("ns~a~eq").unwrap_err().code(),
            ErrorCode::MalformedSegmentCount
        );
        assert_eq!(
            decoder.decode("ns~a~eq~x~y").unwrap_err().code(),
            ErrorCode::MalformedSegmentCount
        );
        assert!(decoder.decode("ns").is_ok());
        assert!(decoder.decode("ns~a").is_ok());
        assert!(decoder.decode("ns~a~eq~x").is_ok());
    }

    #[test]
    fn test_decode_all_preserves_order() {
        let clauses = decode_all(["b~x", "a", "c~y~gt~1"]).unwrap();
        let namespaces: Vec<_> = clauses.iter().map(|c| c.namespace()).collect();
        assert_eq!(namespaces, ["b", "a", "c"]);
    }

    #[test]
    fn test_decode_all_fails_fast() {
        let err = decode_all(["ns~a", "ns~b~gt~nope", ""]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidNumber);
    }

    #[test]
    fn test_policy_from_name() {
        assert_eq!(OperatorPolicy::from_name("STRICT"), Some(OperatorPolicy::Strict));
        assert_eq!(OperatorPolicy::from_name("lenient"), Some(OperatorPolicy::Lenient));
        assert_eq!(OperatorPolicy::from_name("loose"), None);
    }
}
