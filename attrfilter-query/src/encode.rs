//! Token encoder, the inverse of [`decode`](crate::decode::decode).
//!
//! Used when building outbound links that carry filters. Batch helpers append
//! one query pair per clause and keep the input order, so the same clauses
//! always produce the same URL.
//!
//! ```rust
//! use attrfilter_query::{encode, FilterClause};
//!
//! let clause = FilterClause::less_than("metadata", ["disk", "size"], 512);
//! assert_eq!(encode(&clause), "metadata~disk.size~lt~512");
//! ```

use std::fmt;

use tracing::warn;
use url::Url;
use url::form_urlencoded::{Serializer, Target};

use crate::clause::{Condition, FilterClause};
use crate::decode::{KEY_SEPARATOR, SEGMENT_SEPARATOR};

/// Encode a clause as a token.
pub fn encode(clause: &FilterClause) -> String {
    if !is_encodable(clause) {
        warn!(
            namespace = %clause.namespace(),
            "filter contains a separator and will not decode to the same clause"
        );
    }

    let mut token = clause.namespace().to_string();
    if clause.keys().is_empty() {
        return token;
    }

    token.push(SEGMENT_SEPARATOR);
    push_keys(&mut token, clause.keys());

    let op = clause.operator();
    match clause.condition() {
        Condition::Exists => {}
        Condition::Equal(value) | Condition::Like(value) => {
            push_operator(&mut token, op.as_str());
            token.push_str(value);
        }
        Condition::GreaterThan(n) | Condition::LessThan(n) => {
            push_operator(&mut token, op.as_str());
            token.push_str(&n.to_string());
        }
    }

    token
}

fn push_keys(token: &mut String, keys: &[String]) {
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            token.push(KEY_SEPARATOR);
        }
        token.push_str(key);
    }
}

fn push_operator(token: &mut String, op: &str) {
    token.push(SEGMENT_SEPARATOR);
    token.push_str(op);
    token.push(SEGMENT_SEPARATOR);
}

/// Whether the clause survives an encode/decode cycle structurally.
///
/// False when the namespace is empty, or when a separator appears inside the
/// namespace, a key or the value.
pub fn is_encodable(clause: &FilterClause) -> bool {
    if clause.namespace().is_empty() || clause.namespace().contains(SEGMENT_SEPARATOR) {
        return false;
    }
    if clause
        .keys()
        .iter()
        .any(|k| k.contains(SEGMENT_SEPARATOR) || k.contains(KEY_SEPARATOR))
    {
        return false;
    }
    match clause.condition() {
        Condition::Equal(v) | Condition::Like(v) => !v.contains(SEGMENT_SEPARATOR),
        Condition::Exists | Condition::GreaterThan(_) | Condition::LessThan(_) => true,
    }
}

/// Encode clauses in order, one token each.
pub fn encode_all<'a, I>(clauses: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a FilterClause>,
{
    clauses.into_iter().map(encode).collect()
}

/// Append one `key=token` pair per clause to the URL's query string.
///
/// Existing pairs, including ones under the same key, are kept.
pub fn append_to_url<'a, I>(url: &mut Url, key: &str, clauses: I)
where
    I: IntoIterator<Item = &'a FilterClause>,
{
    let mut pairs = url.query_pairs_mut();
    for clause in clauses {
        pairs.append_pair(key, &encode(clause));
    }
}

/// Append one `key=token` pair per clause to a form serializer.
pub fn append_to_serializer<'a, T, I>(serializer: &mut Serializer<'_, T>, key: &str, clauses: I)
where
    T: Target,
    I: IntoIterator<Item = &'a FilterClause>,
{
    for clause in clauses {
        serializer.append_pair(key, &encode(clause));
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_namespace_only() {
        assert_eq!(encode(&FilterClause::namespace_only("ns")), "ns");
    }

    #[test]
    fn test_namespace_only_ignores_condition() {
        let clause = FilterClause::new("ns", Vec::<String>::new(), Condition::GreaterThan(3));
        assert_eq!(encode(&clause), "ns");
    }

    #[test]
    fn test_existence_check() {
        assert_eq!(encode(&FilterClause::exists("ns", ["a", "b"])), "ns~a.b");
    }

    #[test]
    fn test_value_conditions() {
        assert_eq!(encode(&FilterClause::equal("ns", ["a"], "5")), "ns~a~eq~5");
        assert_eq!(
            encode(&FilterClause::like("ns", ["a", "b"], "fo%")),
            "ns~a.b~like~fo%"
        );
        assert_eq!(encode(&FilterClause::greater_than("ns", ["a"], 0)), "ns~a~gt~0");
        assert_eq!(encode(&FilterClause::less_than("ns", ["a"], -7)), "ns~a~lt~-7");
    }

    #[test]
    fn test_display_matches_encode() {
        let clause = FilterClause::equal("ns", ["x", "y"], "z");
        assert_eq!(clause.to_string(), "ns~x.y~eq~z");
    }

    #[test]
    fn test_round_trip() {
        let clauses = [
            FilterClause::namespace_only("ns"),
            FilterClause::exists("ns", ["a", "b", "c"]),
            FilterClause::equal("ns", ["a"], "hello world"),
            FilterClause::like("ns", ["a"], "%mid%"),
            FilterClause::greater_than("ns", ["a"], i64::MAX),
            FilterClause::less_than("ns", ["a"], i64::MIN),
        ];
        for clause in clauses {
            assert_eq!(decode(&encode(&clause)).unwrap(), clause);
        }
    }

    #[test]
    fn test_is_encodable() {
        assert!(is_encodable(&FilterClause::equal("ns", ["a"], "x.y")));
        assert!(!is_encodable(&FilterClause::equal("ns", ["a"], "x~y")));
        assert!(!is_encodable(&FilterClause::exists("ns", ["a.b"])));
        assert!(!is_encodable(&FilterClause::namespace_only("")));
        assert!(!is_encodable(&FilterClause::namespace_only("a~b")));
    }

    #[test]
    fn test_append_to_url_keeps_existing_pairs() {
        let mut url = Url::parse("https://example.com/servers?attr=old&page=2").unwrap();
        let clauses = [
            FilterClause::equal("ns", ["a"], "1"),
            FilterClause::namespace_only("other"),
        ];
        append_to_url(&mut url, "attr", &clauses);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("attr".to_string(), "old".to_string()),
                ("page".to_string(), "2".to_string()),
                ("attr".to_string(), "ns~a~eq~1".to_string()),
                ("attr".to_string(), "other".to_string()),
            ]
        );
    }

    #[test]
    fn test_append_to_serializer() {
        let mut serializer = Serializer::new(String::new());
        let clauses = [FilterClause::like("ns", ["name"], "a b%")];
        append_to_serializer(&mut serializer, "attr", &clauses);
        assert_eq!(serializer.finish(), "attr=ns%7Ename%7Elike%7Ea+b%25");
    }
}
