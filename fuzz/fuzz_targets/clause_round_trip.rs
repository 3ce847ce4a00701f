//! Fuzz target for encode/decode round trips.
//!
//! Builds structured clauses and checks that every clause without
//! separators in its parts survives an encode followed by a decode.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_clause_round_trip
//! ```

#![no_main]

use arbitrary::Arbitrary;
use attrfilter_query::encode::is_encodable;
use attrfilter_query::{Condition, FilterClause, decode, encode};
use libfuzzer_sys::fuzz_target;

/// A fuzzable condition.
#[derive(Debug, Arbitrary)]
enum FuzzCondition {
    Exists,
    Equal(String),
    Like(String),
    GreaterThan(i64),
    LessThan(i64),
}

/// A fuzzable clause.
#[derive(Debug, Arbitrary)]
struct FuzzClause {
    namespace: String,
    keys: Vec<String>,
    condition: FuzzCondition,
}

impl From<FuzzClause> for FilterClause {
    fn from(clause: FuzzClause) -> Self {
        let condition = match clause.condition {
            FuzzCondition::Exists => Condition::Exists,
            FuzzCondition::Equal(v) => Condition::Equal(v),
            FuzzCondition::Like(v) => Condition::Like(v),
            FuzzCondition::GreaterThan(n) => Condition::GreaterThan(n),
            FuzzCondition::LessThan(n) => Condition::LessThan(n),
        };
        FilterClause::new(clause.namespace, clause.keys, condition)
    }
}

fuzz_target!(|input: FuzzClause| {
    let clause = FilterClause::from(input);
    // Value conditions need a key path, and like patterns are normalized.
    if clause.keys().is_empty() && !matches!(clause.condition(), Condition::Exists) {
        return;
    }
    if matches!(clause.condition(), Condition::Like(p) if !p.contains('%')) {
        return;
    }
    if !is_encodable(&clause) {
        return;
    }

    let token = encode(&clause);
    let decoded = decode(&token).expect("encodable clause must decode");
    assert_eq!(decoded, clause);
});
