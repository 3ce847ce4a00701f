//! Fuzz target for the token decoder.
//!
//! Feeds arbitrary strings to both decoder policies and compiles whatever
//! decodes, checking that no input panics and that every placeholder has a
//! bound value. Decoded clauses must encode back to an equivalent token.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_token_decoder
//! ```

#![no_main]

use attrfilter_query::encode::is_encodable;
use attrfilter_query::{Decoder, ParamStyle, PredicateCompiler, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    for decoder in [Decoder::new(), Decoder::strict()] {
        let Ok(clause) = decoder.decode(token) else {
            continue;
        };

        let predicate = PredicateCompiler::new().compile(&clause, "t");
        for i in 1..=predicate.param_count() {
            assert!(predicate.sql.contains(&format!("${}", i)));
        }

        let question = PredicateCompiler::new()
            .param_style(ParamStyle::Question)
            .compile(&clause, "t");
        assert_eq!(question.params, predicate.params);

        assert!(is_encodable(&clause));
        assert_eq!(decoder.decode(&encode(&clause)).ok(), Some(clause));
    }
});
