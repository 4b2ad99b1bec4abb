//! Fuzz target for the three-tier session check
//!
//! Prevent partial identity matches from authorizing.
//!
//! # Invariants
//!
//! - `authorize` succeeds iff no presented tier is empty AND all three tiers
//!   equal the expected triple
//! - Tokens rebuilt from wire parts behave exactly like descriptors
//! - NEVER panic on arbitrary header values

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lockey_core::{authorize, validate};
use lockey_proto::{SessionDescriptor, SessionToken};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    presented: [Option<String>; 3],
    expected: [String; 3],
}

fuzz_target!(|input: FuzzInput| {
    let [s, c, p] = &input.presented;
    let token = SessionToken::from_parts(s.as_deref(), c.as_deref(), p.as_deref());
    let descriptor = SessionDescriptor::from_session(&token);

    let [es, ec, ep] = &input.expected;
    let expected = SessionDescriptor::new(es.as_str(), ec.as_str(), ep.as_str());

    let result = authorize(&token, &expected);
    assert_eq!(result, authorize(&descriptor, &expected));

    let complete = token.is_complete();
    assert_eq!(validate(&token).is_ok(), complete);

    let all_match = descriptor == expected;
    assert_eq!(result.is_ok(), complete && all_match);
});
