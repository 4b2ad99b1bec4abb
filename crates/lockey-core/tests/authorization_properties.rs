//! Property tests for the three-tier identity check.

use lockey_core::{AuthError, authorize};
use lockey_proto::{IdentityField, SessionDescriptor};
use proptest::prelude::*;

fn id() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,4}"
}

proptest! {
    /// Authorization succeeds iff all three tiers are equal.
    #[test]
    fn prop_authorized_iff_all_tiers_match(
        presented in (id(), id(), id()),
        expected in (id(), id(), id()),
    ) {
        let p =
            SessionDescriptor::new(presented.0.clone(), presented.1.clone(), presented.2.clone());
        let e = SessionDescriptor::new(expected.0.clone(), expected.1.clone(), expected.2.clone());

        let all_match = presented == expected;
        prop_assert_eq!(authorize(&p, &e).is_ok(), all_match);
    }

    /// Changing any single tier is enough to be rejected, and the error names
    /// that tier.
    #[test]
    fn prop_single_field_mismatch_is_rejected(
        triple in (id(), id(), id()),
        tier in 0usize..3,
    ) {
        let (s, c, p) = triple;
        let expected = SessionDescriptor::new(s.clone(), c.clone(), p.clone());
        let mut parts = [s, c, p];
        parts[tier].push('x');
        let [s2, c2, p2] = parts;
        let presented = SessionDescriptor::new(s2, c2, p2);

        prop_assert_eq!(
            authorize(&presented, &expected),
            Err(AuthError::IdentityMismatch { field: IdentityField::ALL[tier] })
        );
    }

    /// A session with an empty tier never authorizes, whatever it is compared
    /// against.
    #[test]
    fn prop_empty_tier_never_authorizes(
        triple in (id(), id(), id()),
        tier in 0usize..3,
    ) {
        let (s, c, p) = triple;
        let mut parts = [s, c, p];
        parts[tier].clear();
        let [s, c, p] = parts;
        let session = SessionDescriptor::new(s, c, p);

        prop_assert_eq!(
            authorize(&session, &session),
            Err(AuthError::EmptyIdentity { field: IdentityField::ALL[tier] })
        );
    }
}
