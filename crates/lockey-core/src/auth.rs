//! Three-tier authorization.
//!
//! A lock operation is authorized only if the presented session carries
//! three non-empty IDs AND all three equal the triple recorded for the target
//! (the lock owner, or the registry entry). A single matching tier grants
//! nothing.
//!
//! Every failure is of the `Unauthorized` kind. Failures are local to one
//! request: they are reported to that caller and never escalate.

use lockey_proto::{Id, IdentityField, Session};
use thiserror::Error;

/// Why a session was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// One tier of the presented session is empty.
    #[error("unauthorized: {field} is empty")]
    EmptyIdentity {
        /// First empty tier, in session/client/process order.
        field: IdentityField,
    },

    /// A tier does not match the expected triple.
    #[error("unauthorized: {field} does not match")]
    IdentityMismatch {
        /// First mismatching tier, in session/client/process order.
        field: IdentityField,
    },

    /// The session ID is not known to the registry.
    #[error("unauthorized: unknown session {session_id}")]
    UnknownSession {
        /// The presented session ID.
        session_id: Id,
    },
}

/// Reject a session with any empty tier.
pub fn validate(session: &(impl Session + ?Sized)) -> Result<(), AuthError> {
    match IdentityField::ALL.into_iter().find(|field| field.get(session).is_empty()) {
        Some(field) => Err(AuthError::EmptyIdentity { field }),
        None => Ok(()),
    }
}

/// Validate `presented`, then require all three tiers to equal `expected`.
pub fn authorize(
    presented: &(impl Session + ?Sized),
    expected: &(impl Session + ?Sized),
) -> Result<(), AuthError> {
    validate(presented)?;

    match IdentityField::ALL.into_iter().find(|field| field.get(presented) != field.get(expected)) {
        Some(field) => Err(AuthError::IdentityMismatch { field }),
        None => Ok(()),
    }
}
