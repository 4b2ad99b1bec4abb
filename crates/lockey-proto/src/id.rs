//! Opaque identifiers.
//!
//! An [`Id`] names a session, a client instance or a process. Two IDs are
//! equal iff they name the same entity; nothing else about the contents is
//! assumed. IDs are issued outside this crate (by the session registry or by
//! the client itself) and are immutable once created.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, comparable identifier.
///
/// The empty ID is representable so that sessions rebuilt from incomplete
/// wire material can still be constructed and then rejected by the
/// authorization layer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Create an ID from any string-like seed.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The empty (invalid) ID.
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns true if this ID carries no value and must not be trusted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw value for transport.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:?})", self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}
