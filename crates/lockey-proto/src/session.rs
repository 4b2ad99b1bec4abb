//! The session capability.
//!
//! A [`Session`] binds the three identities every lock request must present.
//! It is a read-only view: nothing exposes a setter, and consumers hold a
//! session only for the duration of one request.
//!
//! Two representations satisfy the contract:
//!
//! - [`SessionDescriptor`]: the in-memory record issued when a session is
//!   opened, and what the registry stores as the expected triple.
//! - [`SessionToken`]: a session rebuilt from wire material (request
//!   headers). Missing parts become empty IDs so that validation rejects them.
//!
//! # Security
//!
//! The interface does not validate anything. Consumers MUST reject a session
//! where any accessor returns an empty ID, and MUST compare all three IDs
//! against the expected triple. See `lockey_core::auth`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Id;

/// Three-tier identity presented with every lock operation.
pub trait Session: Send + Sync {
    /// Unique ID of this session. Checked on every transaction.
    fn session_id(&self) -> &Id;

    /// ID of the client instance that established the session. Second layer
    /// of the check.
    fn client_id(&self) -> &Id;

    /// ID the client assigned to the process issuing the request. Third layer
    /// of the check.
    fn process_id(&self) -> &Id;
}

/// Names one tier of the identity chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// The session tier.
    SessionId,
    /// The client tier.
    ClientId,
    /// The process tier.
    ProcessId,
}

impl IdentityField {
    /// All tiers in check order.
    pub const ALL: [Self; 3] = [Self::SessionId, Self::ClientId, Self::ProcessId];

    /// Read this tier from a session.
    pub fn get(self, session: &(impl Session + ?Sized)) -> &Id {
        match self {
            Self::SessionId => session.session_id(),
            Self::ClientId => session.client_id(),
            Self::ProcessId => session.process_id(),
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SessionId => "session id",
            Self::ClientId => "client id",
            Self::ProcessId => "process id",
        })
    }
}

/// In-memory session.
///
/// Issued by the registry when a client opens a session and returned to the
/// client as JSON.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionDescriptor {
    session_id: Id,
    client_id: Id,
    process_id: Id,
}

impl SessionDescriptor {
    /// Bind three identities into a session.
    pub fn new(
        session_id: impl Into<Id>,
        client_id: impl Into<Id>,
        process_id: impl Into<Id>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            client_id: client_id.into(),
            process_id: process_id.into(),
        }
    }

    /// Copy any session representation into an owned descriptor.
    pub fn from_session(session: &(impl Session + ?Sized)) -> Self {
        Self::new(
            session.session_id().clone(),
            session.client_id().clone(),
            session.process_id().clone(),
        )
    }
}

impl Session for SessionDescriptor {
    fn session_id(&self) -> &Id {
        &self.session_id
    }

    fn client_id(&self) -> &Id {
        &self.client_id
    }

    fn process_id(&self) -> &Id {
        &self.process_id
    }
}

impl fmt::Debug for SessionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionDescriptor")
            .field("session_id", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("process_id", &self.process_id)
            .finish()
    }
}

/// Session reconstructed from wire material.
///
/// Absent parts are stored as empty IDs; construction never fails.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    session_id: Id,
    client_id: Id,
    process_id: Id,
}

impl SessionToken {
    /// Rebuild a session from the three transported values.
    pub fn from_parts(
        session_id: Option<&str>,
        client_id: Option<&str>,
        process_id: Option<&str>,
    ) -> Self {
        let part = |value: Option<&str>| value.map(str::trim).map_or_else(Id::empty, Id::from);
        Self {
            session_id: part(session_id),
            client_id: part(client_id),
            process_id: part(process_id),
        }
    }

    /// Returns true if every part was present on the wire.
    pub fn is_complete(&self) -> bool {
        IdentityField::ALL.iter().all(|field| !field.get(self).is_empty())
    }
}

impl Session for SessionToken {
    fn session_id(&self) -> &Id {
        &self.session_id
    }

    fn client_id(&self) -> &Id {
        &self.client_id
    }

    fn process_id(&self) -> &Id {
        &self.process_id
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = if self.session_id.is_empty() { "<missing>" } else { "<redacted>" };
        f.debug_struct("SessionToken")
            .field("session_id", &redacted)
            .field("client_id", &self.client_id)
            .field("process_id", &self.process_id)
            .finish()
    }
}
