//! JSON bodies exchanged with a node.
//!
//! Session identities travel in headers, not in these bodies, so a payload
//! can never be mistaken for proof of identity.

use serde::{Deserialize, Serialize};

use crate::Id;

/// Request to open a session for a client process.
///
/// The client supplies its own client and process IDs; the node issues the
/// session ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    /// ID of the client instance.
    pub client_id: Id,
    /// ID of the process within that client.
    pub process_id: Id,
}

/// Names the resource a lock operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRequest {
    /// Name of the lockable resource.
    pub resource: String,
}

/// Result of a lock operation or check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    /// Name of the resource.
    pub resource: String,
    /// Whether the resource is held after the operation.
    pub held: bool,
}

/// Reply to closing a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClosed {
    /// The session that was closed.
    pub session_id: Id,
    /// Number of locks released along with it.
    pub released: usize,
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The presented session failed the identity check.
    Unauthorized,
    /// The lock is not in a state that allows the operation.
    Conflict,
    /// The request itself is malformed.
    BadRequest,
}

/// Error reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error category.
    pub code: ErrorCode,
    /// Human-readable detail.
    pub message: String,
}
