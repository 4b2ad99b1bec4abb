//! Wire-level types for the Lockey lock service.
//!
//! Every lock operation is attributed to a three-tier identity:
//!
//! ```text
//! SessionID  ── authenticates the logical session
//!   └─ ClientID   ── the client instance that opened it
//!        └─ ProcessID  ── the process issuing the current request
//! ```
//!
//! This crate only defines the shapes. Validation and matching live in
//! `lockey-core::auth`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod id;
pub mod payloads;
pub mod session;

pub use id::Id;
pub use payloads::{
    ErrorBody, ErrorCode, LockRequest, LockStatus, OpenSessionRequest, SessionClosed,
};
pub use session::{IdentityField, Session, SessionDescriptor, SessionToken};
