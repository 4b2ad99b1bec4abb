//! Lockey core: who may act on a lock, and the lock table itself.
//!
//! ```text
//! lockey-core
//!   ├─ auth           (three-tier identity checks)
//!   ├─ env            (time + randomness abstraction)
//!   ├─ registry       (expected triple per session)
//!   └─ lock_service   (LockService trait, SimpleLockService)
//! ```
//!
//! Nothing here performs I/O. The server crate supplies the production
//! [`env::Environment`] and drives the service from HTTP handlers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod env;
pub mod lock_service;
pub mod registry;

pub use auth::{AuthError, authorize, validate};
pub use env::Environment;
pub use lock_service::{LockError, LockService, SimpleLockService};
pub use registry::SessionRegistry;
