//! Lockey node.
//!
//! This crate turns a [`LockService`](lockey_core::LockService) into a
//! network-facing node:
//!
//! ```text
//! lockey-server
//!   ├─ NodeConfig     (IP normalization, port validation)
//!   ├─ routing        (HTTP routes → LockService)
//!   ├─ Node           (bind, serve, drain)
//!   ├─ shutdown       (signal watcher, bounded drain)
//!   └─ SystemEnv      (production Environment impl)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod error;
mod node;
pub mod routing;
pub mod shutdown;
mod system_env;

pub use config::{DEFAULT_GRACE_PERIOD, MAX_PORT, NodeConfig, normalize_ip, validate_port};
pub use error::{ConfigError, NodeError};
pub use node::{Node, start};
pub use routing::setup_routing;
pub use shutdown::{DrainOutcome, ShutdownReport, ShutdownSignal};
pub use system_env::SystemEnv;
