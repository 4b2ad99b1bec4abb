//! Node error types.

use std::{io, num::ParseIntError};

use thiserror::Error;

/// Invalid node configuration. Detected before any socket is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The port is not a decimal integer.
    #[error("invalid port {port:?}: {source}")]
    InvalidPort {
        /// The rejected value.
        port: String,
        /// The parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The port is above 65535.
    #[error("port number {port} exceeds limit of 65535")]
    PortExceedsLimit {
        /// The rejected value.
        port: i64,
    },
}

/// Errors that stop a node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address handed to the listener.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The listener stopped for a reason other than shutdown.
    #[error("listener failed: {0}")]
    Serve(#[source] io::Error),
}
