//! Node configuration.
//!
//! Built once at startup and read-only afterwards. The port is validated
//! before any listener is created, so a node never binds an out-of-range
//! port.

use std::time::Duration;

use crate::error::ConfigError;

/// Highest port number accepted.
pub const MAX_PORT: i64 = 65_535;

/// Time in-flight requests are given to finish after a shutdown signal.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(10);

const SCHEME_PREFIX: &str = "http://";

/// Address and shutdown settings for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    ip: String,
    port: String,
    grace_period: Duration,
}

impl NodeConfig {
    /// Create a configuration. `ip` may carry an `http://` prefix; `port` is
    /// validated when the node starts.
    pub fn new(ip: impl Into<String>, port: impl Into<String>) -> Self {
        Self { ip: ip.into(), port: port.into(), grace_period: DEFAULT_GRACE_PERIOD }
    }

    /// Override the drain grace period.
    #[must_use]
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// The IP as configured.
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// The port as configured.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Drain grace period.
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Validate the port and return the `ip:port` string handed to the
    /// listener.
    pub fn bind_address(&self) -> Result<String, ConfigError> {
        validate_port(&self.port)?;

        let ip = match normalize_ip(&self.ip) {
            "" => "0.0.0.0",
            ip => ip,
        };
        Ok(format!("{ip}:{}", self.port))
    }
}

/// Strip one leading `http://` from an address.
pub fn normalize_ip(ip: &str) -> &str {
    ip.strip_prefix(SCHEME_PREFIX).unwrap_or(ip)
}

/// Parse a port string and reject values above [`MAX_PORT`].
///
/// Only the upper bound is enforced. Zero binds an ephemeral port, and a
/// negative value passes here and is rejected when the listener resolves the
/// address.
pub fn validate_port(port: &str) -> Result<i64, ConfigError> {
    let value = port
        .parse::<i64>()
        .map_err(|source| ConfigError::InvalidPort { port: port.to_string(), source })?;

    if value > MAX_PORT {
        return Err(ConfigError::PortExceedsLimit { port: value });
    }
    Ok(value)
}
