//! Reference backend settings.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_bind() -> String {
    String::from("127.0.0.1:8080")
}

const fn default_seed_samples() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Start with the three sample XML documents.
    #[serde(default = "default_seed_samples")]
    pub seed_samples: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            seed_samples: default_seed_samples(),
        }
    }
}

impl ServerConfig {
    /// Parse the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `bind` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|e| ConfigError::InvalidValue {
            field: "server.bind".into(),
            reason: format!("{e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_parses() {
        let addr = ServerConfig::default().bind_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let config = ServerConfig {
            bind: "localhost".into(),
            seed_samples: true,
        };
        assert!(config.bind_addr().is_err());
    }
}
