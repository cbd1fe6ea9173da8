//! NCALayer agent settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_url() -> String {
    String::from("wss://127.0.0.1:13579")
}

fn default_locale() -> String {
    String::from("ru")
}

fn default_ext_key_usage_oids() -> Vec<String> {
    vec![String::from("1.3.6.1.5.5.7.3.4")]
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

/// Signing waits for a human to pick a key and type a password.
const fn default_sign_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NcaLayerConfig {
    /// WebSocket endpoint of the local agent.
    #[serde(default = "default_url")]
    pub url: String,

    /// UI locale passed with every request (`ru`, `kk`, `en`).
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Extended key usage OIDs a signing certificate must carry.
    #[serde(default = "default_ext_key_usage_oids")]
    pub ext_key_usage_oids: Vec<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_sign_timeout_secs")]
    pub sign_timeout_secs: u64,

    /// Skip TLS certificate checks for `wss://` (agent certificate not trusted
    /// by the system store).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for NcaLayerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            locale: default_locale(),
            ext_key_usage_oids: default_ext_key_usage_oids(),
            connect_timeout_secs: default_connect_timeout_secs(),
            sign_timeout_secs: default_sign_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

impl NcaLayerConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue {
                field: "ncalayer.url".into(),
                reason: format!("expected a ws(s) URL, got '{}'", self.url),
            });
        }
        for (field, secs) in [
            ("ncalayer.connect_timeout_secs", self.connect_timeout_secs),
            ("ncalayer.sign_timeout_secs", self.sign_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }
}
