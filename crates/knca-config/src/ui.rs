//! Presentation settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_preview_length() -> usize {
    500
}

const fn default_notification_ttl_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Characters shown before a card is truncated.
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,

    #[serde(default = "default_notification_ttl_secs")]
    pub notification_ttl_secs: u64,

    /// Custom card template; the built-in one is used when unset.
    #[serde(default)]
    pub card_template: Option<PathBuf>,

    /// CA PEM file loaded before signing.
    #[serde(default)]
    pub ca_pem: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_length: default_preview_length(),
            notification_ttl_secs: default_notification_ttl_secs(),
            card_template: None,
            ca_pem: None,
        }
    }
}

impl UiConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ui.preview_length".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = UiConfig::default();
        assert_eq!(config.preview_length, 500);
        assert_eq!(config.notification_ttl_secs, 5);
        assert!(config.card_template.is_none());
        assert!(config.ca_pem.is_none());
    }
}
