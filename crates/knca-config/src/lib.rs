//! # knca-config
//!
//! Layered configuration loading for the KNCA signer using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KNCA_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `.knca/config.toml`
//! 4. User-level `~/.config/knca/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `KNCA_BACKEND__URL` -> `backend.url`, `KNCA_NCALAYER__LOCALE` ->
//! `ncalayer.locale`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use knca_config::KncaConfig;
//!
//! let config = KncaConfig::load_with_dotenv(None).expect("config");
//! println!("backend: {}", config.backend.url);
//! ```

mod backend;
mod error;
mod ncalayer;
mod server;
mod ui;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use ncalayer::NcaLayerConfig;
pub use server::ServerConfig;
pub use ui::UiConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KncaConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ncalayer: NcaLayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl KncaConfig {
    /// Load configuration from all sources and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed or
    /// [`ConfigError::InvalidValue`] if a value fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".knca/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("KNCA_").split("__"))
    }

    /// Check values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.ncalayer.validate()?;
        self.ui.validate()?;
        self.server.bind_addr()?;
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("knca").join("config.toml"))
    }
}
