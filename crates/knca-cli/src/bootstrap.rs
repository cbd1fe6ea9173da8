use std::time::Duration;

use anyhow::Context;
use knca_client::BackendClient;
use knca_config::KncaConfig;
use knca_core::{CardTemplate, DocumentManager, ManagerSettings};
use knca_ncalayer::NcaLayerClient;

use crate::cli::GlobalFlags;

pub type Manager = DocumentManager<BackendClient, NcaLayerClient>;

/// Load `.env` and the layered configuration, then apply flag overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<KncaConfig> {
    let mut config = KncaConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(url) = &flags.backend {
        config.backend.url.clone_from(url);
        config.validate().context("invalid --backend")?;
    }
    tracing::debug!(backend = %config.backend.url, ncalayer = %config.ncalayer.url, "configuration loaded");
    Ok(config)
}

pub fn manager_settings(config: &KncaConfig) -> anyhow::Result<ManagerSettings> {
    let template = match &config.ui.card_template {
        Some(path) => CardTemplate::from_file(path)
            .with_context(|| format!("failed to load card template {}", path.display()))?,
        None => CardTemplate::default(),
    };
    Ok(ManagerSettings {
        ext_key_usage_oids: config.ncalayer.ext_key_usage_oids.clone(),
        locale: config.ncalayer.locale.clone(),
        preview_length: config.ui.preview_length,
        notification_ttl: Duration::from_secs(config.ui.notification_ttl_secs),
        template,
    })
}

/// A controller wired to the configured backend. The agent is connected
/// on demand.
pub fn manager(config: &KncaConfig) -> anyhow::Result<Manager> {
    let backend = BackendClient::new(&config.backend).context("failed to build backend client")?;
    Ok(DocumentManager::new(backend, manager_settings(config)?))
}
