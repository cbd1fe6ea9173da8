use knca_config::KncaConfig;
use knca_core::manager::MSG_AGENT_UNAVAILABLE;
use knca_ncalayer::NcaLayerClient;

use crate::bootstrap::{self, Manager};
use crate::cli::GlobalFlags;
use crate::cli::commands::SignArgs;
use crate::output::{print_one, views::SignReport};
use crate::progress::Spinner;
use crate::report::{Halt, flush, settle};

pub async fn run(args: &SignArgs, config: &KncaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut manager = bootstrap::manager(config)?;
    let signed = sign(&mut manager, args, config, flags).await;

    if let Some(agent) = manager.disconnect_agent() {
        if let Err(error) = agent.close().await {
            tracing::warn!(%error, "failed to close the NCALayer connection");
        }
    }

    print_one(&signed?, flags.format)
}

async fn sign(
    manager: &mut Manager,
    args: &SignArgs,
    config: &KncaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<SignReport> {
    let loaded = {
        let _spinner = Spinner::start("Connecting to NCALayer...");
        manager.init(NcaLayerClient::connect(&config.ncalayer)).await
    };
    flush(manager, flags);
    settle(loaded)?;
    if !manager.is_agent_connected() {
        return Err(Halt::Failed(MSG_AGENT_UNAVAILABLE.to_string()).into());
    }

    let ca_pem = args.ca_pem.as_deref().or(config.ui.ca_pem.as_deref());
    if ca_pem.is_some() {
        let loaded = manager.load_ca_pem(ca_pem);
        flush(manager, flags);
        settle(loaded)?;
    }

    let signed = {
        let _spinner = Spinner::start("Waiting for NCALayer: choose a key and enter its password");
        manager.sign_document(&args.id).await
    };
    flush(manager, flags);
    let signature = settle(signed)?;

    Ok(SignReport {
        id: args.id.clone(),
        signature,
    })
}
