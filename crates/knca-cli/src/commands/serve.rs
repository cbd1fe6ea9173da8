use knca_config::KncaConfig;

use crate::cli::commands::ServeArgs;

pub async fn run(args: &ServeArgs, mut config: KncaConfig) -> anyhow::Result<()> {
    if let Some(bind) = &args.bind {
        config.server.bind.clone_from(bind);
    }
    if args.no_samples {
        config.server.seed_samples = false;
    }
    knca_server::run(&config.server).await?;
    Ok(())
}
