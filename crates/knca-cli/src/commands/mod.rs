use knca_config::KncaConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod create;
pub mod list;
pub mod render;
pub mod serve;
pub mod show;
pub mod sign;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: KncaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::List => list::run(&config, flags).await,
        Commands::Show(args) => show::run(&args, &config, flags).await,
        Commands::Create(args) => create::run(&args, &config, flags).await,
        Commands::Sign(args) => sign::run(&args, &config, flags).await,
        Commands::Render(args) => render::run(&args, &config, flags).await,
        Commands::Serve(args) => serve::run(&args, config).await,
    }
}
