use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod progress;
mod report;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        // Halts were already reported as notifications.
        if let Some(halt) = error.downcast_ref::<report::Halt>() {
            std::process::exit(halt.exit_code());
        }
        eprintln!("knca error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = bootstrap::load_config(&flags)?;
    commands::dispatch(cli.command, config, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        // The activity log is printed separately at --verbose.
        "debug,knca::activity=off"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("KNCA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
