use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod global;

pub use commands::Commands;
pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `knca` binary.
#[derive(Debug, Parser)]
#[command(
    name = "knca",
    version,
    about = "KNCA signer - list, create, and sign documents through NCALayer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging and the activity log)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file layered over the project config
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides `backend.url`
    #[arg(long, global = true)]
    pub backend: Option<String>,
}

impl Cli {
    /// Extract the global flags for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
            backend: self.backend.clone(),
        }
    }
}
