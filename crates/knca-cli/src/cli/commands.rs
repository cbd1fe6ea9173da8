use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List documents stored on the backend.
    List,
    /// Show one document.
    Show(ShowArgs),
    /// Create a plaintext document.
    Create(CreateArgs),
    /// Sign a document with NCALayer and upload the signature.
    Sign(SignArgs),
    /// Render the document list as an HTML page.
    Render(RenderArgs),
    /// Run the in-memory reference backend.
    Serve(ServeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Document id (e.g. doc-1).
    pub id: String,

    /// Print the whole content instead of the preview.
    #[arg(long)]
    pub full: bool,
}

#[derive(Clone, Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["content", "file"])))]
pub struct CreateArgs {
    /// Document text.
    #[arg(long)]
    pub content: Option<String>,

    /// Read the document text from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SignArgs {
    /// Document id (e.g. doc-1).
    pub id: String,

    /// PEM file with comma-separated CA certificates for the signer chain.
    #[arg(long)]
    pub ca_pem: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    /// Write the page to a file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Show the full content of these documents.
    #[arg(long, value_name = "ID")]
    pub expand: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overrides `server.bind`.
    #[arg(long)]
    pub bind: Option<String>,

    /// Start with an empty store.
    #[arg(long)]
    pub no_samples: bool,
}
