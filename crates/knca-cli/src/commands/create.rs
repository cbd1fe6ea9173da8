use anyhow::Context;
use knca_config::KncaConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::commands::CreateArgs;
use crate::output::{print_one, views::DocumentView};
use crate::report::{flush, settle};

pub async fn run(args: &CreateArgs, config: &KncaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let content = match (&args.content, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --content or --file is required"),
    };

    let mut manager = bootstrap::manager(config)?;
    let outcome = manager.create_document(&content).await;
    flush(&mut manager, flags);
    let document = settle(outcome)?;

    print_one(
        &DocumentView::new(&document, Some(config.ui.preview_length)),
        flags.format,
    )
}
