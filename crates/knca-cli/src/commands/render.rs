use anyhow::Context;
use knca_config::KncaConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::commands::RenderArgs;
use crate::report::{flush, settle};

/// Write the document page. A failed load still renders the page, with the
/// error notification on it, before exiting non-zero.
pub async fn run(args: &RenderArgs, config: &KncaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut manager = bootstrap::manager(config)?;
    let loaded = manager.load_documents().await;

    for id in &args.expand {
        if manager.is_expanded(id) {
            continue;
        }
        if manager.toggle_content(id).is_none() {
            tracing::warn!(%id, "cannot expand unknown document");
        }
    }

    let page = manager.render_page();
    match &args.out {
        Some(path) => {
            std::fs::write(path, &page)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "page written");
        }
        None => println!("{page}"),
    }

    flush(&mut manager, flags);
    settle(loaded)?;
    Ok(())
}
