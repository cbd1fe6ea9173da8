use knca_config::KncaConfig;
use knca_core::manager::MSG_DOCUMENT_NOT_FOUND;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::commands::ShowArgs;
use crate::output::{print_one, views::DocumentView};
use crate::report::{Halt, flush, settle};

pub async fn run(args: &ShowArgs, config: &KncaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut manager = bootstrap::manager(config)?;
    let outcome = manager.load_documents().await;
    flush(&mut manager, flags);
    settle(outcome)?;

    let Some(document) = manager.document(&args.id) else {
        eprintln!("✗ {MSG_DOCUMENT_NOT_FOUND}: {}", args.id);
        return Err(Halt::Failed(MSG_DOCUMENT_NOT_FOUND.to_string()).into());
    };
    let limit = (!args.full).then_some(config.ui.preview_length);
    print_one(&DocumentView::new(document, limit), flags.format)
}
