use knca_config::KncaConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::{print_list, views::DocumentRow};
use crate::report::{flush, settle};

pub async fn run(config: &KncaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut manager = bootstrap::manager(config)?;
    let outcome = manager.load_documents().await;
    flush(&mut manager, flags);
    settle(outcome)?;

    let rows = manager
        .documents()
        .iter()
        .map(DocumentRow::from)
        .collect::<Vec<_>>();
    print_list(&rows, flags.format)
}
