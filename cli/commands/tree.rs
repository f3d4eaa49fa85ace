use crate::cli_args::TreeArgs;
use crate::load_config_for_command;
use crate::output::{self, print_data_or_text};
use anyhow::{Context, Result};
use log;
use snapshots_core::{self as core, SnapshotConfig};

pub fn handle_tree_command(args: TreeArgs, quiet: bool) -> Result<()> {
    let project_root =
        SnapshotConfig::determine_project_root(args.project_config.project_root.as_ref())
            .context("Failed to determine project root")?;

    let config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration for tree command")?;

    let strategy = core::build_strategy(&project_root, &config)?;
    let enumeration = core::enumerate(&project_root, strategy.as_ref())
        .context("Failed to enumerate project files")?;
    output::print_warnings(&enumeration.warnings, quiet);

    let tree = core::build_tree(&project_root, &enumeration.files)
        .context("Failed to build project structure")?;
    log::debug!("Tree built with {} top-level entries", tree.children().len());

    print_data_or_text(
        &tree.finalize(),
        Some(core::render(&tree)),
        &args.format_output,
    )
}
