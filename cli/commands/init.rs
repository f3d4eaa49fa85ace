use crate::cli_args::InitArgs;
use anyhow::{Context, Result};
use colored::*;
use log;
use snapshots_core::{SnapshotConfig, initialize_snapshot_directory};

pub fn handle_init_command(args: &InitArgs, quiet: bool) -> Result<()> {
    let project_root = SnapshotConfig::determine_project_root(args.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Initializing snapshots in {}", project_root.display());

    let report = initialize_snapshot_directory(&project_root)
        .context("Failed to initialize .snapshots directory")?;

    if quiet {
        return Ok(());
    }

    if report.created_dir {
        println!(
            "{} Created directory: {}",
            "✅".green(),
            report.snapshots_dir.display().to_string().blue()
        );
    }
    if report.created_config {
        println!(
            "{} Created default config: {}",
            "✅".green(),
            report.config_path.display().to_string().blue()
        );
    } else {
        println!(
            "{} Config already exists, left untouched: {}",
            "ℹ️".cyan(),
            report.config_path.display().to_string().blue()
        );
    }
    println!(
        "{} Wrote readme: {}",
        "✅".green(),
        report.readme_path.display().to_string().blue()
    );
    Ok(())
}
