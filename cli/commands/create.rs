use crate::cli_args::CreateArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use log;
use std::env;
use std::path::{Path, PathBuf};
use snapshots_core::{
    self as core, FileSelection, SnapshotConfig, SnapshotRequest, gather::path_string,
};

pub fn handle_create_command(args: CreateArgs, quiet: bool) -> Result<()> {
    let project_root =
        SnapshotConfig::determine_project_root(args.project_config.project_root.as_ref())
            .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration")?;

    let cwd = env::current_dir().context("Failed to read current directory")?;
    let request = build_request(&args, &config, &cwd);
    log::debug!(
        "Snapshot request: structure={}, selection={:?}",
        request.include_structure,
        request.selection
    );

    if let FileSelection::Explicit(paths) = &request.selection {
        if paths.is_empty() && !quiet {
            eprintln!(
                "{} No files selected. Pass FILES or use --all.",
                "⚠️".yellow()
            );
        }
    }

    let snapshot = core::create_snapshot(&project_root, &config, &request)
        .context("Failed to create snapshot")?;
    output::print_warnings(&snapshot.warnings, quiet);
    log::info!("Snapshot embeds {} files", snapshot.files.len());

    let target = output_target(&args, &project_root);
    output::print_snapshot_or_save(&snapshot.markdown, target.as_deref(), quiet)
}

fn build_request(args: &CreateArgs, config: &SnapshotConfig, cwd: &Path) -> SnapshotRequest {
    let defaults = &config.default;

    let prompt = args
        .prompt
        .clone()
        .unwrap_or_else(|| defaults.default_prompt.clone());

    let include_structure = if args.structure {
        true
    } else if args.no_structure {
        false
    } else {
        defaults.default_include_entire_project_structure
    };

    let all_files = if args.all {
        true
    } else if args.selected || !args.files.is_empty() {
        false
    } else {
        defaults.default_include_all_files
    };

    let selection = if all_files {
        FileSelection::All
    } else {
        FileSelection::Explicit(
            args.files
                .iter()
                .map(|file| resolve_against(cwd, file))
                .collect(),
        )
    };

    SnapshotRequest {
        prompt,
        include_structure,
        selection,
    }
}

// Absolute path for a user-supplied file; falls back to the joined path when
// it cannot be canonicalized so the snapshot reports the read error inline.
fn resolve_against(cwd: &Path, file: &Path) -> String {
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        cwd.join(file)
    };
    let resolved = joined.canonicalize().unwrap_or(joined);
    path_string(&resolved)
}

fn output_target(args: &CreateArgs, project_root: &Path) -> Option<PathBuf> {
    if args.stdout {
        return None;
    }
    match &args.output {
        Some(path) => Some(path.clone()),
        None => {
            let name = core::snapshot_file_name(Local::now().naive_local());
            Some(SnapshotConfig::snapshots_dir(project_root).join(name))
        }
    }
}
