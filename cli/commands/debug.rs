use crate::cli_args::DebugArgs;
use crate::load_config_for_command;
use crate::output::{self, DecisionRow, print_data_or_text, print_decision_table};
use anyhow::{Context, Result};
use colored::*;
use log;
use pathdiff;
use serde::Serialize;
use snapshots_core::{self as core, PathVerdict, SnapshotConfig};
use std::path::Path;

#[derive(Debug, Serialize)]
struct DebugInfo<'a> {
    project_root: String,
    effective_config: &'a SnapshotConfig,
    strategy: &'static str,
    files: Vec<FileDecision>,
    skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FileDecision {
    path: String,
    #[serde(flatten)]
    verdict: PathVerdict,
}

pub fn handle_debug_command(args: DebugArgs, quiet: bool) -> Result<()> {
    let project_root =
        SnapshotConfig::determine_project_root(args.project_config.project_root.as_ref())
            .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration for debug command")?;

    let strategy = core::build_strategy(&project_root, &config)?;
    let explanation = core::explain(&project_root, strategy.as_ref())
        .context("Failed to classify project files")?;
    log::debug!("Debug: classified {} files", explanation.decisions.len());

    let files: Vec<FileDecision> = explanation
        .decisions
        .into_iter()
        .filter(|(_, verdict)| !args.selected_only || verdict.selected)
        .map(|(path, verdict)| FileDecision {
            path: relative_path(&path, &project_root),
            verdict,
        })
        .collect();

    let debug_data = DebugInfo {
        project_root: project_root.display().to_string(),
        effective_config: &config,
        strategy: strategy.name(),
        files,
        skipped: explanation.warnings,
    };

    if args.format_output.format.as_deref() == Some("json") {
        print_data_or_text(&debug_data, None, &args.format_output)
    } else {
        print_debug_info_pretty(&debug_data, quiet)
    }
}

fn relative_path(path: &str, project_root: &Path) -> String {
    pathdiff::diff_paths(path, project_root)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn print_debug_info_pretty(debug_info: &DebugInfo, quiet: bool) -> Result<()> {
    println!(
        "{}",
        "\n--- Effective Configuration ---"
            .green()
            .bold()
            .underline()
    );
    let config_json = debug_info
        .effective_config
        .to_json_pretty()
        .context("Failed to serialize effective config")?;
    println!("{}", config_json);
    println!(
        "{} {}",
        "Enumeration:".bold(),
        debug_info.strategy.cyan()
    );

    println!(
        "{}",
        "\n--- File Decisions ---".green().bold().underline()
    );
    let rows: Vec<DecisionRow> = debug_info
        .files
        .iter()
        .map(|file| DecisionRow {
            path: &file.path,
            excluded: file.verdict.excluded_by_pattern,
            included: file.verdict.included_by_pattern,
            in_excluded_dir: file.verdict.in_excluded_directory,
            selected: file.verdict.selected,
        })
        .collect();
    print_decision_table(&rows);
    output::print_warnings(&debug_info.skipped, quiet);

    if !quiet {
        let selected = debug_info.files.iter().filter(|f| f.verdict.selected).count();
        println!(
            "\n{} of {} files selected.",
            selected.to_string().cyan(),
            debug_info.files.len()
        );
    }
    println!("{}", "\n--- End Debug Info ---".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_shown_relative_to_root() {
        assert_eq!(relative_path("/proj/src/a.rs", Path::new("/proj")), "src/a.rs");
    }
}
