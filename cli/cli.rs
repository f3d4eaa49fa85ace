mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands, ProjectConfigOpts};
use snapshots_core::{AppError, EnumerationMode, SnapshotConfig};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::Config(_)) => 1,
                Some(AppError::JsonParse(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::WalkDir(_)) => 2,
                Some(AppError::Tree(_)) => 3,
                Some(AppError::Pattern(_)) => 5,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(_) => 1,
                None => 1,
            };

            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Create(args) => {
                log::debug!("Executing 'create' command...");
                commands::create::handle_create_command(args, quiet)?;
            }
            Commands::Init(args) => {
                log::debug!("Executing 'init' command...");
                commands::init::handle_init_command(&args, quiet)?;
            }
            Commands::Tree(args) => {
                log::debug!("Executing 'tree' command...");
                commands::tree::handle_tree_command(args, quiet)?;
            }
            Commands::Debug(args) => {
                log::debug!("Executing 'debug' command...");
                commands::debug::handle_debug_command(args, quiet)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args, quiet)?;
            }
        },
    }
    Ok(())
}

fn merge_config_with_cli_overrides(
    mut config: SnapshotConfig,
    opts: &ProjectConfigOpts,
) -> SnapshotConfig {
    log::trace!("Applying CLI pattern overrides to config...");

    if !opts.exclude.is_empty() {
        config.excluded_patterns.extend(opts.exclude.iter().cloned());
    }
    if !opts.include.is_empty() {
        config.included_patterns.extend(opts.include.iter().cloned());
    }
    if opts.legacy {
        config.enumeration_mode = EnumerationMode::Legacy;
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

// A missing config is fatal: no snapshot is produced without one.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
) -> Result<SnapshotConfig> {
    let config_path =
        SnapshotConfig::resolve_config_path(project_root, project_opts.config_file.as_ref());

    let config = SnapshotConfig::load_from_path(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    Ok(merge_config_with_cli_overrides(config, project_opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_append_patterns_and_switch_mode() {
        let opts = ProjectConfigOpts {
            exclude: vec!["vendor".to_string()],
            include: vec!["go.mod".to_string()],
            legacy: true,
            ..ProjectConfigOpts::default()
        };
        let base = SnapshotConfig::default();
        let excluded_before = base.excluded_patterns.len();
        let merged = merge_config_with_cli_overrides(base, &opts);
        assert_eq!(merged.excluded_patterns.len(), excluded_before + 1);
        assert_eq!(merged.excluded_patterns.last().map(String::as_str), Some("vendor"));
        assert_eq!(merged.included_patterns.last().map(String::as_str), Some("go.mod"));
        assert_eq!(merged.enumeration_mode, EnumerationMode::Legacy);
    }

    #[test]
    fn create_args_parse() {
        let cli = Cli::try_parse_from([
            "snapshots",
            "create",
            "-p",
            "Explain",
            "--no-structure",
            "src/main.rs",
            "--stdout",
        ])
        .unwrap();
        let Some(Commands::Create(args)) = cli.command else {
            panic!("expected create command");
        };
        assert_eq!(args.prompt.as_deref(), Some("Explain"));
        assert!(args.no_structure);
        assert!(!args.structure);
        assert!(args.stdout);
        assert_eq!(args.files.len(), 1);
    }

    #[test]
    fn stdout_conflicts_with_output() {
        let result =
            Cli::try_parse_from(["snapshots", "create", "--stdout", "-o", "out.md"]);
        assert!(result.is_err());
    }

    #[test]
    fn all_conflicts_with_explicit_files() {
        let result = Cli::try_parse_from(["snapshots", "create", "--all", "src/main.rs"]);
        assert!(result.is_err());
        assert!(Cli::try_parse_from(["snapshots", "create", "--all"]).is_ok());
    }
}
