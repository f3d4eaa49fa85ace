use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the target project directory (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify the JSON config file (default: .snapshots/config.json).",
        value_name = "CONFIG_FILE",
        help_heading = "Project Setup"
    )]
    pub config_file: Option<String>,

    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append, help = "Add an exclude pattern on top of the configured ones.", help_heading = "Pattern Overrides")]
    pub exclude: Vec<String>,

    #[arg(long = "include", value_name = "PATTERN", action = clap::ArgAction::Append, help = "Add an include pattern on top of the configured ones.", help_heading = "Pattern Overrides")]
    pub include: Vec<String>,

    #[arg(
        long,
        help = "Use the legacy exclude-only enumeration (ignores include patterns).",
        help_heading = "Pattern Overrides"
    )]
    pub legacy: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["text", "json"], help_heading = "Output Formatting")]
    pub format: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "snapshots",
    author,
    version,
    about = "Bundle a prompt, project structure and file contents into a Markdown snapshot for AI chats.",
    long_about = "snapshots selects project files using the include/exclude patterns in .snapshots/config.json, \nrenders the project structure as an outline, and writes a single Markdown document \ncontaining your prompt and the selected files.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  snapshots init\n  snapshots create -p \"Explain this\" src/main.rs\n  snapshots create --all --structure --stdout\n  snapshots debug",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        visible_alias = "snap",
        about = "Create a Markdown snapshot."
    )]
    Create(CreateArgs),

    #[command(about = "Create the .snapshots directory with a default config and readme.")]
    Init(InitArgs),

    #[command(visible_alias = "t", about = "Print the project structure outline.")]
    Tree(TreeArgs),

    #[command(
        visible_alias = "d",
        about = "Show effective configuration and the per-file selection decisions."
    )]
    Debug(DebugArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        short = 'p',
        long,
        value_name = "TEXT",
        help = "Prompt placed at the top of the snapshot (default: config default_prompt).",
        help_heading = "Snapshot Content"
    )]
    pub prompt: Option<String>,

    #[arg(
        long,
        help = "Include the project structure outline.",
        overrides_with = "no_structure",
        help_heading = "Snapshot Content"
    )]
    pub structure: bool,

    #[arg(
        long,
        help = "Omit the project structure outline.",
        overrides_with = "structure",
        help_heading = "Snapshot Content"
    )]
    pub no_structure: bool,

    #[arg(
        short = 'a',
        long,
        help = "Embed every applicable project file instead of FILES.",
        overrides_with = "selected",
        conflicts_with = "files",
        help_heading = "Snapshot Content"
    )]
    pub all: bool,

    #[arg(
        long,
        help = "Embed only FILES even if the config defaults to all files.",
        overrides_with = "all",
        help_heading = "Snapshot Content"
    )]
    pub selected: bool,

    #[arg(value_name = "FILES", help = "Files to embed (relative to the current directory or absolute).")]
    pub files: Vec<PathBuf>,

    #[arg(
        long,
        help = "Print the snapshot to standard output instead of saving it.",
        help_heading = "Output Control",
        conflicts_with = "output"
    )]
    pub stdout: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        help = "Write the snapshot to PATH instead of .snapshots/snapshot-<timestamp>.md.",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        long,
        help = "Specify the target project directory (default: current dir).",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct DebugArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(long, help = "List only files that end up in the snapshot.")]
    pub selected_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to default location (prompts overwrite)."
    )]
    pub save: bool,
}
