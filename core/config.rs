use crate::error::{AppError, Result};
use log;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const SNAPSHOTS_DIR: &str = ".snapshots";
pub const CONFIG_FILENAME: &str = "config.json";
pub const README_FILENAME: &str = "readme.md";

static DEFAULT_CONFIG_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/default_config.json"));
static README_TEXT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/readme.md"));

static DEFAULT_CONFIG: Lazy<SnapshotConfig> = Lazy::new(|| {
    serde_json::from_str(DEFAULT_CONFIG_JSON)
        .expect("Failed to parse embedded data/default_config.json")
});

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub excluded_patterns: Vec<String>,
    #[serde(default)]
    pub included_patterns: Vec<String>,
    #[serde(default)]
    pub default: DefaultsConfig,
    #[serde(default)]
    pub enumeration_mode: EnumerationMode,
}

// Older configs keep the prompt at the top level.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    config: SnapshotConfig,
    #[serde(default)]
    default_prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub default_prompt: String,
    #[serde(default)]
    pub default_include_entire_project_structure: bool,
    #[serde(default)]
    pub default_include_all_files: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationMode {
    #[default]
    Layered,
    Legacy,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl SnapshotConfig {
    pub fn snapshots_dir(project_root: &Path) -> PathBuf {
        project_root.join(SNAPSHOTS_DIR)
    }

    pub fn config_path(project_root: &Path) -> PathBuf {
        Self::snapshots_dir(project_root).join(CONFIG_FILENAME)
    }

    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(project_root: &Path, cli_config_file: Option<&String>) -> PathBuf {
        match cli_config_file {
            Some(p_str) => {
                let path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                let path = if path.is_absolute() {
                    path
                } else {
                    project_root.join(path)
                };
                log::debug!("Using specified config file path: {}", path.display());
                path
            }
            None => Self::config_path(project_root),
        }
    }

    pub fn load(project_root: &Path) -> Result<Self> {
        Self::load_from_path(&Self::config_path(project_root))
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {}. Run `snapshots init` to create it.",
                config_path.display()
            )));
        }
        log::info!("Loading configuration from: {}", config_path.display());
        let content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let ConfigFile {
            mut config,
            default_prompt,
        } = serde_json::from_str(content)?;
        if let Some(prompt) = default_prompt {
            if config.default.default_prompt.is_empty() {
                log::debug!("Using top-level default_prompt");
                config.default.default_prompt = prompt;
            }
        }
        log::debug!(
            "Parsed config: {} excluded, {} included patterns, mode {:?}",
            config.excluded_patterns.len(),
            config.included_patterns.len(),
            config.enumeration_mode
        );
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub snapshots_dir: PathBuf,
    pub created_dir: bool,
    pub config_path: PathBuf,
    pub created_config: bool,
    pub readme_path: PathBuf,
}

pub fn initialize_snapshot_directory(project_root: &Path) -> Result<BootstrapReport> {
    log::info!("Initializing snapshot directory in {}", project_root.display());
    if !project_root.is_dir() {
        return Err(AppError::Config(format!(
            "Project base path '{}' is not a directory",
            project_root.display()
        )));
    }

    let snapshots_dir = SnapshotConfig::snapshots_dir(project_root);
    let created_dir = !snapshots_dir.exists();
    if created_dir {
        log::debug!("Creating snapshots directory {}", snapshots_dir.display());
        fs::create_dir_all(&snapshots_dir).map_err(|e| AppError::DirCreation {
            path: snapshots_dir.clone(),
            source: e,
        })?;
    } else {
        log::debug!("Snapshots directory already exists");
    }

    let config_path = snapshots_dir.join(CONFIG_FILENAME);
    let created_config = !config_path.exists();
    if created_config {
        log::debug!("Creating config file at {}", config_path.display());
        fs::write(&config_path, DEFAULT_CONFIG_JSON).map_err(|e| AppError::FileWrite {
            path: config_path.clone(),
            source: e,
        })?;
    } else {
        log::debug!("Config file already exists at {}", config_path.display());
    }

    let readme_path = snapshots_dir.join(README_FILENAME);
    fs::write(&readme_path, README_TEXT).map_err(|e| AppError::FileWrite {
        path: readme_path.clone(),
        source: e,
    })?;

    Ok(BootstrapReport {
        snapshots_dir,
        created_dir,
        config_path,
        created_config,
        readme_path,
    })
}
