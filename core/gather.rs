use crate::config::{EnumerationMode, SnapshotConfig};
use crate::error::{AppError, Result};
use crate::pattern::{PatternSet, normalize_separators};
use log;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

static RASTER_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*\.(jpg|jpeg|png|gif|bmp|tiff)$").expect("raster image regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathVerdict {
    pub excluded_by_pattern: bool,
    pub included_by_pattern: bool,
    pub in_excluded_directory: bool,
    pub selected: bool,
}

pub trait SelectionStrategy {
    fn name(&self) -> &'static str;

    fn classify(&self, file_path: &str) -> PathVerdict;

    fn accepts(&self, file_path: &str) -> bool {
        self.classify(file_path).selected
    }
}

// Include/exclude precedence: a file-level include rescues a file from its own
// exclusion but never from an excluded ancestor directory.
#[derive(Debug, Clone)]
pub struct LayeredStrategy {
    excludes: PatternSet,
    includes: PatternSet,
}

impl LayeredStrategy {
    pub fn new(excludes: PatternSet, includes: PatternSet) -> Self {
        Self { excludes, includes }
    }

    pub fn from_patterns(root: &Path, excludes: &[String], includes: &[String]) -> Result<Self> {
        let root_str = path_string(root);
        Ok(Self::new(
            PatternSet::excludes(excludes, &root_str)?,
            PatternSet::includes(includes)?,
        ))
    }

    fn in_excluded_directory(&self, file_path: &str) -> bool {
        let mut current = parent_of(file_path);
        while let Some(dir) = current {
            if self.excludes.is_match(dir) {
                log::trace!("Ancestor '{}' of '{}' is excluded", dir, file_path);
                return true;
            }
            current = parent_of(dir);
        }
        false
    }
}

impl SelectionStrategy for LayeredStrategy {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn classify(&self, file_path: &str) -> PathVerdict {
        let excluded_by_pattern = self.excludes.is_match(file_path);
        let included_by_pattern = self.includes.is_empty() || self.includes.is_match(file_path);
        let in_excluded_directory = self.in_excluded_directory(file_path);

        let selected = if included_by_pattern && !in_excluded_directory {
            true
        } else {
            !excluded_by_pattern && !in_excluded_directory
        };

        PathVerdict {
            excluded_by_pattern,
            included_by_pattern,
            in_excluded_directory,
            selected,
        }
    }
}

// Exclude-only mode: a file is dropped when its root-relative path, or any of
// its root-relative ancestors, contains an exclude pattern as a segment.
#[derive(Debug, Clone)]
pub struct LegacyStrategy {
    root: String,
    excludes: PatternSet,
}

impl LegacyStrategy {
    pub fn new(root: &Path, excludes: PatternSet) -> Self {
        Self {
            root: path_string(root).trim_end_matches('/').to_string(),
            excludes,
        }
    }

    pub fn from_patterns(root: &Path, excludes: &[String]) -> Result<Self> {
        Ok(Self::new(root, PatternSet::legacy_excludes(excludes)?))
    }

    fn relative<'a>(&self, file_path: &'a str) -> &'a str {
        file_path
            .strip_prefix(self.root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(file_path)
    }
}

impl SelectionStrategy for LegacyStrategy {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn classify(&self, file_path: &str) -> PathVerdict {
        let relative = self.relative(file_path);
        let excluded_by_pattern = self.excludes.is_match(relative);

        let mut in_excluded_directory = false;
        let mut current = parent_of(relative);
        while let Some(dir) = current {
            if self.excludes.is_match(dir) {
                in_excluded_directory = true;
                break;
            }
            current = parent_of(dir);
        }

        PathVerdict {
            excluded_by_pattern,
            included_by_pattern: false,
            in_excluded_directory,
            selected: !excluded_by_pattern && !in_excluded_directory,
        }
    }
}

pub fn build_strategy(root: &Path, config: &SnapshotConfig) -> Result<Box<dyn SelectionStrategy>> {
    log::debug!("Building {:?} selection strategy", config.enumeration_mode);
    Ok(match config.enumeration_mode {
        EnumerationMode::Layered => Box::new(LayeredStrategy::from_patterns(
            root,
            &config.excluded_patterns,
            &config.included_patterns,
        )?),
        EnumerationMode::Legacy => {
            if !config.included_patterns.is_empty() {
                log::debug!("Legacy enumeration ignores {} include patterns", config.included_patterns.len());
            }
            Box::new(LegacyStrategy::from_patterns(root, &config.excluded_patterns)?)
        }
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn enumerate(root: &Path, strategy: &dyn SelectionStrategy) -> Result<Enumeration> {
    let (candidates, warnings) = walk_regular_files(root)?;
    let total = candidates.len();

    let mut files: Vec<String> = candidates
        .into_iter()
        .filter(|path| {
            let keep = strategy.accepts(path);
            if !keep {
                log::trace!("Excluding file: {}", path);
            }
            keep
        })
        .collect();
    files.sort();
    files.dedup();

    log::info!(
        "Enumeration ({}) selected {} of {} files under {}",
        strategy.name(),
        files.len(),
        total,
        root.display()
    );
    Ok(Enumeration { files, warnings })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explanation {
    pub decisions: Vec<(String, PathVerdict)>,
    pub warnings: Vec<String>,
}

pub fn explain(root: &Path, strategy: &dyn SelectionStrategy) -> Result<Explanation> {
    let (mut candidates, warnings) = walk_regular_files(root)?;
    candidates.sort();
    candidates.dedup();
    let decisions = candidates
        .into_iter()
        .map(|path| {
            let verdict = strategy.classify(&path);
            (path, verdict)
        })
        .collect();
    Ok(Explanation {
        decisions,
        warnings,
    })
}

pub fn filter_out_image_files(paths: Vec<String>) -> Vec<String> {
    paths
        .into_iter()
        .filter(|path| {
            let keep = !RASTER_IMAGE.is_match(path) || path.ends_with(".svg");
            if !keep {
                log::debug!("Dropping raster image: {}", path);
            }
            keep
        })
        .collect()
}

fn walk_regular_files(root: &Path) -> Result<(Vec<String>, Vec<String>)> {
    if !root.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "Project root '{}' is not a readable directory",
            root.display()
        )));
    }

    log::info!("Walking project directory: {}", root.display());
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if entry.file_type().is_dir() {
                    continue;
                }
                // Symlinked files count when their target is a regular file.
                let is_file = entry.file_type().is_file()
                    || fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false);
                if is_file {
                    let path = path_string(entry.path());
                    log::trace!("Walked file: {}", path);
                    files.push(path);
                }
            }
            Err(e) => {
                let location = e
                    .path()
                    .map_or_else(|| "unknown path".into(), |p| p.display().to_string());
                log::warn!("Error walking directory: {} (at {})", e, location);
                warnings.push(format!("{} (at {})", e, location));
            }
        }
    }
    log::debug!("Directory walk complete. Found {} files.", files.len());
    Ok((files, warnings))
}

pub fn path_string(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

fn parent_of(path: &str) -> Option<&str> {
    match path.rfind('/') {
        Some(0) if path.len() > 1 => Some("/"),
        Some(0) => None,
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}
