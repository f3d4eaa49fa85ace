use crate::config::{SNAPSHOTS_DIR, SnapshotConfig};
use crate::error::{AppError, Result, error_trace};
use crate::gather::{self, Enumeration, path_string};
use crate::pattern::normalize_separators;
use crate::tree;
use chrono::NaiveDateTime;
use log;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const SNAPSHOT_FILENAME_FORMAT: &str = "snapshot-%Y-%m-%d-%H_%M_%S.md";

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    All,
    Explicit(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub prompt: String,
    pub include_structure: bool,
    pub selection: FileSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub markdown: String,
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn snapshot_file_name(timestamp: NaiveDateTime) -> String {
    timestamp.format(SNAPSHOT_FILENAME_FORMAT).to_string()
}

// Unreadable files are replaced by an inline error inside their code block.
pub fn assemble(
    prompt: &str,
    include_structure: bool,
    structure_text: Option<&str>,
    files: &[String],
) -> String {
    let mut markdown = String::new();
    markdown.push_str(prompt);
    markdown.push_str("\n\n");

    if include_structure {
        markdown.push_str("# Project Structure\n\n");
        markdown.push_str(structure_text.unwrap_or_default());
        markdown.push_str("\n\n");
    }

    markdown.push_str("# Project Files\n\n");
    for file in files {
        markdown.push_str("- ");
        markdown.push_str(file);
        markdown.push('\n');
    }
    markdown.push('\n');

    for file in files {
        markdown.push_str("## ");
        markdown.push_str(file);
        markdown.push('\n');
        markdown.push_str(FENCE);
        markdown.push('\n');
        match read_file_text(file) {
            Ok(content) => {
                for line in split_lines(&content) {
                    markdown.push_str(line);
                    markdown.push('\n');
                }
            }
            Err(e) => {
                log::warn!("Embedding read error for {}: {}", file, e);
                markdown.push_str(&format!("Error reading file: {} - {}\n", file, e));
                markdown.push_str(&error_trace(&e));
            }
        }
        markdown.push_str(FENCE);
        markdown.push_str("\n\n");
    }
    markdown
}

// Line terminators are `\n`, `\r\n` or a lone `\r`.
fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = content.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&content[start..]);
    }
    lines
}

fn read_file_text(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.into(),
        source: e,
    })
}

// Drops `.` segments and resolves `..` against earlier ones without touching the disk.
fn normalize_lexically(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push(segment);
                }
            }
            _ => segments.push(segment),
        }
    }
    let joined = segments.join("/");
    if absolute { format!("/{}", joined) } else { joined }
}

pub fn resolve_explicit_selection(root: &Path, paths: &[String]) -> Vec<String> {
    let snapshots_marker = format!("/{}/", SNAPSHOTS_DIR);
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(paths.len());
    for raw in paths {
        let candidate = Path::new(raw);
        let joined = if candidate.is_absolute() {
            normalize_separators(raw)
        } else {
            path_string(&root.join(candidate))
        };
        let path = normalize_lexically(&joined);
        if path.contains(&snapshots_marker) {
            log::debug!("Skipping snapshot output in selection: {}", path);
            continue;
        }
        if seen.insert(path.clone()) {
            resolved.push(path);
        }
    }
    resolved
}

pub fn create_snapshot(
    root: &Path,
    config: &SnapshotConfig,
    request: &SnapshotRequest,
) -> Result<Snapshot> {
    log::info!("Creating snapshot for {}", root.display());
    let strategy = gather::build_strategy(root, config)?;

    let needs_enumeration =
        request.include_structure || matches!(request.selection, FileSelection::All);
    let enumeration = if needs_enumeration {
        gather::enumerate(root, strategy.as_ref())?
    } else {
        Enumeration::default()
    };

    let selected = match &request.selection {
        FileSelection::All => enumeration.files.clone(),
        FileSelection::Explicit(paths) => resolve_explicit_selection(root, paths),
    };
    let files = gather::filter_out_image_files(selected);
    log::debug!("Snapshot will embed {} files", files.len());

    let structure = if request.include_structure {
        Some(tree::render_structure(root, &enumeration.files))
    } else {
        None
    };

    let markdown = assemble(
        &request.prompt,
        request.include_structure,
        structure.as_deref(),
        &files,
    );

    Ok(Snapshot {
        markdown,
        files,
        warnings: enumeration.warnings,
    })
}
