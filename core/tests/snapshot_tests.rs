use snapshots_core::config::{CONFIG_FILENAME, README_FILENAME, SNAPSHOTS_DIR};
use snapshots_core::{
    FileSelection, SnapshotConfig, SnapshotRequest, create_snapshot,
    initialize_snapshot_directory,
};
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
    }
    (dir, root)
}

fn config(excludes: &[&str], includes: &[&str]) -> SnapshotConfig {
    SnapshotConfig {
        excluded_patterns: excludes.iter().map(|s| s.to_string()).collect(),
        included_patterns: includes.iter().map(|s| s.to_string()).collect(),
        ..SnapshotConfig::default()
    }
}

#[test]
fn full_snapshot_document_layout() {
    let (_dir, root) = project(&[
        ("src/main.rs", "fn main() {}\n"),
        ("README.md", "# Demo\nline two"),
        ("build/out.txt", "ignored"),
    ]);
    let request = SnapshotRequest {
        prompt: "Review this".to_string(),
        include_structure: true,
        selection: FileSelection::All,
    };
    let snapshot = create_snapshot(&root, &config(&["build"], &["Makefile"]), &request).unwrap();

    let r = root.to_string_lossy();
    let expected = format!(
        "Review this\n\n\
         # Project Structure\n\n\
         - README.md\n\
         + src\n    - main.rs\n\
         \n\n\
         # Project Files\n\n\
         - {r}/README.md\n\
         - {r}/src/main.rs\n\
         \n\
         ## {r}/README.md\n```\n# Demo\nline two\n```\n\n\
         ## {r}/src/main.rs\n```\nfn main() {{}}\n```\n\n"
    );
    assert_eq!(snapshot.markdown, expected);
    assert_eq!(snapshot.files.len(), 2);
}

#[test]
fn explicit_selection_without_structure() {
    let (_dir, root) = project(&[("a.txt", "alpha\n"), ("b.txt", "beta\n")]);
    let request = SnapshotRequest {
        prompt: "P".to_string(),
        include_structure: false,
        selection: FileSelection::Explicit(vec!["b.txt".to_string()]),
    };
    let snapshot = create_snapshot(&root, &config(&[], &[]), &request).unwrap();
    assert!(!snapshot.markdown.contains("# Project Structure"));
    assert!(snapshot.markdown.contains("```\nbeta\n```\n\n"));
    assert!(!snapshot.markdown.contains("alpha"));
}

#[test]
fn structure_covers_whole_project_for_explicit_selection() {
    let (_dir, root) = project(&[("a.txt", "alpha\n"), ("sub/b.txt", "beta\n")]);
    let request = SnapshotRequest {
        prompt: "P".to_string(),
        include_structure: true,
        selection: FileSelection::Explicit(vec!["a.txt".to_string()]),
    };
    let snapshot = create_snapshot(&root, &config(&[], &[]), &request).unwrap();
    assert!(snapshot.markdown.contains("- a.txt\n+ sub\n    - b.txt\n"));
    assert_eq!(snapshot.files, vec![format!("{}/a.txt", root.to_string_lossy())]);
}

#[test]
fn images_are_suppressed_even_when_selected() {
    let (_dir, root) = project(&[("x.png", "png"), ("x.svg", "<svg/>"), ("x.jpg", "jpg")]);
    let request = SnapshotRequest {
        prompt: "P".to_string(),
        include_structure: false,
        selection: FileSelection::Explicit(vec![
            "x.png".to_string(),
            "x.svg".to_string(),
            "x.jpg".to_string(),
        ]),
    };
    let snapshot = create_snapshot(&root, &config(&[], &[]), &request).unwrap();
    assert_eq!(snapshot.files, vec![format!("{}/x.svg", root.to_string_lossy())]);
}

#[test]
fn unreadable_file_degrades_only_its_block() {
    let (_dir, root) = project(&[("ok.txt", "fine\n")]);
    let request = SnapshotRequest {
        prompt: "P".to_string(),
        include_structure: false,
        selection: FileSelection::Explicit(vec!["missing.txt".to_string(), "ok.txt".to_string()]),
    };
    let snapshot = create_snapshot(&root, &config(&[], &[]), &request).unwrap();
    let r = root.to_string_lossy();
    assert!(snapshot
        .markdown
        .contains(&format!("## {r}/missing.txt\n```\nError reading file: {r}/missing.txt - ")));
    assert!(snapshot.markdown.contains("```\nfine\n```\n\n"));
}

#[test]
fn invalid_utf8_file_degrades_inline() {
    let (_dir, root) = project(&[]);
    fs::write(root.join("bin.dat"), [0xff, 0xfe, 0x00]).unwrap();
    let request = SnapshotRequest {
        prompt: "P".to_string(),
        include_structure: false,
        selection: FileSelection::Explicit(vec!["bin.dat".to_string()]),
    };
    let snapshot = create_snapshot(&root, &config(&[], &[]), &request).unwrap();
    assert!(snapshot.markdown.contains("Error reading file: "));
}

#[test]
fn bootstrap_creates_config_once_and_refreshes_readme() {
    let (_dir, root) = project(&[]);
    let first = initialize_snapshot_directory(&root).unwrap();
    assert!(first.created_dir);
    assert!(first.created_config);
    assert_eq!(first.config_path, root.join(SNAPSHOTS_DIR).join(CONFIG_FILENAME));

    let loaded = SnapshotConfig::load(&root).unwrap();
    assert_eq!(loaded, SnapshotConfig::default());

    fs::write(&first.config_path, r#"{"excluded_patterns": ["dist"]}"#).unwrap();
    fs::write(root.join(SNAPSHOTS_DIR).join(README_FILENAME), "stale").unwrap();

    let second = initialize_snapshot_directory(&root).unwrap();
    assert!(!second.created_dir);
    assert!(!second.created_config);
    let kept = SnapshotConfig::load(&root).unwrap();
    assert_eq!(kept.excluded_patterns, vec!["dist".to_string()]);
    let readme = fs::read_to_string(second.readme_path).unwrap();
    assert!(readme.starts_with("# Snapshots"));
}

#[test]
fn missing_config_is_fatal() {
    let (_dir, root) = project(&[]);
    let err = SnapshotConfig::load(&root).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn snapshots_directory_is_never_embedded() {
    let (_dir, root) = project(&[("src/a.rs", "a\n"), (".snapshots/old.md", "old\n")]);
    let request = SnapshotRequest {
        prompt: "P".to_string(),
        include_structure: false,
        selection: FileSelection::All,
    };
    let snapshot = create_snapshot(&root, &SnapshotConfig::default(), &request).unwrap();
    assert_eq!(snapshot.files, vec![format!("{}/src/a.rs", root.to_string_lossy())]);
}
