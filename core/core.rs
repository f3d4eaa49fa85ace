pub mod config;
pub mod error;
pub mod gather;
pub mod pattern;
pub mod snapshot;
pub mod tree;

pub use config::{
    BootstrapReport, DefaultsConfig, EnumerationMode, SnapshotConfig, initialize_snapshot_directory,
};
pub use error::{AppError, Result};
pub use gather::{
    Enumeration, Explanation, LayeredStrategy, LegacyStrategy, PathVerdict, SelectionStrategy,
    build_strategy, enumerate, explain, filter_out_image_files,
};
pub use pattern::{Matcher, PatternRole, PatternSet, compile_exclude, compile_include};
pub use snapshot::{
    FileSelection, Snapshot, SnapshotRequest, assemble, create_snapshot, snapshot_file_name,
};
pub use tree::{DirectoryNode, TreeNode, build_tree, render, render_structure};
