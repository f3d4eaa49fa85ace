use crate::error::{AppError, Result, error_trace};
use crate::gather::path_string;
use crate::pattern::normalize_separators;
use log;
use serde::Serialize;
use std::path::Path;

const INDENT: &str = "    ";

// Directory-ness is derived: a node is a directory exactly when it has
// children. A node inserted as a file that later receives children is
// therefore reported as a directory from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    name: String,
    children: Vec<DirectoryNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File { name: String },
    Directory { name: String, children: Vec<TreeNode> },
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[DirectoryNode] {
        &self.children
    }

    pub fn is_directory(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&DirectoryNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn insert<'a, I>(&mut self, segments: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = self;
        for segment in segments {
            let idx = match node.children.iter().position(|c| c.name == segment) {
                Some(idx) => idx,
                None => {
                    node.children.push(DirectoryNode::new(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }
    }

    pub fn finalize(&self) -> TreeNode {
        if self.is_directory() {
            TreeNode::Directory {
                name: self.name.clone(),
                children: self.children.iter().map(DirectoryNode::finalize).collect(),
            }
        } else {
            TreeNode::File {
                name: self.name.clone(),
            }
        }
    }
}

pub fn build_tree(root: &Path, paths: &[String]) -> Result<DirectoryNode> {
    let root_str = path_string(root);
    let root_prefix = format!("{}/", root_str.trim_end_matches('/'));
    log::debug!("Building tree structure from {} paths...", paths.len());

    let mut tree = DirectoryNode::new(root_str.clone());
    for raw in paths {
        let path = normalize_separators(raw);
        let relative = if let Some(rest) = path.strip_prefix(&root_prefix) {
            rest
        } else if path == root_str {
            continue;
        } else if !path.starts_with('/') && Path::new(&path).is_relative() {
            path.as_str()
        } else {
            return Err(AppError::Tree(format!(
                "Path '{}' is not inside project root '{}'",
                raw, root_str
            )));
        };

        let segments: Vec<&str> = relative
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.contains(&"..") {
            return Err(AppError::Tree(format!(
                "Path '{}' escapes project root '{}'",
                raw, root_str
            )));
        }
        if segments.is_empty() {
            continue;
        }
        tree.insert(segments);
    }
    log::debug!("Tree structure built with {} top-level entries.", tree.children.len());
    Ok(tree)
}

pub fn render(tree: &DirectoryNode) -> String {
    let mut out = String::new();
    render_node(&mut out, tree, 0);
    out
}

fn render_node(out: &mut String, node: &DirectoryNode, level: usize) {
    if level > 0 {
        out.push_str(&INDENT.repeat(level - 1));
        out.push_str(if node.is_directory() { "+ " } else { "- " });
        out.push_str(&node.name);
        out.push('\n');
    }
    for child in &node.children {
        render_node(out, child, level + 1);
    }
}

pub fn render_structure(root: &Path, paths: &[String]) -> String {
    match build_tree(root, paths) {
        Ok(tree) => render(&tree),
        Err(e) => {
            log::warn!("Failed to build project structure: {}", e);
            format!(
                "Exception occurred while building project structure: {}\n{}",
                e,
                error_trace(&e)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn renders_nested_outline_in_insertion_order() {
        let tree = build_tree(
            Path::new("/proj"),
            &strings(&["a/b/c.txt", "a/b/d.txt", "a/e.txt"]),
        )
        .unwrap();
        let expected = "+ a\n    + b\n        - c.txt\n        - d.txt\n    - e.txt\n";
        assert_eq!(render(&tree), expected);
    }

    #[test]
    fn absolute_paths_are_relativized() {
        let tree = build_tree(
            Path::new("/proj"),
            &strings(&["/proj/src/main.rs", "/proj/Cargo.toml"]),
        )
        .unwrap();
        assert_eq!(render(&tree), "+ src\n    - main.rs\n- Cargo.toml\n");
    }

    #[test]
    fn insertion_order_is_first_seen() {
        let tree = build_tree(Path::new("/p"), &strings(&["z.txt", "a/x", "m.txt", "a/y"])).unwrap();
        let names: Vec<_> = tree.children().iter().map(DirectoryNode::name).collect();
        assert_eq!(names, vec!["z.txt", "a", "m.txt"]);
        assert_eq!(tree.child("a").map(|a| a.children().len()), Some(2));
    }

    #[test]
    fn leaf_that_gains_children_becomes_directory() {
        let tree = build_tree(Path::new("/p"), &strings(&["a", "a/b"])).unwrap();
        assert!(tree.child("a").unwrap().is_directory());
        assert_eq!(render(&tree), "+ a\n    - b\n");
    }

    #[test]
    fn duplicate_paths_collapse() {
        let tree = build_tree(Path::new("/p"), &strings(&["a/b", "a/b"])).unwrap();
        assert_eq!(render(&tree), "+ a\n    - b\n");
    }

    #[test]
    fn empty_input_renders_nothing() {
        let tree = build_tree(Path::new("/p"), &[]).unwrap();
        assert_eq!(render(&tree), "");
        assert!(!tree.is_directory());
    }

    #[test]
    fn root_itself_is_skipped() {
        let tree = build_tree(Path::new("/p"), &strings(&["/p", "/p/x"])).unwrap();
        assert_eq!(render(&tree), "- x\n");
    }

    #[test]
    fn path_outside_root_is_an_error() {
        let err = build_tree(Path::new("/p"), &strings(&["/elsewhere/x"])).unwrap_err();
        assert!(matches!(err, AppError::Tree(_)));
        let err = build_tree(Path::new("/p"), &strings(&["a/../../x"])).unwrap_err();
        assert!(matches!(err, AppError::Tree(_)));
    }

    #[test]
    fn structure_failure_becomes_diagnostic_text() {
        let text = render_structure(Path::new("/p"), &strings(&["/elsewhere/x"]));
        assert!(text.starts_with("Exception occurred while building project structure: "));
        assert!(text.contains("/elsewhere/x"));
    }

    #[test]
    fn finalize_tags_nodes() {
        let tree = build_tree(Path::new("/p"), &strings(&["a/b.txt", "c.txt"])).unwrap();
        let TreeNode::Directory { children, .. } = tree.finalize() else {
            panic!("root with children must finalize as a directory");
        };
        assert_eq!(
            children,
            vec![
                TreeNode::Directory {
                    name: "a".to_string(),
                    children: vec![TreeNode::File {
                        name: "b.txt".to_string()
                    }],
                },
                TreeNode::File {
                    name: "c.txt".to_string()
                },
            ]
        );
    }
}
