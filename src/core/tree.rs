//! Directory tree construction and rendering
//!
//! Rebuilds a hierarchy from the scanner's flat entry list, then
//! renders it as a conventional box-drawn tree. Children own their
//! subtrees; there is no parent back-reference, rendering only ever
//! walks downward.

use std::path::{Path, PathBuf};

use crate::core::model::{FileEntry, ScanResult};
use crate::core::paths::base_name;

const BRANCH: &str = "├── ";
const BRANCH_LAST: &str = "└── ";
const CONTINUE: &str = "│   ";
const CONTINUE_BLANK: &str = "    ";

/// A node in the directory hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Final path segment
    pub name: String,

    /// Full filesystem path
    pub path: PathBuf,

    pub is_directory: bool,

    /// Own token count; directories stay 0 and are aggregated at
    /// render time
    pub token_count: usize,

    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(name: String, path: PathBuf, is_directory: bool) -> Self {
        Self {
            name,
            path,
            is_directory,
            token_count: 0,
            children: Vec::new(),
        }
    }
}

/// Build the hierarchy from a scan result. Entries are sorted by
/// relative path first, so the shape is independent of traversal
/// order; each path ends up as exactly one node.
pub fn build_tree(result: &ScanResult) -> TreeNode {
    let mut root = TreeNode::new(
        base_name(&result.root_path),
        result.root_path.clone(),
        true,
    );

    let mut entries: Vec<&FileEntry> = result.entries.iter().collect();
    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    for entry in entries {
        // the root records itself under the "." sentinel
        if entry.relative_path == "." {
            continue;
        }
        insert_entry(&mut root, entry, &result.root_path);
    }

    sort_children(&mut root);
    root
}

/// Walk the path segments, creating any missing intermediate nodes.
/// Prefixes already created through a sibling entry are reused, never
/// duplicated.
fn insert_entry(root: &mut TreeNode, entry: &FileEntry, root_path: &Path) {
    let segments: Vec<&str> = entry.relative_path.split('/').collect();
    let last_index = segments.len() - 1;

    let mut node = root;
    let mut full_path = root_path.to_path_buf();

    for (i, segment) in segments.iter().enumerate() {
        full_path.push(segment);
        let is_directory = i < last_index || entry.is_directory;

        let position = node.children.iter().position(|c| c.name == *segment);
        let index = match position {
            Some(index) => index,
            None => {
                let mut child =
                    TreeNode::new(segment.to_string(), full_path.clone(), is_directory);
                if !is_directory {
                    child.token_count = entry.token_count;
                }
                node.children.push(child);
                node.children.len() - 1
            }
        };
        node = &mut node.children[index];
    }
}

/// Depth-first ordering pass: directories before files, then names
/// ascending within each group
fn sort_children(node: &mut TreeNode) {
    node.children.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.cmp(&b.name))
    });
    for child in &mut node.children {
        sort_children(child);
    }
}

/// Render the tree as newline-terminated text. The root is a bare
/// name; with `show_tokens` it carries the aggregated total for the
/// whole tree, and file nodes with nonzero counts carry their own.
/// Never mutates the tree.
pub fn render_tree(root: &TreeNode, show_tokens: bool) -> String {
    let mut out = String::new();

    out.push_str(&root.name);
    if show_tokens {
        let total = subtree_tokens(root);
        if total > 0 {
            out.push_str(&format!(" ({} tokens)", total));
        }
    }
    out.push('\n');

    render_children(root, "", show_tokens, &mut out);
    out
}

fn render_children(node: &TreeNode, prefix: &str, show_tokens: bool, out: &mut String) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;

        out.push_str(prefix);
        out.push_str(if is_last { BRANCH_LAST } else { BRANCH });
        out.push_str(&child.name);
        if show_tokens && !child.is_directory && child.token_count > 0 {
            out.push_str(&format!(" ({} tokens)", child.token_count));
        }
        out.push('\n');

        let extended = format!(
            "{}{}",
            prefix,
            if is_last { CONTINUE_BLANK } else { CONTINUE }
        );
        render_children(child, &extended, show_tokens, out);
    }
}

/// Recursive token total over a subtree, computed at render time
/// rather than cached on directory nodes
pub fn subtree_tokens(node: &TreeNode) -> usize {
    node.token_count + node.children.iter().map(subtree_tokens).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{FileEntry, ScanResult};

    fn result_with(entries: Vec<FileEntry>) -> ScanResult {
        let mut result = ScanResult::new(PathBuf::from("/repo"));
        for entry in entries {
            result.push(entry);
        }
        result
    }

    fn dir(rel: &str) -> FileEntry {
        FileEntry::directory(PathBuf::from("/repo").join(rel), rel)
    }

    fn file(rel: &str, tokens: usize) -> FileEntry {
        FileEntry::file(
            PathBuf::from("/repo").join(rel),
            rel,
            1,
            tokens,
            "x".to_string(),
        )
    }

    #[test]
    fn test_empty_result_yields_root_only() {
        let result = result_with(vec![dir(".")]);
        let tree = build_tree(&result);
        assert_eq!(tree.name, "repo");
        assert!(tree.is_directory);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_intermediate_directories_are_created() {
        // no explicit entry for "a" or "a/b"
        let result = result_with(vec![file("a/b/c.txt", 3)]);
        let tree = build_tree(&result);

        assert_eq!(tree.children.len(), 1);
        let a = &tree.children[0];
        assert!(a.is_directory);
        assert_eq!(a.name, "a");
        let b = &a.children[0];
        assert!(b.is_directory);
        let c = &b.children[0];
        assert!(!c.is_directory);
        assert_eq!(c.token_count, 3);
        assert_eq!(c.path, PathBuf::from("/repo/a/b/c.txt"));
    }

    #[test]
    fn test_no_duplicate_children_for_shared_prefix() {
        let result = result_with(vec![
            dir("src"),
            file("src/a.rs", 1),
            file("src/b.rs", 2),
        ]);
        let tree = build_tree(&result);

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "src");
        assert_eq!(tree.children[0].children.len(), 2);
    }

    #[test]
    fn test_directories_sort_before_files() {
        let result = result_with(vec![
            file("zz.txt", 1),
            file("aa.txt", 1),
            dir("sub"),
            file("sub/x.txt", 1),
            dir("also"),
        ]);
        let tree = build_tree(&result);

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["also", "sub", "aa.txt", "zz.txt"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let result = result_with(vec![
            dir("sub"),
            file("sub/x.txt", 2),
            file("y.txt", 1),
        ]);
        assert_eq!(build_tree(&result), build_tree(&result));
    }

    #[test]
    fn test_build_is_traversal_order_independent() {
        let forward = result_with(vec![dir("sub"), file("sub/x.txt", 2), file("y.txt", 1)]);
        let backward = result_with(vec![file("y.txt", 1), file("sub/x.txt", 2), dir("sub")]);
        assert_eq!(build_tree(&forward), build_tree(&backward));
    }

    #[test]
    fn test_render_connectors_and_nesting() {
        let result = result_with(vec![dir("sub"), file("sub/x.txt", 0), file("y.txt", 0)]);
        let tree = build_tree(&result);
        let rendered = render_tree(&tree, false);

        assert_eq!(rendered, "repo\n├── sub\n│   └── x.txt\n└── y.txt\n");
    }

    #[test]
    fn test_render_blank_continuation_under_last_child() {
        let result = result_with(vec![dir("sub"), file("sub/deep.txt", 0)]);
        let tree = build_tree(&result);
        let rendered = render_tree(&tree, false);

        assert_eq!(rendered, "repo\n└── sub\n    └── deep.txt\n");
    }

    #[test]
    fn test_render_with_tokens_annotates_files_and_root() {
        let result = result_with(vec![dir("sub"), file("sub/x.txt", 5), file("y.txt", 7)]);
        let tree = build_tree(&result);
        let rendered = render_tree(&tree, true);

        assert!(rendered.starts_with("repo (12 tokens)\n"));
        assert!(rendered.contains("x.txt (5 tokens)"));
        assert!(rendered.contains("y.txt (7 tokens)"));
        // directory lines carry no count of their own
        assert!(rendered.contains("├── sub\n"));
    }

    #[test]
    fn test_render_omits_zero_counts() {
        let result = result_with(vec![file("empty.txt", 0)]);
        let tree = build_tree(&result);
        let rendered = render_tree(&tree, true);

        assert_eq!(rendered, "repo\n└── empty.txt\n");
    }

    #[test]
    fn test_root_total_matches_result_total() {
        let result = result_with(vec![file("a.txt", 3), file("b/c.txt", 4), dir("b")]);
        let tree = build_tree(&result);
        assert_eq!(subtree_tokens(&tree), result.total_tokens);
    }

    #[test]
    fn test_render_does_not_mutate() {
        let result = result_with(vec![dir("sub"), file("sub/x.txt", 2)]);
        let tree = build_tree(&result);
        let before = tree.clone();
        let _ = render_tree(&tree, true);
        assert_eq!(tree, before);
    }
}
