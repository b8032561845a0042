//! Export-option filtering over a built tree.

use crate::domain::entities::{ExportOptions, Folder, Node};

/// Label of the wrapper emitted in place of an excluded folder.
pub const FLATTENED_LABEL: &str = "Flattened";

/// Prune `node` according to `options`. Returns `None` when nothing survives.
///
/// The input tree is left untouched. Surviving children keep their order and
/// every kept folder's `child_count` is its number of direct surviving children.
pub fn filter_tree(node: &Node, options: &ExportOptions) -> Option<Node> {
    match node {
        Node::Leaf(_) => options.include_bookmarks.then(|| node.clone()),
        Node::Folder(folder) => {
            let children = filter_children(folder, options);
            if children.is_empty() {
                return None;
            }
            let label = if options.include_folders {
                folder.label.clone()
            } else {
                FLATTENED_LABEL.to_string()
            };
            let count = children.len();
            Some(Node::folder(label, children, count))
        }
    }
}

fn filter_children(folder: &Folder, options: &ExportOptions) -> Vec<Node> {
    folder
        .children
        .iter()
        .filter_map(|child| filter_tree(child, options))
        .collect()
}
