//! FreeMind (`.mm`) serializer.
//!
//! Header, element and attribute names are what FreeMind-compatible viewers
//! expect and must not change.

use crate::domain::entities::Node;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<map version=\"1.0.1\">\n<attribute_registry/>";
const FOOTER: &str = "</map>";
const INDENT: &str = "  ";

/// XML-escape `text`. Ampersand goes first so entities are not double-escaped.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Render one node and its subtree, indented two spaces per level.
pub fn render_node(node: &Node, depth: usize) -> String {
    let mut lines = Vec::new();
    push_node(node, depth, &mut lines);
    lines.join("\n")
}

fn push_node(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    match node {
        Node::Leaf(leaf) => lines.push(format!(
            "{indent}<node TEXT=\"{}\" LINK=\"{}\"/>",
            escape(&leaf.label),
            escape(&leaf.record.url)
        )),
        Node::Folder(folder) if folder.children.is_empty() => {
            lines.push(format!("{indent}<node TEXT=\"{}\"/>", escape(&folder.label)))
        }
        Node::Folder(folder) => {
            lines.push(format!("{indent}<node TEXT=\"{}\">", escape(&folder.label)));
            for child in &folder.children {
                push_node(child, depth + 1, lines);
            }
            lines.push(format!("{indent}</node>"));
        }
    }
}

/// Complete FreeMind document for `root`.
pub fn render(root: &Node) -> String {
    format!("{HEADER}\n{}\n{FOOTER}", render_node(root, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape("Rust Book"), "Rust Book");
    }

    #[test]
    fn escape_does_not_double_escape_existing_entities() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(escape("a<b"), "a&lt;b");
    }

    #[test]
    fn empty_folder_is_self_closing() {
        let node = Node::folder("Empty", vec![], 0);
        assert_eq!(render_node(&node, 2), "    <node TEXT=\"Empty\"/>");
    }
}
