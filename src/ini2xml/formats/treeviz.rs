//! Tree visualization of a parsed document
//!
//! ## Example
//!
//! ```text
//! ⧉ Document (2 sections)
//! ├─ § (default) (1 entry)
//! │ └─ = name: Alice
//! └─ § user (2 entries)
//!   ├─ = age: 30
//!   └─ ☰ role (2 items)
//!     ├─ ; role comment
//!     ├─ • admin
//!     └─ • editor
//! ```
//!
//! Comments are shown as `;` nodes right before the node they belong to.

use super::registry::{FormatError, Formatter};
use crate::ini2xml::ast::{Document, Entry, Section};

/// A display line plus nested lines
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

fn count_label(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun}")
}

fn comment_nodes(comments: &[String]) -> impl Iterator<Item = TreeNode> + '_ {
    comments
        .iter()
        .map(|comment| TreeNode::leaf(format!(";{comment}")))
}

fn section_node(section: &Section) -> TreeNode {
    let entries = section.entries();
    let name = if section.is_default() {
        "(default)"
    } else {
        section.name()
    };

    let mut children = Vec::new();
    for entry in &entries {
        match entry {
            Entry::Item(item) => {
                children.extend(comment_nodes(item.comments()));
                children.push(TreeNode::leaf(format!("= {}: {}", item.key(), item.value())));
            }
            Entry::Array { name, items } => {
                let mut elements = Vec::new();
                for item in items {
                    elements.extend(comment_nodes(item.comments()));
                    elements.push(TreeNode::leaf(format!("• {}", item.value())));
                }
                children.push(TreeNode {
                    label: format!("☰ {name} ({})", count_label(items.len(), "item", "items")),
                    children: elements,
                });
            }
        }
    }

    TreeNode {
        label: format!("§ {name} ({})", count_label(entries.len(), "entry", "entries")),
        children,
    }
}

fn format_node(node: &TreeNode, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{prefix}{connector} {}\n", node.label));

    let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        format_node(child, &child_prefix, i == child_count - 1, output);
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    let mut nodes = Vec::new();
    for section in doc.sections() {
        nodes.extend(comment_nodes(section.comments()));
        nodes.push(section_node(section));
    }

    let mut output = format!(
        "⧉ Document ({})\n",
        count_label(doc.sections().len(), "section", "sections")
    );
    let count = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        format_node(node, "", i == count - 1, &mut output);
    }

    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn description(&self) -> &str {
        "Tree view of the parsed sections, items and arrays"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini2xml::parsing::parse_str;

    #[test]
    fn test_treeviz_output() {
        let doc = parse_str(
            "name=Alice\n; accounts\n[user]\nage=30\n; role comment\nrole[]=admin\nrole[]=editor\n",
        )
        .unwrap();

        insta::assert_snapshot!(to_treeviz_str(&doc), @r"
        ⧉ Document (2 sections)
        ├─ § (default) (1 entry)
        │ └─ = name: Alice
        ├─ ; accounts
        └─ § user (2 entries)
          ├─ = age: 30
          └─ ☰ role (2 items)
            ├─ ; role comment
            ├─ • admin
            └─ • editor
        ");
    }

    #[test]
    fn test_count_label_uses_given_plural() {
        assert_eq!(count_label(1, "entry", "entries"), "1 entry");
        assert_eq!(count_label(2, "entry", "entries"), "2 entries");
        assert_eq!(count_label(0, "item", "items"), "0 items");
    }

    #[test]
    fn test_treeviz_empty_document() {
        assert_eq!(to_treeviz_str(&Document::new()), "⧉ Document (0 sections)\n");
    }
}
