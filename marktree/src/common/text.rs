//! Plain-text views over subtrees.

use crate::ast::{Node, NodeKind};

/// Human-readable text of a subtree.
///
/// A node's own content wins when non-empty; otherwise the text of its children is
/// concatenated in order.
pub fn extract_text(node: &Node) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Node, out: &mut String) {
    if let Some(content) = node.content_str() {
        out.push_str(content);
        return;
    }
    for child in &node.children {
        push_text(child, out);
    }
}

/// A link found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub text: String,
    pub href: String,
    pub title: Option<String>,
}

/// Every link in the document, in document order, without modifying anything
pub fn collect_links(document: &Node) -> Vec<LinkInfo> {
    document
        .walk()
        .filter_map(|node| match &node.kind {
            NodeKind::Link { href, title } => Some(LinkInfo {
                text: extract_text(node),
                href: href.clone(),
                title: title.clone(),
            }),
            _ => None,
        })
        .collect()
}
