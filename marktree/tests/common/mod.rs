//! Shared helpers, plus tests for the format-agnostic utilities.

mod ids;
mod validate;

use marktree::{parse_markdown, Node};

pub const KITCHENSINK: &str = include_str!("../fixtures/kitchensink.md");

pub fn parse(text: &str) -> Node {
    parse_markdown(text).expect("markdown should parse")
}

/// Kinds of `node` and its descendants in pre-order
pub fn kinds(node: &Node) -> Vec<&str> {
    node.walk().map(Node::kind_name).collect()
}

pub fn count(node: &Node, kind: &str) -> usize {
    node.find_all(kind).count()
}
