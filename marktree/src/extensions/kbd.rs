//! Keyboard keys written as `++Ctrl++`.
//!
//! Text nodes are split around each `++key++` run; the key becomes a `keyboard_key`
//! custom node whose content is the key text.

use super::Extension;
use crate::ast::{Node, NodeKind};
use crate::error::Result;
use crate::render::html::escape_html;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub const KEYBOARD_KEY_KIND: &str = "keyboard_key";

static KEY_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+\+([^+]*)\+\+").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct KbdExtension;

impl KbdExtension {
    /// A `keyboard_key` node for `key`
    pub fn key(key: impl Into<String>) -> Node {
        Node::new(NodeKind::Custom {
            name: KEYBOARD_KEY_KIND.to_string(),
        })
        .with_content(key)
    }
}

/// Replace text children containing key runs with text and key nodes, depth first
fn split_keys(node: &mut Node) -> usize {
    let mut found = 0;
    let children = std::mem::take(&mut node.children);
    for mut child in children {
        found += split_keys(&mut child);
        match split_text(&child) {
            Some(parts) => {
                found += parts.iter().filter(|p| p.is(KEYBOARD_KEY_KIND)).count();
                node.children.extend(parts);
            }
            None => node.children.push(child),
        }
    }
    found
}

fn split_text(node: &Node) -> Option<Vec<Node>> {
    if !node.is("text") {
        return None;
    }
    let content = node.content.as_deref()?;
    let mut parts = Vec::new();
    let mut last = 0;
    for captures in KEY_RUN.captures_iter(content) {
        let (Some(run), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if run.start() > last {
            parts.push(Node::text(&content[last..run.start()]));
        }
        parts.push(KbdExtension::key(key.as_str()));
        last = run.end();
    }
    if parts.is_empty() {
        return None;
    }
    if last < content.len() {
        parts.push(Node::text(&content[last..]));
    }
    Some(parts)
}

impl Extension for KbdExtension {
    fn name(&self) -> &str {
        "kbd"
    }

    fn description(&self) -> String {
        "Adds support for keyboard key notation using ++key++ syntax".to_string()
    }

    fn transform_ast(&self, mut document: Node) -> Result<Node> {
        let keys = split_keys(&mut document);
        debug!(keys, "converted keyboard keys");
        Ok(document)
    }

    fn register_html_renderer(&self, renderer: &mut HtmlRenderer) {
        renderer.override_kind(KEYBOARD_KEY_KIND, |_, node, _| {
            format!("<kbd>{}</kbd>", escape_html(node.content.as_deref().unwrap_or("")))
        });
    }

    fn register_markdown_renderer(&self, renderer: &mut MarkdownRenderer) {
        renderer.override_kind(KEYBOARD_KEY_KIND, |_, node, _| {
            format!("++{}++", node.content.as_deref().unwrap_or("").replace('+', "\\+"))
        });
    }
}
