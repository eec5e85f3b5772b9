//! GitHub-style task list items (`- [ ] todo`, `- [x] done`).
//!
//! Detection happens on the tree: a list item whose first text starts with `[ ]`, `[x]`
//! or `[X]` followed by whitespace gets `task` and `checked` attributes and loses the
//! prefix. Rendering wraps the default list item renderer.

use super::Extension;
use crate::ast::Node;
use crate::error::Result;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// `(?s)` lets the remainder span soft line breaks
static TASK_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^\[([ xX])\]\s+(.*)$").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListExtension;

impl TaskListExtension {
    /// Mark every task list item in `document`
    pub fn mark_tasks(document: &mut Node) {
        let mut tasks = 0;
        document.walk_mut(&mut |node| {
            if node.is("list_item") && mark_task(node) {
                tasks += 1;
            }
        });
        debug!(tasks, "marked task list items");
    }
}

/// The Text holding the item's leading characters: the first child of its first child, or
/// the first child itself when that is text
fn leading_text(item: &mut Node) -> Option<&mut Node> {
    let first = item.children.first_mut()?;
    let text = if first.children.is_empty() {
        first
    } else {
        first.children.first_mut()?
    };
    text.is("text").then_some(text)
}

fn mark_task(item: &mut Node) -> bool {
    let Some(text) = leading_text(item) else {
        return false;
    };
    let Some(captures) = text.content.as_deref().and_then(|c| TASK_PREFIX.captures(c)) else {
        return false;
    };
    let checked = captures[1].eq_ignore_ascii_case("x");
    let rest = captures[2].to_string();
    text.content = Some(rest);

    item.set_attr("task", true);
    item.set_attr("checked", checked);
    true
}

fn checkbox(node: &Node) -> &'static str {
    if node.attr_bool("checked") {
        "[x]"
    } else {
        "[ ]"
    }
}

impl Extension for TaskListExtension {
    fn name(&self) -> &str {
        "tasklist"
    }

    fn description(&self) -> String {
        "Adds support for GitHub-style task lists with checkboxes".to_string()
    }

    fn transform_ast(&self, mut document: Node) -> Result<Node> {
        Self::mark_tasks(&mut document);
        Ok(document)
    }

    fn register_html_renderer(&self, renderer: &mut HtmlRenderer) {
        renderer.override_kind("list_item", |r, node, next| {
            if !node.attr_bool("task") {
                return next.render(r, node);
            }
            let checked = if node.attr_bool("checked") { " checked" } else { "" };
            let content = r.render_list_item_content(node);
            format!("<li><input type=\"checkbox\" disabled{checked}> {content}</li>\n")
        });
    }

    fn register_markdown_renderer(&self, renderer: &mut MarkdownRenderer) {
        renderer.override_kind("list_item", |r, node, next| {
            if !node.attr_bool("task") {
                return next.render(r, node);
            }
            format!("{} {}", checkbox(node), r.render_list_item_content(node))
        });
    }
}
