//! GitHub Flavored Markdown bundle: strikethrough plus task lists.
//!
//! Pipe tables and autolinks are on in the parser by default.

use super::{Extension, StrikethroughExtension, TaskListExtension};
use crate::ast::Node;
use crate::error::{ExtensionError, Result};
use crate::parse::Parser;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct GfmExtension {
    strikethrough: StrikethroughExtension,
    tasklist: TaskListExtension,
}

impl GfmExtension {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Extension for GfmExtension {
    fn name(&self) -> &str {
        "gfm"
    }

    fn description(&self) -> String {
        "GitHub Flavored Markdown support (tables, strikethrough, task lists)".to_string()
    }

    fn register_inline_rules(&self, parser: &mut dyn Parser) {
        self.strikethrough.register_inline_rules(parser);
    }

    fn transform_ast(&self, document: Node) -> Result<Node> {
        let document = self.strikethrough.transform_ast(document)?;
        self.tasklist.transform_ast(document)
    }

    fn register_html_renderer(&self, renderer: &mut HtmlRenderer) {
        self.strikethrough.register_html_renderer(renderer);
        self.tasklist.register_html_renderer(renderer);
    }

    fn register_markdown_renderer(&self, renderer: &mut MarkdownRenderer) {
        self.strikethrough.register_markdown_renderer(renderer);
        self.tasklist.register_markdown_renderer(renderer);
    }

    fn setup(&mut self) -> Result<(), ExtensionError> {
        self.strikethrough.setup()?;
        self.tasklist.setup()?;
        info!("gfm extension bundle initialized");
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), ExtensionError> {
        self.strikethrough.teardown()?;
        self.tasklist.teardown()
    }
}
