//! `~~text~~` spans.
//!
//! The grammar hook turns on comrak's strikethrough, which the parser adapter already
//! maps to `strikethrough` custom nodes; only rendering is added here.

use super::Extension;
use crate::parse::Parser;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use tracing::debug;

pub const STRIKETHROUGH_KIND: &str = "strikethrough";

#[derive(Debug, Clone, Copy, Default)]
pub struct StrikethroughExtension;

impl Extension for StrikethroughExtension {
    fn name(&self) -> &str {
        "strikethrough"
    }

    fn description(&self) -> String {
        "Adds support for strikethrough text using ~~text~~ syntax".to_string()
    }

    fn register_inline_rules(&self, parser: &mut dyn Parser) {
        parser.options_mut().strikethrough = true;
        debug!(parser = parser.name(), "enabled strikethrough grammar");
    }

    fn register_html_renderer(&self, renderer: &mut HtmlRenderer) {
        renderer.override_kind(STRIKETHROUGH_KIND, |r, node, _next| {
            format!("<del>{}</del>", r.render_children(node))
        });
    }

    fn register_markdown_renderer(&self, renderer: &mut MarkdownRenderer) {
        renderer.override_kind(STRIKETHROUGH_KIND, |r, node, _next| {
            format!("~~{}~~", r.render_children(node, ""))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::parse::MarkdownParser;
    use crate::render::Renderer;

    fn struck() -> Node {
        Node::document().with_child(
            Node::paragraph()
                .with_child(Node::text("was "))
                .with_child(Node::custom(STRIKETHROUGH_KIND).unwrap().with_child(Node::text("old"))),
        )
    }

    #[test]
    fn grammar_hook_enables_parsing() {
        let mut parser = MarkdownParser::new();
        StrikethroughExtension.register_inline_rules(&mut parser);
        let doc = parser.parse("~~gone~~\n").unwrap();
        assert_eq!(doc.find_all(STRIKETHROUGH_KIND).count(), 1);
    }

    #[test]
    fn renders_both_formats() {
        let mut html = HtmlRenderer::default();
        StrikethroughExtension.register_html_renderer(&mut html);
        assert_eq!(html.render(&struck()), "<p>was <del>old</del></p>\n");

        let mut markdown = MarkdownRenderer::default();
        StrikethroughExtension.register_markdown_renderer(&mut markdown);
        assert_eq!(markdown.render(&struck()), "was ~~old~~\n");
    }
}
