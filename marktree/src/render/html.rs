//! HTML rendering

use super::{Next, Overrides, RenderContext, RenderOverride, Renderer};
use crate::ast::{AttrValue, Node, NodeKind};
use crate::common::params::{param_bool, param_string, Params};
use crate::error::OptionError;
use std::sync::Arc;
use tracing::warn;

/// Attributes used for bookkeeping by transformers and extensions, never emitted
const BOOKKEEPING_ATTRS: [&str; 4] = ["reference_id", "task", "checked", "literal"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Self-closing void elements (`<hr />`, `<img ... />`)
    pub xhtml: bool,
    /// Turn newlines inside text into `<br>`
    pub breaks: bool,
    /// Prefix of the class attached to fenced code with a language
    pub lang_prefix: String,
    /// Replace `--` and `...` with their typographic forms
    pub typographer: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        HtmlOptions {
            xhtml: false,
            breaks: false,
            lang_prefix: "language-".to_string(),
            typographer: false,
        }
    }
}

impl HtmlOptions {
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let defaults = HtmlOptions::default();
        Ok(HtmlOptions {
            xhtml: param_bool(params, "xhtml", defaults.xhtml)?,
            breaks: param_bool(params, "breaks", defaults.breaks)?,
            lang_prefix: param_string(params, "lang_prefix", &defaults.lang_prefix),
            typographer: param_bool(params, "typographer", defaults.typographer)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
    context: RenderContext,
    overrides: Overrides<HtmlRenderer>,
}

impl HtmlRenderer {
    pub fn new(options: HtmlOptions) -> Self {
        HtmlRenderer {
            options,
            ..Self::default()
        }
    }

    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        Ok(Self::new(HtmlOptions::from_params(params)?))
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    /// Route rendering of `kind` through `render` first
    pub fn override_kind<F>(&mut self, kind: impl Into<String>, render: F)
    where
        F: Fn(&mut HtmlRenderer, &Node, Next<'_, HtmlRenderer>) -> String + Send + Sync + 'static,
    {
        let render: RenderOverride<HtmlRenderer> = Arc::new(render);
        self.overrides.add(kind, render);
    }

    pub fn has_override(&self, kind: &str) -> bool {
        self.overrides.has(kind)
    }

    pub fn render_node(&mut self, node: &Node) -> String {
        let chain = self.overrides.chain(node.kind_name());
        Next::new(&chain, Self::render_builtin).render(self, node)
    }

    /// Concatenated output of every child
    pub fn render_children(&mut self, node: &Node) -> String {
        node.children
            .iter()
            .map(|child| self.render_node(child))
            .collect()
    }

    fn render_builtin(&mut self, node: &Node) -> String {
        match &node.kind {
            NodeKind::Document => self.render_children(node),
            NodeKind::Heading { level } => {
                let content = self.render_children(node);
                format!("<h{level}{}>{content}</h{level}>\n", render_attrs(node, &[]))
            }
            NodeKind::Paragraph => {
                let content = self.render_children(node);
                if content.trim().is_empty() {
                    return String::new();
                }
                format!("<p{}>{content}</p>\n", render_attrs(node, &[]))
            }
            NodeKind::BlockQuote => {
                let content = self.render_children(node);
                format!("<blockquote{}>\n{content}</blockquote>\n", render_attrs(node, &[]))
            }
            NodeKind::HorizontalRule => {
                format!("<hr{}{}>\n", render_attrs(node, &[]), self.void_close())
            }
            NodeKind::Text => self.render_text(node.content.as_deref().unwrap_or("")),
            NodeKind::Emphasis => {
                let content = self.render_children(node);
                format!("<em{}>{content}</em>", render_attrs(node, &[]))
            }
            NodeKind::Strong => {
                let content = self.render_children(node);
                format!("<strong{}>{content}</strong>", render_attrs(node, &[]))
            }
            NodeKind::CodeBlock { language } => self.render_code_block(node, language.as_deref()),
            NodeKind::InlineCode => format!(
                "<code{}>{}</code>",
                render_attrs(node, &[]),
                escape_html(node.content.as_deref().unwrap_or(""))
            ),
            NodeKind::Link { href, title } => {
                let content = self.render_children(node);
                let mut leading = vec![("href", href.as_str())];
                if let Some(title) = title.as_deref().filter(|t| !t.is_empty()) {
                    leading.push(("title", title));
                }
                format!("<a{}>{content}</a>", render_attrs(node, &leading))
            }
            NodeKind::Image { src, alt, title } => {
                let mut leading = vec![("src", src.as_str()), ("alt", alt.as_str())];
                if let Some(title) = title.as_deref().filter(|t| !t.is_empty()) {
                    leading.push(("title", title));
                }
                format!("<img{}{}>", render_attrs(node, &leading), self.void_close())
            }
            NodeKind::List { ordered, start, tight } => {
                self.context.enter_list(*tight);
                let tag = if *ordered { "ol" } else { "ul" };
                let start = start.filter(|s| *ordered && *s != 1).map(|s| s.to_string());
                let leading: Vec<(&str, &str)> =
                    start.as_deref().map(|s| ("start", s)).into_iter().collect();
                let attrs = render_attrs(node, &leading);
                let content = self.render_children(node);
                self.context.exit_list();
                format!("<{tag}{attrs}>\n{content}</{tag}>\n")
            }
            NodeKind::ListItem => {
                let content = self.render_list_item_content(node);
                format!("<li{}>{content}</li>\n", render_attrs(node, &[]))
            }
            NodeKind::Table => self.render_table(node),
            NodeKind::TableRow => {
                let content = self.render_children(node);
                format!("<tr{}>\n{content}</tr>", render_attrs(node, &[]))
            }
            NodeKind::TableCell { header, align } => {
                let tag = if *header { "th" } else { "td" };
                let style = align.map(|a| format!("text-align: {};", a.as_str()));
                let leading: Vec<(&str, &str)> =
                    style.as_deref().map(|s| ("style", s)).into_iter().collect();
                let attrs = render_attrs(node, &leading);
                let content = self.render_children(node);
                format!("<{tag}{attrs}>{content}</{tag}>\n")
            }
            NodeKind::HtmlBlock | NodeKind::HtmlInline => node.content.clone().unwrap_or_default(),
            NodeKind::Custom { name } => {
                warn!(kind = %name, "unknown node type");
                format!("<!-- Unknown node type: {} -->", escape_html(name))
            }
        }
    }

    fn void_close(&self) -> &'static str {
        if self.options.xhtml {
            " /"
        } else {
            ""
        }
    }

    fn render_text(&self, text: &str) -> String {
        let mut text = escape_html(text);
        if self.options.breaks {
            text = text.replace('\n', "<br>\n");
        }
        if self.options.typographer {
            text = text.replace("--", "\u{2014}").replace("...", "\u{2026}");
        }
        text
    }

    fn render_code_block(&mut self, node: &Node, language: Option<&str>) -> String {
        self.context.enter_code_block();
        let code = escape_html(node.content.as_deref().unwrap_or(""));

        let mut class = node.attr_str("class").unwrap_or("").to_string();
        if let Some(language) = language.filter(|l| !l.is_empty()) {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str(&self.options.lang_prefix);
            class.push_str(language);
        }
        let leading: Vec<(&str, &str)> = if class.is_empty() {
            Vec::new()
        } else {
            vec![("class", class.as_str())]
        };
        let attrs = render_attrs(node, &leading);

        self.context.exit_code_block();
        format!("<pre><code{attrs}>{code}</code></pre>\n")
    }

    /// Item body; tight items drop the `<p>` around their paragraphs
    pub fn render_list_item_content(&mut self, node: &Node) -> String {
        if !self.context.tight_list() {
            return self.render_children(node);
        }
        let mut content = String::new();
        let mut after_paragraph = false;
        for child in &node.children {
            if after_paragraph {
                content.push('\n');
            }
            if child.is("paragraph") {
                content.push_str(&self.render_children(child));
                after_paragraph = true;
            } else {
                content.push_str(&self.render_node(child));
                after_paragraph = false;
            }
        }
        content.trim_end().to_string()
    }

    fn render_table(&mut self, node: &Node) -> String {
        self.context.enter_table();

        let rows: Vec<&Node> = node.children.iter().filter(|c| c.is("table_row")).collect();
        let header_count = rows.iter().take_while(|row| is_header_row(row)).count();
        let (head, body) = rows.split_at(header_count);

        let mut parts = vec![format!("<table{}>", render_attrs(node, &[]))];
        if !head.is_empty() {
            parts.push("<thead>".to_string());
            parts.extend(head.iter().map(|row| self.render_node(row)));
            parts.push("</thead>".to_string());
        }
        if !body.is_empty() {
            parts.push("<tbody>".to_string());
            parts.extend(body.iter().map(|row| self.render_node(row)));
            parts.push("</tbody>".to_string());
        }
        parts.push("</table>\n".to_string());

        self.context.exit_table();
        parts.join("\n")
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &str {
        "html"
    }

    fn render(&mut self, document: &Node) -> String {
        self.context.reset();
        self.render_node(document)
    }
}

fn is_header_row(row: &Node) -> bool {
    row.children
        .iter()
        .all(|cell| matches!(cell.kind, NodeKind::TableCell { header: true, .. }))
}

/// Escape `&`, `<`, `>` and `"`
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Attribute string with a leading space, `leading` pairs first, then the node's own
/// attributes. Keys already given in `leading` are not repeated.
fn render_attrs(node: &Node, leading: &[(&str, &str)]) -> String {
    let mut out = String::new();
    let mut written = Vec::new();
    for &(key, value) in leading {
        out.push_str(&format!(" {key}=\"{}\"", escape_html(value)));
        written.push(key);
    }
    for (key, value) in node.attributes.iter() {
        if BOOKKEEPING_ATTRS.contains(&key) || written.contains(&key) {
            continue;
        }
        if !is_attribute_name(key) {
            warn!(key, "skipping attribute with an invalid name");
            continue;
        }
        match value {
            AttrValue::Bool(true) => {
                out.push(' ');
                out.push_str(key);
            }
            AttrValue::Bool(false) => {}
            AttrValue::Str(value) => out.push_str(&format!(" {key}=\"{}\"", escape_html(value))),
            AttrValue::Int(value) => out.push_str(&format!(" {key}=\"{value}\"")),
        }
    }
    out
}

/// Rejects characters HTML forbids in attribute names
fn is_attribute_name(key: &str) -> bool {
    !key.is_empty()
        && !key.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Alignment;

    fn html(node: Node) -> String {
        HtmlRenderer::default().render(&Node::document().with_child(node))
    }

    fn para(text: &str) -> Node {
        Node::paragraph().with_child(Node::text(text))
    }

    #[test]
    fn escapes_text_once() {
        assert_eq!(html(para("a < b & \"c\"")), "<p>a &lt; b &amp; &quot;c&quot;</p>\n");
        let link = Node::link("/q?a=1&b=2", Some("T&C".to_string())).with_child(Node::text("q"));
        assert_eq!(
            html(Node::paragraph().with_child(link)),
            "<p><a href=\"/q?a=1&amp;b=2\" title=\"T&amp;C\">q</a></p>\n"
        );
    }

    #[test]
    fn heading_attributes_and_bookkeeping() {
        let heading = Node::heading(2)
            .unwrap()
            .with_child(Node::text("Intro"))
            .with_attr("id", "intro")
            .with_attr("hidden", true)
            .with_attr("draft", false)
            .with_attr("reference_id", "1");
        assert_eq!(html(heading), "<h2 id=\"intro\" hidden>Intro</h2>\n");
    }

    #[test]
    fn blank_paragraphs_are_dropped() {
        assert_eq!(html(para("   ")), "");
    }

    #[test]
    fn code_block_language_class() {
        let block = Node::code_block("x < y\n", Some("rust".to_string())).with_attr("class", "hl");
        assert_eq!(
            html(block),
            "<pre><code class=\"hl language-rust\">x &lt; y\n</code></pre>\n"
        );
    }

    #[test]
    fn tight_items_drop_paragraph_tags() {
        let list = Node::list(true, Some(2), true)
            .with_child(Node::list_item().with_child(para("one")))
            .with_child(Node::list_item().with_child(para("two")));
        assert_eq!(html(list), "<ol start=\"2\">\n<li>one</li>\n<li>two</li>\n</ol>\n");

        let loose = Node::list(false, None, false).with_child(Node::list_item().with_child(para("one")));
        assert_eq!(html(loose), "<ul>\n<li><p>one</p>\n</li>\n</ul>\n");
    }

    #[test]
    fn table_sections_and_alignment() {
        let table = Node::table()
            .with_child(
                Node::table_row().with_child(
                    Node::table_cell(true, Some(Alignment::Right)).with_child(Node::text("N")),
                ),
            )
            .with_child(
                Node::table_row().with_child(
                    Node::table_cell(false, Some(Alignment::Right)).with_child(Node::text("1")),
                ),
            );
        assert_eq!(
            html(table),
            "<table>\n<thead>\n<tr>\n<th style=\"text-align: right;\">N</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td style=\"text-align: right;\">1</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn xhtml_void_elements() {
        let mut renderer = HtmlRenderer::new(HtmlOptions {
            xhtml: true,
            ..HtmlOptions::default()
        });
        let doc = Node::document()
            .with_child(Node::horizontal_rule())
            .with_child(Node::paragraph().with_child(Node::image("a.png", "A", None)));
        assert_eq!(renderer.render(&doc), "<hr />\n<p><img src=\"a.png\" alt=\"A\" /></p>\n");
    }

    #[test]
    fn breaks_and_typographer() {
        let mut renderer = HtmlRenderer::new(HtmlOptions {
            breaks: true,
            typographer: true,
            ..HtmlOptions::default()
        });
        let doc = Node::document().with_child(para("wait... what--\nreally"));
        assert_eq!(
            renderer.render(&doc),
            "<p>wait\u{2026} what\u{2014}<br>\nreally</p>\n"
        );
    }

    #[test]
    fn unknown_kind_becomes_comment() {
        assert_eq!(
            html(Node::custom("widget").unwrap()),
            "<!-- Unknown node type: widget -->"
        );
        assert_eq!(
            html(Node::custom("x --> <b>").unwrap()),
            "<!-- Unknown node type: x --&gt; &lt;b&gt; -->"
        );
    }

    #[test]
    fn malformed_attribute_names_are_skipped() {
        let node = para("p")
            .with_attr("class", "lead")
            .with_attr("onclick=\"x\" data-a", "1")
            .with_attr("a>b", true);
        assert_eq!(html(node), "<p class=\"lead\">p</p>\n");
    }

    #[test]
    fn raw_html_passes_through() {
        assert_eq!(html(Node::html_block("<div>x</div>\n")), "<div>x</div>\n");
    }

    #[test]
    fn override_can_replace_builtin() {
        let mut renderer = HtmlRenderer::default();
        renderer.override_kind("emphasis", |r, n, _next| format!("<i>{}</i>", r.render_children(n)));
        let doc = Node::document()
            .with_child(Node::paragraph().with_child(Node::emphasis().with_child(Node::text("x"))));
        assert_eq!(renderer.render(&doc), "<p><i>x</i></p>\n");
    }
}
