//! Markdown serialization (document tree → Markdown)
//!
//! The output is meant to re-parse into an equivalent tree: text is backslash-escaped,
//! code spans and fences grow past any backtick run in their content, and tables are
//! padded into aligned pipe tables.

use super::{Next, Overrides, RenderContext, RenderOverride, Renderer};
use crate::ast::{Alignment, Node, NodeKind};
use crate::common::params::{param_char, param_int, param_string, Params};
use crate::error::OptionError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters backslash-escaped in text
const ESCAPED_CHARS: [char; 15] = [
    '*', '_', '`', '[', ']', '(', ')', '#', '+', '-', '!', '|', '{', '}', '\\',
];

/// Indent for continuation lines of a list item
const LIST_CONTINUATION: &str = "   ";

const MIN_COLUMN_WIDTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    #[default]
    Atx,
    /// Underlined headings for levels 1 and 2; deeper levels stay ATX
    Setext,
}

impl std::str::FromStr for HeadingStyle {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atx" => Ok(HeadingStyle::Atx),
            "setext" => Ok(HeadingStyle::Setext),
            _ => Err(OptionError::invalid("heading_style", s, "atx or setext")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    pub heading_style: HeadingStyle,
    pub emphasis_char: String,
    pub strong_char: String,
    pub bullet_char: char,
    pub code_fence: char,
    /// Wrap paragraphs at this width; 0 disables wrapping
    pub line_width: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        MarkdownOptions {
            heading_style: HeadingStyle::Atx,
            emphasis_char: "*".to_string(),
            strong_char: "**".to_string(),
            bullet_char: '-',
            code_fence: '`',
            line_width: 0,
        }
    }
}

impl MarkdownOptions {
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let emphasis_char = param_string(params, "emphasis_char", "*");
        if !matches!(emphasis_char.as_str(), "*" | "_") {
            return Err(OptionError::invalid("emphasis_char", &emphasis_char, "* or _"));
        }
        let strong_char = param_string(params, "strong_char", "**");
        if !matches!(strong_char.as_str(), "**" | "__") {
            return Err(OptionError::invalid("strong_char", &strong_char, "** or __"));
        }
        let bullet_char = param_char(params, "bullet_char", '-')?;
        if !matches!(bullet_char, '-' | '*' | '+') {
            return Err(OptionError::invalid("bullet_char", &bullet_char.to_string(), "-, * or +"));
        }
        let code_fence = param_char(params, "code_fence", '`')?;
        if !matches!(code_fence, '`' | '~') {
            return Err(OptionError::invalid("code_fence", &code_fence.to_string(), "` or ~"));
        }
        let width = param_int(params, "line_width", 0)?;
        let line_width = usize::try_from(width)
            .map_err(|_| OptionError::invalid("line_width", &width.to_string(), "a width of 0 or more"))?;

        Ok(MarkdownOptions {
            heading_style: param_string(params, "heading_style", "atx").parse()?,
            emphasis_char,
            strong_char,
            bullet_char,
            code_fence,
            line_width,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    context: RenderContext,
    overrides: Overrides<MarkdownRenderer>,
}

impl MarkdownRenderer {
    pub fn new(options: MarkdownOptions) -> Self {
        MarkdownRenderer {
            options,
            ..Self::default()
        }
    }

    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        Ok(Self::new(MarkdownOptions::from_params(params)?))
    }

    pub fn options(&self) -> &MarkdownOptions {
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
        F: Fn(&mut MarkdownRenderer, &Node, Next<'_, MarkdownRenderer>) -> String
            + Send
            + Sync
            + 'static,
    {
        let render: RenderOverride<MarkdownRenderer> = Arc::new(render);
        self.overrides.add(kind, render);
    }

    pub fn has_override(&self, kind: &str) -> bool {
        self.overrides.has(kind)
    }

    /// Render one node, honouring overrides
    pub fn render_node(&mut self, node: &Node) -> String {
        let chain = self.overrides.chain(node.kind_name());
        Next::new(&chain, Self::render_builtin).render(self, node)
    }

    /// Render the children of `node`, skipping empty output, joined by `separator`
    pub fn render_children(&mut self, node: &Node, separator: &str) -> String {
        let parts: Vec<String> = node
            .children
            .iter()
            .map(|child| self.render_node(child))
            .filter(|rendered| !rendered.is_empty())
            .collect();
        parts.join(separator)
    }

    fn render_builtin(&mut self, node: &Node) -> String {
        match &node.kind {
            NodeKind::Document => self.render_document(node),
            NodeKind::Heading { level } => self.render_heading(node, *level),
            NodeKind::Paragraph => self.render_paragraph(node),
            NodeKind::BlockQuote => self.render_blockquote(node),
            NodeKind::HorizontalRule => "---".to_string(),
            NodeKind::Text => self.render_text(node),
            NodeKind::Emphasis => {
                let content = self.render_children(node, "");
                let marker = &self.options.emphasis_char;
                format!("{marker}{content}{marker}")
            }
            NodeKind::Strong => {
                let content = self.render_children(node, "");
                let marker = &self.options.strong_char;
                format!("{marker}{content}{marker}")
            }
            NodeKind::CodeBlock { language } => self.render_code_block(node, language.as_deref()),
            NodeKind::InlineCode => render_inline_code(node.content.as_deref().unwrap_or("")),
            NodeKind::Link { href, title } => self.render_link(node, href, title.as_deref()),
            NodeKind::Image { src, alt, title } => {
                format!("![{}]({})", escape_markdown(alt), destination(src, title.as_deref()))
            }
            NodeKind::List { ordered, start, tight } => {
                self.render_list(node, *ordered, *start, *tight)
            }
            NodeKind::ListItem => self.render_list_item_content(node),
            NodeKind::Table => self.render_table(node),
            NodeKind::TableRow | NodeKind::TableCell { .. } => {
                self.render_children(node, " | ")
            }
            NodeKind::HtmlBlock => node.content.as_deref().unwrap_or("").trim_end().to_string(),
            NodeKind::HtmlInline => node.content.clone().unwrap_or_default(),
            NodeKind::Custom { name } => {
                warn!(kind = %name, "unknown node type");
                String::new()
            }
        }
    }

    fn render_document(&mut self, node: &Node) -> String {
        let blocks: Vec<String> = node
            .children
            .iter()
            .map(|child| self.render_node(child).trim_end().to_string())
            .filter(|block| !block.is_empty())
            .collect();
        format!("{}\n", blocks.join("\n\n"))
    }

    fn render_heading(&mut self, node: &Node, level: u8) -> String {
        let content = self.render_children(node, "");
        if self.options.heading_style == HeadingStyle::Setext && level <= 2 {
            let underline = if level == 1 { "=" } else { "-" };
            return format!("{content}\n{}", underline.repeat(content.chars().count()));
        }
        format!("{} {content}", "#".repeat(usize::from(level)))
    }

    fn render_paragraph(&mut self, node: &Node) -> String {
        let content = self.render_children(node, "");
        if self.options.line_width > 0 {
            wrap_text(&content, self.options.line_width)
        } else {
            content
        }
    }

    fn render_blockquote(&mut self, node: &Node) -> String {
        let content = self.render_children(node, "\n\n");
        content
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_text(&mut self, node: &Node) -> String {
        let text = node.content.as_deref().unwrap_or("");
        if node.attr_bool("literal") {
            return text.to_string();
        }
        escape_markdown(text)
    }

    fn render_code_block(&mut self, node: &Node, language: Option<&str>) -> String {
        self.context.enter_code_block();
        let content = node.content.as_deref().unwrap_or("");
        let mut fence = self.options.code_fence.to_string().repeat(3);
        if content.contains(&fence) {
            fence.push(self.options.code_fence);
        }
        let content = content.strip_suffix('\n').unwrap_or(content);
        let rendered = format!("{fence}{}\n{content}\n{fence}", language.unwrap_or(""));
        self.context.exit_code_block();
        rendered
    }

    fn render_link(&mut self, node: &Node, href: &str, title: Option<&str>) -> String {
        let text = self.render_children(node, "");
        if let Some(reference) = node.attr_str("reference_id").filter(|id| !id.is_empty()) {
            return format!("[{text}][{reference}]");
        }
        format!("[{text}]({})", destination(href, title))
    }

    fn render_list(&mut self, node: &Node, ordered: bool, start: Option<i64>, tight: bool) -> String {
        self.context.enter_list(tight);

        let first_number = start.unwrap_or(1);
        let mut items = Vec::new();
        for (index, child) in node.children.iter().filter(|c| c.is("list_item")).enumerate() {
            let marker = if ordered {
                format!("{}.", first_number + index as i64)
            } else {
                self.options.bullet_char.to_string()
            };

            let content = self.render_node(child);
            let mut lines = content.split('\n');
            let first = lines.next().unwrap_or("");
            let mut item = format!("{marker} {first}").trim_end().to_string();
            for line in lines {
                item.push('\n');
                if !line.is_empty() {
                    item.push_str(LIST_CONTINUATION);
                    item.push_str(line);
                }
            }
            items.push(item);
        }

        self.context.exit_list();
        let separator = if tight { "\n" } else { "\n\n" };
        items.join(separator)
    }

    /// Item body; tight items are trimmed and keep their blocks on adjacent lines
    pub fn render_list_item_content(&mut self, node: &Node) -> String {
        if self.context.tight_list() {
            self.render_children(node, "\n").trim().to_string()
        } else {
            self.render_children(node, "\n\n")
        }
    }

    fn render_table(&mut self, node: &Node) -> String {
        let rows: Vec<&Node> = node.children.iter().filter(|c| c.is("table_row")).collect();
        if rows.is_empty() {
            return String::new();
        }
        self.context.enter_table();

        let cells: Vec<Vec<(String, Option<Alignment>)>> = rows
            .iter()
            .map(|row| {
                row.children
                    .iter()
                    .filter_map(|cell| match cell.kind {
                        NodeKind::TableCell { align, .. } => {
                            Some((self.render_children(cell, "").trim().to_string(), align))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![MIN_COLUMN_WIDTH; columns];
        for row in &cells {
            for (column, (content, _)) in row.iter().enumerate() {
                widths[column] = widths[column].max(content.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(cells.len() + 1);
        for (index, row) in cells.iter().enumerate() {
            lines.push(table_line(row.iter().enumerate().map(|(column, (content, align))| {
                pad_cell(content, widths[column], *align)
            })));
            if index == 0 {
                // the separator row takes its alignments from the first row
                lines.push(table_line(widths.iter().enumerate().map(|(column, width)| {
                    let align = row.get(column).and_then(|(_, align)| *align);
                    separator_cell(*width, align)
                })));
            }
        }

        self.context.exit_table();
        debug!(rows = rows.len(), columns, "rendered table");
        lines.join("\n")
    }
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &str {
        "markdown"
    }

    fn render(&mut self, document: &Node) -> String {
        self.context.reset();
        let output = self.render_node(document);
        format!("{}\n", output.trim_end())
    }
}

/// Backslash-escape Markdown punctuation; backslashes first so escapes are not doubled
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if ESCAPED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Fence inline code with the shortest backtick run not contained in it
fn render_inline_code(content: &str) -> String {
    let mut fence = "`".to_string();
    while content.contains(&fence) {
        fence.push('`');
    }
    if content.starts_with('`') || content.ends_with('`') {
        format!("{fence} {content} {fence}")
    } else {
        format!("{fence}{content}{fence}")
    }
}

/// Link or image destination with optional title
fn destination(href: &str, title: Option<&str>) -> String {
    let target = if href.contains([' ', '(', ')']) {
        format!("<{href}>")
    } else {
        href.to_string()
    };
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!("{target} \"{}\"", title.replace('"', "\\\"")),
        None => target,
    }
}

fn table_line(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

fn pad_cell(content: &str, width: usize, align: Option<Alignment>) -> String {
    let padding = width.saturating_sub(content.chars().count());
    match align {
        Some(Alignment::Right) => format!("{}{content}", " ".repeat(padding)),
        Some(Alignment::Center) => {
            let left = padding / 2;
            format!("{}{content}{}", " ".repeat(left), " ".repeat(padding - left))
        }
        _ => format!("{content}{}", " ".repeat(padding)),
    }
}

fn separator_cell(width: usize, align: Option<Alignment>) -> String {
    match align {
        Some(Alignment::Right) => format!("{}:", "-".repeat(width - 1)),
        Some(Alignment::Center) => format!(":{}:", "-".repeat(width - 2)),
        Some(Alignment::Left) => format!(":{}", "-".repeat(width - 1)),
        None => "-".repeat(width),
    }
}

/// Greedy word wrap
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len + word_len + current.len() <= width {
            current.push(word);
            current_len += word_len;
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines.join("\n")
}
