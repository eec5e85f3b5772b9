//! Markdown parsing (Markdown → document tree)
//!
//! Pipeline: Markdown string → Comrak AST → Events → document tree

use super::{preprocess, Capabilities, ParseOptions, Parser};
use crate::ast::{Alignment, Event, Node};
use crate::common::flat_to_nested::events_to_tree;
use crate::error::ParseError;
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};
use tracing::{debug, warn};

/// CommonMark + GFM parser backed by comrak
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    options: ParseOptions,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        MarkdownParser { options }
    }

    /// The flat event stream for `text`, before tree building
    pub fn events(&self, text: &str) -> Vec<Event> {
        let source = preprocess(text);
        let arena = Arena::new();
        let comrak_options = self.comrak_options();
        let root = parse_document(&arena, &source, &comrak_options);

        let mut collector = EventCollector::default();
        collector.collect(root);
        collector.events
    }

    fn comrak_options(&self) -> ComrakOptions<'static> {
        let mut options = ComrakOptions::default();
        options.extension.table = self.options.tables;
        options.extension.autolink = self.options.autolink;
        options.extension.strikethrough = self.options.strikethrough;
        options.parse.smart = self.options.smart;
        options
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn parse(&self, text: &str) -> Result<Node, ParseError> {
        let events = self.events(text);
        debug!(events = events.len(), "building tree from comrak events");
        let document = events_to_tree(&events)?;
        Ok(document)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            tables: self.options.tables,
            strikethrough: self.options.strikethrough,
            smart_quotes: self.options.smart,
            custom_extensions: true,
            ..Capabilities::default()
        }
    }

    fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ParseOptions {
        &mut self.options
    }
}

#[derive(Default)]
struct EventCollector {
    events: Vec<Event>,
}

impl EventCollector {
    fn collect<'a>(&mut self, root: &'a AstNode<'a>) {
        self.events.push(Event::StartDocument);
        self.children(root);
        self.events.push(Event::EndDocument);
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>) {
        for child in node.children() {
            self.node(child);
        }
    }

    fn wrapped<'a>(&mut self, node: &'a AstNode<'a>, start: Event, end: Event) {
        self.events.push(start);
        self.children(node);
        self.events.push(end);
    }

    fn node<'a>(&mut self, node: &'a AstNode<'a>) {
        let data = node.data.borrow();

        match &data.value {
            NodeValue::Document => self.children(node),
            NodeValue::Heading(heading) => self.wrapped(
                node,
                Event::StartHeading(heading.level),
                Event::EndHeading(heading.level),
            ),
            NodeValue::Paragraph => self.wrapped(node, Event::StartParagraph, Event::EndParagraph),
            NodeValue::BlockQuote => self.wrapped(node, Event::StartBlockQuote, Event::EndBlockQuote),
            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                let start = if ordered {
                    i64::try_from(list.start).ok()
                } else {
                    None
                };
                self.wrapped(
                    node,
                    Event::StartList {
                        ordered,
                        start,
                        tight: list.tight,
                    },
                    Event::EndList,
                );
            }
            NodeValue::Item(_) => self.wrapped(node, Event::StartListItem, Event::EndListItem),
            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .map(str::to_string);
                self.events.push(Event::CodeBlock {
                    language,
                    content: code_block.literal.clone(),
                });
            }
            NodeValue::HtmlBlock(html) => self.events.push(Event::Html {
                block: true,
                content: html.literal.clone(),
            }),
            NodeValue::ThematicBreak => self.events.push(Event::Rule),
            NodeValue::Table(table) => {
                let alignments: Vec<Option<Alignment>> =
                    table.alignments.iter().map(convert_alignment).collect();
                self.events.push(Event::StartTable);
                for row in node.children() {
                    self.table_row(row, &alignments);
                }
                self.events.push(Event::EndTable);
            }
            NodeValue::Text(text) => self.events.push(Event::Text(text.clone())),
            NodeValue::SoftBreak | NodeValue::LineBreak => self.events.push(Event::LineBreak),
            NodeValue::Code(code) => self.events.push(Event::Code(code.literal.clone())),
            NodeValue::HtmlInline(html) => self.events.push(Event::Html {
                block: false,
                content: html.clone(),
            }),
            NodeValue::Emph => self.wrapped(node, Event::StartEmphasis, Event::EndEmphasis),
            NodeValue::Strong => self.wrapped(node, Event::StartStrong, Event::EndStrong),
            NodeValue::Strikethrough => self.wrapped(
                node,
                Event::StartCustom("strikethrough".to_string()),
                Event::EndCustom("strikethrough".to_string()),
            ),
            NodeValue::Link(link) => self.wrapped(
                node,
                Event::StartLink {
                    href: link.url.clone(),
                    title: non_empty(&link.title),
                },
                Event::EndLink,
            ),
            NodeValue::Image(link) => {
                let mut alt = String::new();
                for child in node.children() {
                    collect_plain_text(child, &mut alt);
                }
                self.events.push(Event::Image {
                    src: link.url.clone(),
                    alt,
                    title: non_empty(&link.title),
                });
            }
            other => {
                if node.first_child().is_some() {
                    warn!(node = ?other, "unsupported markdown construct, keeping its content");
                    self.children(node);
                } else {
                    warn!(node = ?other, "unsupported markdown construct skipped");
                }
            }
        }
    }

    fn table_row<'a>(&mut self, row: &'a AstNode<'a>, alignments: &[Option<Alignment>]) {
        let header = match &row.data.borrow().value {
            NodeValue::TableRow(header) => *header,
            other => {
                warn!(node = ?other, "unexpected table child skipped");
                return;
            }
        };

        self.events.push(Event::StartTableRow);
        for (column, cell) in row.children().enumerate() {
            let align = alignments.get(column).copied().flatten();
            self.wrapped(
                cell,
                Event::StartTableCell { header, align },
                Event::EndTableCell,
            );
        }
        self.events.push(Event::EndTableRow);
    }
}

fn convert_alignment(alignment: &TableAlignment) -> Option<Alignment> {
    match alignment {
        TableAlignment::Left => Some(Alignment::Left),
        TableAlignment::Right => Some(Alignment::Right),
        TableAlignment::Center => Some(Alignment::Center),
        TableAlignment::None => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Collect text content from a node (for image alt text)
fn collect_plain_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_plain_text(child, output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    fn parse(text: &str) -> Node {
        MarkdownParser::new().parse(text).unwrap()
    }

    #[test]
    fn parses_headings_and_paragraphs() {
        let doc = parse("# Title\n\nSome *emphasis* here.\n");
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.children[0].heading_level(), Some(1));
        let para = &doc.children[1];
        assert!(para.is("paragraph"));
        let kinds: Vec<_> = para.children.iter().map(|c| c.kind_name()).collect();
        assert_eq!(kinds, vec!["text", "emphasis", "text"]);
    }

    #[test]
    fn parses_list_shape() {
        let doc = parse("3. three\n4. four\n");
        assert_eq!(
            doc.children[0].kind,
            NodeKind::List {
                ordered: true,
                start: Some(3),
                tight: true
            }
        );
        assert_eq!(doc.children[0].children.len(), 2);

        let loose = parse("- a\n\n- b\n");
        assert!(matches!(loose.children[0].kind, NodeKind::List { tight: false, .. }));
    }

    #[test]
    fn parses_links_with_titles() {
        let doc = parse("[docs](https://example.com \"Docs\")\n");
        let link = &doc.children[0].children[0];
        assert_eq!(
            link.kind,
            NodeKind::Link {
                href: "https://example.com".to_string(),
                title: Some("Docs".to_string())
            }
        );
    }

    #[test]
    fn parses_tables_with_alignment() {
        let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let table = &doc.children[0];
        assert!(table.is("table"));
        assert_eq!(table.children.len(), 2);
        assert_eq!(
            table.children[0].children[0].kind,
            NodeKind::TableCell {
                header: true,
                align: Some(Alignment::Left)
            }
        );
        assert_eq!(
            table.children[1].children[1].kind,
            NodeKind::TableCell {
                header: false,
                align: Some(Alignment::Right)
            }
        );
    }

    #[test]
    fn code_block_language_is_first_info_word() {
        let doc = parse("```rust ignore\nfn main() {}\n```\n");
        let block = &doc.children[0];
        assert_eq!(
            block.kind,
            NodeKind::CodeBlock {
                language: Some("rust".to_string())
            }
        );
        assert_eq!(block.content.as_deref(), Some("fn main() {}\n"));
    }

    #[test]
    fn strikethrough_needs_the_grammar_switch() {
        let plain = parse("~~gone~~\n");
        assert!(plain.find_all("strikethrough").next().is_none());

        let mut parser = MarkdownParser::new();
        parser.options_mut().strikethrough = true;
        let doc = parser.parse("~~gone~~\n").unwrap();
        assert_eq!(doc.find_all("strikethrough").count(), 1);
        assert!(parser.capabilities().strikethrough);
    }

    #[test]
    fn soft_breaks_become_newlines_in_one_text_node() {
        let doc = parse("first\nsecond\n");
        let para = &doc.children[0];
        assert_eq!(para.children.len(), 1);
        assert_eq!(para.children[0].content.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn raw_html_is_preserved() {
        let doc = parse("<div>raw</div>\n\ntext <b>bold</b>\n");
        assert!(doc.children[0].is("html_block"));
        assert_eq!(doc.children[1].find_all("html_inline").count(), 2);
    }

    #[test]
    fn image_alt_text_is_flattened() {
        let doc = parse("![a *fancy* pic](pic.png)\n");
        let image = &doc.children[0].children[0];
        assert_eq!(
            image.kind,
            NodeKind::Image {
                src: "pic.png".to_string(),
                alt: "a fancy pic".to_string(),
                title: None
            }
        );
    }
}
