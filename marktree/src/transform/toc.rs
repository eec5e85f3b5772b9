//! Table of contents generation.
//!
//! Headings in the configured level range are collected in document order and nested with
//! a level stack. The stack starts with the root list at a sentinel level of -1; levels are
//! shifted so the smallest collected level becomes 0, which makes the nesting independent
//! of the absolute heading levels in use. For every heading:
//!
//! 1. pop while the top of the stack is at the same or a deeper level,
//! 2. append an item to the list on top,
//! 3. open a nested list inside that item, one level below the heading.
//!
//! Nested lists that never receive an item are dropped when they are closed.
//!
//! The finished TOC (an optional level-2 title heading followed by the list) replaces a
//! paragraph consisting only of the marker text, or is inserted near the top of the document:
//! after a leading level-1 heading, else before the first block that is not front matter.

use super::Transformer;
use crate::ast::{Node, NodeKind};
use crate::common::params::{param_bool, param_level, param_string, Params};
use crate::common::text::extract_text;
use crate::error::{OptionError, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocOptions {
    pub min_level: u8,
    pub max_level: u8,
    /// Title heading; empty for none
    pub title: String,
    /// Paragraph text replaced by the TOC
    pub marker: String,
    /// Insert into the document, or only build it (see [`TocGenerator::toc`])
    pub insert: bool,
    pub ordered: bool,
}

impl Default for TocOptions {
    fn default() -> Self {
        TocOptions {
            min_level: 1,
            max_level: 3,
            title: "Table of Contents".to_string(),
            marker: "[[TOC]]".to_string(),
            insert: true,
            ordered: false,
        }
    }
}

impl TocOptions {
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let defaults = TocOptions::default();
        Ok(TocOptions {
            min_level: param_level(params, "min_level", defaults.min_level)?,
            max_level: param_level(params, "max_level", defaults.max_level)?,
            title: param_string(params, "title", &defaults.title),
            marker: param_string(params, "marker", &defaults.marker),
            insert: param_bool(params, "insert", defaults.insert)?,
            ordered: param_bool(params, "ordered", defaults.ordered)?,
        })
    }
}

#[derive(Debug, Clone)]
struct TocEntry {
    level: u8,
    text: String,
    id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TocGenerator {
    options: TocOptions,
    toc: Option<Node>,
}

impl TocGenerator {
    pub fn new(options: TocOptions) -> Self {
        TocGenerator { options, toc: None }
    }

    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        Ok(Self::new(TocOptions::from_params(params)?))
    }

    /// TOC built by the last run, as a document holding the title and the list
    pub fn toc(&self) -> Option<&Node> {
        self.toc.as_ref()
    }

    pub fn apply(&mut self, document: Node) -> Node {
        let entries = self.collect_entries(&document);
        self.toc = if entries.is_empty() {
            None
        } else {
            Some(self.build_toc(&entries))
        };

        match (&self.toc, self.options.insert) {
            (Some(toc), true) => {
                let toc = toc.clone();
                insert_toc(document, toc, &self.options.marker)
            }
            _ => document,
        }
    }

    fn collect_entries(&self, document: &Node) -> Vec<TocEntry> {
        let range = self.options.min_level..=self.options.max_level;
        document
            .walk()
            .filter_map(|node| {
                let level = node.heading_level().filter(|level| range.contains(level))?;
                let entry = TocEntry {
                    level,
                    text: extract_text(node),
                    id: node.attr_str("id").filter(|id| !id.is_empty()).map(str::to_string),
                };
                debug!(level, text = %entry.text, id = ?entry.id, "found heading");
                Some(entry)
            })
            .collect()
    }

    fn build_toc(&self, entries: &[TocEntry]) -> Node {
        let mut container = Node::document();
        if !self.options.title.is_empty() {
            let title = Node::new(NodeKind::Heading { level: 2 })
                .with_child(Node::text(self.options.title.clone()));
            container.add_child(title);
        }
        container.add_child(self.build_list(entries));
        info!(entries = entries.len(), "generated table of contents");
        container
    }

    fn build_list(&self, entries: &[TocEntry]) -> Node {
        let base = entries.iter().map(|e| e.level).min().unwrap_or(1);
        let mut stack: Vec<(Node, i64)> = vec![(self.new_list(), -1)];

        for entry in entries {
            let level = i64::from(entry.level - base);
            while stack.last().is_some_and(|(_, top)| *top >= level) {
                close_list(&mut stack);
            }
            if let Some((list, _)) = stack.last_mut() {
                list.add_child(entry_item(entry));
            }
            stack.push((self.new_list(), level));
        }

        while stack.len() > 1 {
            close_list(&mut stack);
        }
        stack
            .pop()
            .map(|(root, _)| root)
            .unwrap_or_else(|| self.new_list())
    }

    fn new_list(&self) -> Node {
        let start = if self.options.ordered { Some(1) } else { None };
        Node::list(self.options.ordered, start, true)
    }
}

/// Pop the top list and hang it under the last item of the list below, unless it is empty
fn close_list(stack: &mut Vec<(Node, i64)>) {
    let Some((list, _)) = stack.pop() else {
        return;
    };
    if list.children.is_empty() {
        return;
    }
    if let Some(item) = stack
        .last_mut()
        .and_then(|(parent, _)| parent.children.last_mut())
    {
        item.add_child(list);
    }
}

fn entry_item(entry: &TocEntry) -> Node {
    let label = Node::text(entry.text.clone());
    let content = match &entry.id {
        Some(id) => Node::link(format!("#{id}"), None).with_child(label),
        None => label,
    };
    Node::list_item().with_child(content)
}

fn is_marker(node: &Node, marker: &str) -> bool {
    node.is("paragraph")
        && node.children.len() == 1
        && node.children[0].is("text")
        && node.children[0]
            .content
            .as_deref()
            .is_some_and(|text| text.trim() == marker)
}

fn insert_toc(mut document: Node, toc: Node, marker: &str) -> Node {
    let marker_path = document.find_path(|node| is_marker(node, marker));

    if let Some((&index, parent_path)) = marker_path.as_deref().and_then(<[usize]>::split_last) {
        if let Ok(parent) = document.node_at_path_mut(parent_path) {
            parent.children.splice(index..=index, toc.children);
            info!(marker, "replaced marker with table of contents");
        }
        return document;
    }

    let position = insert_position(&document);
    document.children.splice(position..position, toc.children);
    info!(position, "inserted table of contents");
    document
}

fn insert_position(document: &Node) -> usize {
    for (index, child) in document.children.iter().enumerate() {
        if child.is("paragraph") {
            let text = extract_text(child);
            let text = text.trim();
            if text.starts_with("---") || text.starts_with("+++") {
                continue;
            }
        }
        if child.heading_level() == Some(1) {
            return index + 1;
        }
        return index;
    }
    document.children.len()
}

impl Transformer for TocGenerator {
    fn name(&self) -> &str {
        "toc"
    }

    fn description(&self) -> String {
        format!(
            "Generates table of contents from headings (levels {}-{})",
            self.options.min_level, self.options.max_level
        )
    }

    fn transform(&mut self, document: Node) -> Result<Node> {
        Ok(self.apply(document))
    }
}

/// Build the TOC for `document` without touching it
pub fn extract_toc(document: &Node, max_level: u8) -> Option<Node> {
    let mut generator = TocGenerator::new(TocOptions {
        max_level,
        insert: false,
        ..TocOptions::default()
    });
    let entries = generator.collect_entries(document);
    if entries.is_empty() {
        return None;
    }
    generator.toc = Some(generator.build_toc(&entries));
    generator.toc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ids::add_heading_ids;

    fn heading(level: u8, text: &str) -> Node {
        Node::heading(level).unwrap().with_child(Node::text(text))
    }

    fn para(text: &str) -> Node {
        Node::paragraph().with_child(Node::text(text))
    }

    /// Labels of a TOC list with their nesting depth
    fn outline(list: &Node, depth: usize, out: &mut Vec<(usize, String)>) {
        for item in &list.children {
            for child in &item.children {
                if child.is("list") {
                    outline(child, depth + 1, out);
                } else {
                    out.push((depth, extract_text(child)));
                }
            }
        }
    }

    fn toc_outline(toc: &Node) -> Vec<(usize, String)> {
        let mut out = Vec::new();
        if let Some(list) = toc.children.iter().find(|c| c.is("list")) {
            outline(list, 0, &mut out);
        }
        out
    }

    #[test]
    fn level_stack_nests_non_monotonic_sequences() {
        let doc = Node::document()
            .with_child(heading(1, "A"))
            .with_child(heading(3, "B"))
            .with_child(heading(2, "C"))
            .with_child(heading(3, "D"));
        let toc = extract_toc(&doc, 3).unwrap();
        assert_eq!(
            toc_outline(&toc),
            vec![
                (0, "A".to_string()),
                (1, "B".to_string()),
                (1, "C".to_string()),
                (2, "D".to_string()),
            ]
        );

        // B and C share A's nested list; D sits in a list under C
        let root = &toc.children[1];
        let a_nested = &root.children[0].children[1];
        assert_eq!(a_nested.children.len(), 2);
        let c_item = &a_nested.children[1];
        assert!(c_item.children[1].is("list"));
    }

    #[test]
    fn nesting_ignores_absolute_levels() {
        let doc = Node::document()
            .with_child(heading(2, "One"))
            .with_child(heading(3, "Two"))
            .with_child(heading(2, "Three"));
        let toc = extract_toc(&doc, 3).unwrap();
        assert_eq!(
            toc_outline(&toc),
            vec![(0, "One".to_string()), (1, "Two".to_string()), (0, "Three".to_string())]
        );
    }

    #[test]
    fn leaves_have_no_empty_nested_lists() {
        let doc = Node::document().with_child(heading(1, "Only"));
        let toc = extract_toc(&doc, 3).unwrap();
        let item = &toc.children[1].children[0];
        assert_eq!(item.children.len(), 1);
    }

    #[test]
    fn entries_link_to_ids_when_present() {
        let doc = add_heading_ids(
            Node::document()
                .with_child(heading(1, "Intro"))
                .with_child(heading(2, "Usage")),
        );
        let toc = extract_toc(&doc, 3).unwrap();
        let hrefs: Vec<_> = toc
            .find_all("link")
            .map(|link| match &link.kind {
                NodeKind::Link { href, .. } => href.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(hrefs, vec!["#intro", "#usage"]);
    }

    #[test]
    fn marker_paragraph_is_replaced() {
        let doc = Node::document()
            .with_child(heading(1, "Title"))
            .with_child(para("Intro text"))
            .with_child(para("  [[TOC]] "))
            .with_child(heading(2, "Section"));
        let doc = TocGenerator::default().apply(doc);
        let kinds: Vec<_> = doc.children.iter().map(|c| c.kind_name()).collect();
        assert_eq!(kinds, vec!["heading", "paragraph", "heading", "list", "heading"]);
        assert_eq!(extract_text(&doc.children[2]), "Table of Contents");
    }

    #[test]
    fn inserts_after_leading_title() {
        let doc = Node::document()
            .with_child(heading(1, "Title"))
            .with_child(para("Body"));
        let doc = TocGenerator::default().apply(doc);
        let kinds: Vec<_> = doc.children.iter().map(|c| c.kind_name()).collect();
        assert_eq!(kinds, vec!["heading", "heading", "list", "paragraph"]);
    }

    #[test]
    fn skips_front_matter_paragraphs() {
        let doc = Node::document()
            .with_child(para("--- front matter ---"))
            .with_child(para("Body"))
            .with_child(heading(2, "Later"));
        let options = TocOptions {
            title: String::new(),
            ..TocOptions::default()
        };
        let doc = TocGenerator::new(options).apply(doc);
        let kinds: Vec<_> = doc.children.iter().map(|c| c.kind_name()).collect();
        assert_eq!(kinds, vec!["paragraph", "list", "paragraph", "heading"]);
    }

    #[test]
    fn level_range_filters_headings() {
        let doc = Node::document()
            .with_child(heading(1, "Top"))
            .with_child(heading(4, "Deep"));
        let mut generator = TocGenerator::new(TocOptions {
            insert: false,
            ..TocOptions::default()
        });
        let untouched = generator.apply(doc.clone());
        assert_eq!(untouched, doc);
        assert_eq!(toc_outline(generator.toc().unwrap()), vec![(0, "Top".to_string())]);
    }

    #[test]
    fn no_headings_means_no_toc() {
        let doc = Node::document().with_child(para("plain"));
        let mut generator = TocGenerator::default();
        let result = generator.apply(doc.clone());
        assert_eq!(result, doc);
        assert!(generator.toc().is_none());
    }

    #[test]
    fn ordered_lists_start_at_one() {
        let doc = Node::document().with_child(heading(2, "x"));
        let mut generator = TocGenerator::new(TocOptions {
            ordered: true,
            ..TocOptions::default()
        });
        generator.apply(doc);
        let list = &generator.toc().unwrap().children[1];
        assert_eq!(
            list.kind,
            NodeKind::List {
                ordered: true,
                start: Some(1),
                tight: true
            }
        );
    }
}
