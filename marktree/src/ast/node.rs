//! The universal tree element and its typed variants.
//!
//! Every element of a parsed document is a [`Node`]. What distinguishes a heading from a
//! paragraph is its [`NodeKind`], which also carries the variant-specific required fields
//! (heading level, link target, list shape, cell alignment). Extension-provided kinds use
//! [`NodeKind::Custom`].
//!
//! Nodes own their children exclusively and hold no parent pointer. Code that needs the
//! parent of a node searches from a known ancestor with [`Node::find_path`] and resolves the
//! result with [`Node::node_at_path_mut`].

use super::attributes::{AttrValue, Attributes};
use crate::error::NodeError;
use serde::Serialize;

/// Horizontal alignment of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        }
    }
}

/// Discriminant of a node together with the fields its variant requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    Text,
    Emphasis,
    Strong,
    Link {
        href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    InlineCode,
    List {
        ordered: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<i64>,
        tight: bool,
    },
    ListItem,
    #[serde(rename = "blockquote")]
    BlockQuote,
    HorizontalRule,
    Table,
    TableRow,
    TableCell {
        header: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        align: Option<Alignment>,
    },
    HtmlBlock,
    HtmlInline,
    /// Kinds introduced by extensions, e.g. `strikethrough` or `keyboard_key`
    Custom {
        name: String,
    },
}

impl NodeKind {
    /// Canonical kind string used for dispatch, lookups and diagnostics
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Text => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::CodeBlock { .. } => "code_block",
            NodeKind::InlineCode => "inline_code",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem => "list_item",
            NodeKind::BlockQuote => "blockquote",
            NodeKind::HorizontalRule => "horizontal_rule",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell { .. } => "table_cell",
            NodeKind::HtmlBlock => "html_block",
            NodeKind::HtmlInline => "html_inline",
            NodeKind::Custom { name } => name,
        }
    }

    /// Inline kinds may not appear directly under a document
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::Emphasis | NodeKind::Strong | NodeKind::InlineCode
        )
    }
}

/// A single element of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Parser-origin bookkeeping. Never consulted by transformers or renderers.
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub metadata: Attributes,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: Vec::new(),
            attributes: Attributes::new(),
            content: None,
            metadata: Attributes::new(),
        }
    }

    /// Node of an extension-defined kind
    pub fn custom(name: impl Into<String>) -> Result<Self, NodeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NodeError::EmptyKind);
        }
        Ok(Node::new(NodeKind::Custom { name }))
    }

    pub fn document() -> Self {
        Node::new(NodeKind::Document)
    }

    /// Heading of the given level; levels outside 1..=6 are rejected
    pub fn heading(level: u8) -> Result<Self, NodeError> {
        if !(1..=6).contains(&level) {
            return Err(NodeError::InvalidHeadingLevel(i64::from(level)));
        }
        Ok(Node::new(NodeKind::Heading { level }))
    }

    pub fn paragraph() -> Self {
        Node::new(NodeKind::Paragraph)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::new(NodeKind::Text).with_content(content)
    }

    pub fn emphasis() -> Self {
        Node::new(NodeKind::Emphasis)
    }

    pub fn strong() -> Self {
        Node::new(NodeKind::Strong)
    }

    pub fn link(href: impl Into<String>, title: Option<String>) -> Self {
        Node::new(NodeKind::Link {
            href: href.into(),
            title,
        })
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>, title: Option<String>) -> Self {
        Node::new(NodeKind::Image {
            src: src.into(),
            alt: alt.into(),
            title,
        })
    }

    pub fn code_block(content: impl Into<String>, language: Option<String>) -> Self {
        let language = language.filter(|lang| !lang.is_empty());
        Node::new(NodeKind::CodeBlock { language }).with_content(content)
    }

    pub fn inline_code(content: impl Into<String>) -> Self {
        Node::new(NodeKind::InlineCode).with_content(content)
    }

    pub fn list(ordered: bool, start: Option<i64>, tight: bool) -> Self {
        Node::new(NodeKind::List {
            ordered,
            start,
            tight,
        })
    }

    pub fn list_item() -> Self {
        Node::new(NodeKind::ListItem)
    }

    pub fn blockquote() -> Self {
        Node::new(NodeKind::BlockQuote)
    }

    pub fn horizontal_rule() -> Self {
        Node::new(NodeKind::HorizontalRule)
    }

    pub fn table() -> Self {
        Node::new(NodeKind::Table)
    }

    pub fn table_row() -> Self {
        Node::new(NodeKind::TableRow)
    }

    pub fn table_cell(header: bool, align: Option<Alignment>) -> Self {
        Node::new(NodeKind::TableCell { header, align })
    }

    pub fn html_block(content: impl Into<String>) -> Self {
        Node::new(NodeKind::HtmlBlock).with_content(content)
    }

    pub fn html_inline(content: impl Into<String>) -> Self {
        Node::new(NodeKind::HtmlInline).with_content(content)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind.name() == kind
    }

    /// Level of a heading node
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// Content when present and non-empty
    pub fn content_str(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn insert_child(&mut self, index: usize, child: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Remove and return the direct child at `index`
    pub fn remove_child(&mut self, index: usize) -> Result<Node, NodeError> {
        if index >= self.children.len() {
            return Err(self.child_not_found(index));
        }
        Ok(self.children.remove(index))
    }

    /// Swap the direct child at `index` for `replacement`, returning the old child
    pub fn replace_child(&mut self, index: usize, replacement: Node) -> Result<Node, NodeError> {
        match self.children.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, replacement)),
            None => Err(self.child_not_found(index)),
        }
    }

    /// Index of `child` among the direct children, compared by identity
    pub fn child_position(&self, child: &Node) -> Option<usize> {
        self.children.iter().position(|c| std::ptr::eq(c, child))
    }

    fn child_not_found(&self, index: usize) -> NodeError {
        NodeError::ChildNotFound {
            parent: self.kind_name().to_string(),
            index,
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(key, value);
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<AttrValue> {
        self.attributes.remove(key)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.get_attr(key).and_then(AttrValue::as_str)
    }

    /// Boolean attribute, `false` when missing or not a boolean
    pub fn attr_bool(&self, key: &str) -> bool {
        self.get_attr(key)
            .and_then(AttrValue::as_bool)
            .unwrap_or(false)
    }

    pub fn attr_int(&self, key: &str) -> Option<i64> {
        self.get_attr(key).and_then(AttrValue::as_int)
    }

    /// Pre-order depth-first iterator over this node and all descendants.
    ///
    /// Each call starts a fresh traversal.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// All nodes of the given kind, in pre-order
    pub fn find_all<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.walk().filter(move |node| node.is(kind))
    }

    /// Apply `f` to this node and every descendant, parents before children
    pub fn walk_mut<F: FnMut(&mut Node)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Index path of the first node (pre-order) matching `predicate`.
    ///
    /// The empty path denotes `self`.
    pub fn find_path<P: Fn(&Node) -> bool>(&self, predicate: P) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        if search_path(self, &predicate, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Resolve an index path from `self`; fails with [`NodeError::PathNotFound`]
    pub fn node_at_path(&self, path: &[usize]) -> Result<&Node, NodeError> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
            .ok_or_else(|| NodeError::PathNotFound(path.to_vec()))
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Result<&mut Node, NodeError> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
            .ok_or_else(|| NodeError::PathNotFound(path.to_vec()))
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

fn search_path<P: Fn(&Node) -> bool>(node: &Node, predicate: &P, path: &mut Vec<usize>) -> bool {
    if predicate(node) {
        return true;
    }
    for (index, child) in node.children.iter().enumerate() {
        path.push(index);
        if search_path(child, predicate, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Lazy pre-order traversal, see [`Node::walk`]
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
