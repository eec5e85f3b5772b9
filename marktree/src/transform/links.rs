//! Inline links to reference-style links.
//!
//! Links keep their kind; each one gets a `reference_id` attribute and the Markdown renderer
//! emits `[text][id]` for it. A references section with one `[id]: href "title"` definition
//! per distinct href is appended to the document.

use super::{visit_document, Transformer};
use crate::ast::{Node, NodeKind};
use crate::common::params::{param_bool, param_string, Params};
use crate::common::slug::{slugify_with, unique_with_suffix, SlugOptions};
use crate::common::text::extract_text;
use crate::error::{OptionError, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Fallback text-style id for links without slug-able text
const EMPTY_REFERENCE_FALLBACK: &str = "link";
const TEXT_REFERENCE_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// `[1]`, `[2]`, ...
    #[default]
    Numeric,
    /// Slug of the link text
    Text,
}

impl LinkStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStyle::Numeric => "numeric",
            LinkStyle::Text => "text",
        }
    }
}

impl std::str::FromStr for LinkStyle {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(LinkStyle::Numeric),
            "text" => Ok(LinkStyle::Text),
            _ => Err(OptionError::invalid("style", s, "numeric or text")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReferenceOptions {
    pub style: LinkStyle,
    /// Heading above the definitions; empty for none
    pub section_title: String,
    /// Links to the same href share one reference
    pub dedup: bool,
    pub preserve_titles: bool,
}

impl Default for LinkReferenceOptions {
    fn default() -> Self {
        LinkReferenceOptions {
            style: LinkStyle::Numeric,
            section_title: "References".to_string(),
            dedup: true,
            preserve_titles: true,
        }
    }
}

impl LinkReferenceOptions {
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let defaults = LinkReferenceOptions::default();
        Ok(LinkReferenceOptions {
            style: param_string(params, "style", defaults.style.as_str()).parse()?,
            section_title: param_string(params, "section_title", &defaults.section_title),
            dedup: param_bool(params, "dedup", defaults.dedup)?,
            preserve_titles: param_bool(params, "preserve_titles", defaults.preserve_titles)?,
        })
    }
}

/// One converted link occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub id: String,
    pub href: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LinkReferenceTransformer {
    options: LinkReferenceOptions,
    records: Vec<ReferenceRecord>,
    by_href: HashMap<String, String>,
    issued: HashSet<String>,
    counter: usize,
}

impl LinkReferenceTransformer {
    pub fn new(options: LinkReferenceOptions) -> Self {
        LinkReferenceTransformer {
            options,
            ..Self::default()
        }
    }

    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        Ok(Self::new(LinkReferenceOptions::from_params(params)?))
    }

    /// Every link converted by the last run, in document order
    pub fn references(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn apply(&mut self, document: Node) -> Node {
        self.records.clear();
        self.by_href.clear();
        self.issued.clear();
        self.counter = 0;

        let mut result = visit_document(self, document);
        if !self.records.is_empty() {
            self.append_references(&mut result);
        }
        result
    }

    fn reference_id(&mut self, text: &str) -> String {
        match self.options.style {
            LinkStyle::Numeric => {
                self.counter += 1;
                self.counter.to_string()
            }
            LinkStyle::Text => {
                let options = SlugOptions::default().with_max_length(TEXT_REFERENCE_MAX_LENGTH);
                let base = slugify_with(text, &options);
                let base = if base.is_empty() {
                    EMPTY_REFERENCE_FALLBACK.to_string()
                } else {
                    base
                };
                unique_with_suffix(&base, &self.issued)
            }
        }
    }

    fn convert_link(&mut self, node: &mut Node) {
        let (href, title) = match &node.kind {
            NodeKind::Link { href, title } if !href.is_empty() => (href.clone(), title.clone()),
            _ => return,
        };
        let text = extract_text(node);

        let existing = if self.options.dedup {
            self.by_href.get(&href).cloned()
        } else {
            None
        };
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.reference_id(&text);
                self.by_href.insert(href.clone(), id.clone());
                id
            }
        };

        debug!(text = %text, reference = %id, "converting link to reference");
        self.issued.insert(id.clone());
        self.records.push(ReferenceRecord {
            id: id.clone(),
            href,
            title: if self.options.preserve_titles { title } else { None },
        });
        node.set_attr("reference_id", id);
    }

    fn append_references(&self, document: &mut Node) {
        if !self.options.section_title.is_empty() {
            document.add_child(
                Node::new(NodeKind::Heading { level: 2 })
                    .with_child(Node::text(self.options.section_title.clone())),
            );
        }

        let mut seen = HashSet::new();
        for record in &self.records {
            let first = seen.insert(record.href.as_str());
            if self.options.dedup && !first {
                continue;
            }
            let mut definition = format!("[{}]: {}", record.id, record.href);
            if let Some(title) = &record.title {
                definition.push_str(&format!(" \"{title}\""));
            }
            document.add_child(
                Node::paragraph().with_child(Node::text(definition).with_attr("literal", true)),
            );
        }
        info!(references = seen.len(), "added references to document");
    }
}

impl Transformer for LinkReferenceTransformer {
    fn name(&self) -> &str {
        "link_reference"
    }

    fn description(&self) -> String {
        format!(
            "Converts inline links to {} reference-style links",
            self.options.style.as_str()
        )
    }

    fn transform(&mut self, document: Node) -> Result<Node> {
        Ok(self.apply(document))
    }

    fn visit(&mut self, node: Node) -> Option<Node> {
        let mut node = self.generic_visit(node);
        if node.is("link") {
            self.convert_link(&mut node);
        }
        Some(node)
    }
}

/// Convert every inline link to a reference-style link
pub fn convert_to_reference_links(document: Node, style: LinkStyle, dedup: bool) -> Node {
    LinkReferenceTransformer::new(LinkReferenceOptions {
        style,
        dedup,
        ..LinkReferenceOptions::default()
    })
    .apply(document)
}
