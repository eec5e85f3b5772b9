//! Structural validation of document trees.
//!
//! The validator walks the whole tree and applies one rule set per known kind. It collects
//! every violation instead of stopping at the first one; [`Validator::validate_strict`]
//! turns the first violation into an error for callers that want fail-fast behavior.
//!
//! Strict mode adds checks for empty list items, empty blockquotes and links without text.
//! Kinds the validator does not know (extension kinds) are never errors; strict mode only
//! logs them.

use crate::ast::{Node, NodeKind};
use crate::error::ValidationError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    strict: bool,
}

impl Validator {
    pub fn new(strict: bool) -> Self {
        Validator { strict }
    }

    pub fn strict() -> Self {
        Self::new(true)
    }

    /// Every violation found in the tree, in pre-order
    pub fn validate(&self, root: &Node) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut path = Vec::new();
        self.validate_node(root, &mut path, &mut errors);
        debug!(errors = errors.len(), strict = self.strict, "validation complete");
        errors
    }

    /// Fail with the first violation, if any
    pub fn validate_strict(&self, root: &Node) -> Result<(), ValidationError> {
        match self.validate(root).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self, root: &Node) -> bool {
        self.validate(root).is_empty()
    }

    fn validate_node(&self, node: &Node, path: &mut Vec<usize>, errors: &mut Vec<ValidationError>) {
        let mut report = |message: String, at: &Node, at_path: Vec<usize>| {
            errors.push(ValidationError::new(message, at.kind_name(), at_path));
        };

        match &node.kind {
            NodeKind::Document => {
                for (i, child) in node.children.iter().enumerate() {
                    if child.kind.is_inline() {
                        report(
                            "Document contains inline element".to_string(),
                            child,
                            child_path(path, i),
                        );
                    }
                }
            }
            NodeKind::Heading { level } => {
                if !(1..=6).contains(level) {
                    report(format!("Invalid heading level: {level}"), node, path.clone());
                }
                if node.children.is_empty() && node.content_str().is_none() {
                    report("Heading has no content".to_string(), node, path.clone());
                }
            }
            NodeKind::List { ordered, start, .. } => {
                for (i, child) in node.children.iter().enumerate() {
                    if !child.is("list_item") {
                        report(
                            format!("List contains non-list-item: {}", child.kind_name()),
                            child,
                            child_path(path, i),
                        );
                    }
                }
                if let (true, Some(start)) = (ordered, start) {
                    if *start < 0 {
                        report(format!("Invalid list start: {start}"), node, path.clone());
                    }
                }
            }
            NodeKind::ListItem => {
                if self.strict && node.children.is_empty() && node.content_str().is_none() {
                    report("Empty list item".to_string(), node, path.clone());
                }
            }
            NodeKind::Link { href, .. } => {
                if href.is_empty() {
                    report("Link has no href".to_string(), node, path.clone());
                }
                if self.strict && node.children.is_empty() && node.content_str().is_none() {
                    report("Link has no text".to_string(), node, path.clone());
                }
            }
            NodeKind::Image { src, .. } => {
                if src.is_empty() {
                    report("Image has no src".to_string(), node, path.clone());
                }
                if !node.children.is_empty() {
                    report("Image has children".to_string(), node, path.clone());
                }
            }
            NodeKind::Table => {
                for (i, child) in node.children.iter().enumerate() {
                    if !child.is("table_row") {
                        report(
                            format!("Table contains non-row: {}", child.kind_name()),
                            child,
                            child_path(path, i),
                        );
                    }
                }
                let mut widths = node
                    .children
                    .iter()
                    .filter(|row| row.is("table_row"))
                    .map(|row| row.children.len());
                if let Some(first) = widths.next() {
                    if widths.any(|width| width != first) {
                        report(
                            "Table has inconsistent column counts".to_string(),
                            node,
                            path.clone(),
                        );
                    }
                }
            }
            NodeKind::TableRow => {
                for (i, child) in node.children.iter().enumerate() {
                    if !child.is("table_cell") {
                        report(
                            format!("Table row contains non-cell: {}", child.kind_name()),
                            child,
                            child_path(path, i),
                        );
                    }
                }
            }
            NodeKind::BlockQuote => {
                if self.strict && node.children.is_empty() {
                    report("Empty blockquote".to_string(), node, path.clone());
                }
            }
            NodeKind::Custom { name } => {
                if self.strict {
                    warn!(kind = %name, "unknown node kind in strict mode");
                }
            }
            _ => {}
        }

        for (i, child) in node.children.iter().enumerate() {
            path.push(i);
            self.validate_node(child, path, errors);
            path.pop();
        }
    }
}

fn child_path(path: &[usize], index: usize) -> Vec<usize> {
    let mut child = path.to_vec();
    child.push(index);
    child
}

/// Collect violations with the given strictness
pub fn validate(root: &Node, strict: bool) -> Vec<ValidationError> {
    Validator::new(strict).validate(root)
}

/// Strict validation failing on the first violation
pub fn validate_strict(root: &Node) -> Result<(), ValidationError> {
    Validator::strict().validate_strict(root)
}
