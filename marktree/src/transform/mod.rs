//! Tree-to-tree transformations.
//!
//! A [`Transformer`] rewrites a document in a single ownership-passing walk: each
//! [`visit`](Transformer::visit) call receives a node by value and returns the node to keep,
//! or `None` to drop it from its parent. [`generic_visit`](Transformer::generic_visit) is the
//! default propagation rule; custom visitors call it for the subtrees they do not handle
//! themselves.
//!
//! Transformers compose through [`TransformerChain`], which runs them left to right. Order
//! matters: ids must be assigned before a table of contents can link to them.
//!
//! Built-in transformers:
//!
//! | name             | type                              |
//! |------------------|-----------------------------------|
//! | `heading_level`  | [`HeadingLevelTransformer`]       |
//! | `id_generator`   | [`IdGeneratorTransformer`]        |
//! | `toc`            | [`TocGenerator`]                  |
//! | `link_reference` | [`LinkReferenceTransformer`]      |

pub mod heading;
pub mod ids;
pub mod links;
pub mod registry;
pub mod toc;

use crate::ast::Node;
use crate::error::Result;
use tracing::{debug, info};

pub use heading::{HeadingLevelOptions, HeadingLevelTransformer, HeadingOperation};
pub use ids::{IdGeneratorOptions, IdGeneratorTransformer};
pub use links::{LinkReferenceOptions, LinkReferenceTransformer, LinkStyle, ReferenceRecord};
pub use registry::TransformerRegistry;
pub use toc::{extract_toc, TocGenerator, TocOptions};

/// A document rewrite pass
pub trait Transformer: Send {
    /// Registry name
    fn name(&self) -> &str;

    /// Human-readable summary of what this instance does
    fn description(&self) -> String;

    /// Transform a whole document.
    ///
    /// If the root itself is dropped by [`visit`](Transformer::visit) the result is an
    /// empty document.
    fn transform(&mut self, document: Node) -> Result<Node> {
        Ok(visit_document(self, document))
    }

    /// Visit one node; `None` removes it from its parent
    fn visit(&mut self, node: Node) -> Option<Node> {
        Some(self.generic_visit(node))
    }

    /// Visit every child, keeping the ones whose visit returned a node
    fn generic_visit(&mut self, mut node: Node) -> Node {
        let children = std::mem::take(&mut node.children);
        node.children = children
            .into_iter()
            .filter_map(|child| self.visit(child))
            .collect();
        node
    }
}

/// Run the visitor over `document`, logging start and finish.
///
/// This is the body of the default [`Transformer::transform`]; transformers that override
/// `transform` to add pre- or post-passes call it for the visiting step.
pub fn visit_document<T: Transformer + ?Sized>(transformer: &mut T, document: Node) -> Node {
    info!(transformer = transformer.name(), "starting transformation");
    let result = match transformer.visit(document) {
        Some(node) => node,
        None => {
            debug!(transformer = transformer.name(), "root removed, returning empty document");
            Node::document()
        }
    };
    info!(transformer = transformer.name(), "completed transformation");
    result
}

/// Ordered sequence of transformers applied left to right
#[derive(Default)]
pub struct TransformerChain {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transformers(transformers: Vec<Box<dyn Transformer>>) -> Self {
        debug!(count = transformers.len(), "created transformer chain");
        TransformerChain { transformers }
    }

    pub fn add(&mut self, transformer: Box<dyn Transformer>) {
        debug!(transformer = transformer.name(), "added transformer to chain");
        self.transformers.push(transformer);
    }

    /// Remove the first transformer registered under `name`
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Transformer>> {
        let index = self.transformers.iter().position(|t| t.name() == name)?;
        debug!(transformer = name, "removed transformer from chain");
        Some(self.transformers.remove(index))
    }

    pub fn names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl Transformer for TransformerChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn description(&self) -> String {
        if self.transformers.is_empty() {
            return "Empty transformer chain".to_string();
        }
        let steps: Vec<String> = self.transformers.iter().map(|t| t.description()).collect();
        format!("Applies in order: {}", steps.join("; "))
    }

    fn transform(&mut self, document: Node) -> Result<Node> {
        let mut result = document;
        for transformer in &mut self.transformers {
            result = transformer.transform(result)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drops every emphasis node and counts visits
    struct DropEmphasis {
        visited: usize,
    }

    impl Transformer for DropEmphasis {
        fn name(&self) -> &str {
            "drop_emphasis"
        }

        fn description(&self) -> String {
            "Removes emphasis".to_string()
        }

        fn visit(&mut self, node: Node) -> Option<Node> {
            self.visited += 1;
            if node.is("emphasis") {
                return None;
            }
            Some(self.generic_visit(node))
        }
    }

    /// Appends a marker paragraph
    struct Append(&'static str);

    impl Transformer for Append {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> String {
            format!("Appends {}", self.0)
        }

        fn transform(&mut self, mut document: Node) -> Result<Node> {
            document.add_child(Node::paragraph().with_child(Node::text(self.0)));
            Ok(document)
        }
    }

    struct DropEverything;

    impl Transformer for DropEverything {
        fn name(&self) -> &str {
            "drop_everything"
        }

        fn description(&self) -> String {
            String::new()
        }

        fn visit(&mut self, _node: Node) -> Option<Node> {
            None
        }
    }

    #[test]
    fn generic_visit_drops_children_returning_none() {
        let doc = Node::document().with_child(
            Node::paragraph()
                .with_child(Node::text("keep "))
                .with_child(Node::emphasis().with_child(Node::text("drop")))
                .with_child(Node::text(" keep")),
        );
        let mut transformer = DropEmphasis { visited: 0 };
        let result = transformer.transform(doc).unwrap();
        assert_eq!(result.children[0].children.len(), 2);
        // the emphasis subtree is never descended into
        assert_eq!(transformer.visited, 5);
    }

    #[test]
    fn chain_applies_left_to_right() {
        let mut chain = TransformerChain::new();
        chain.add(Box::new(Append("first")));
        chain.add(Box::new(Append("second")));
        assert_eq!(chain.names(), vec!["first", "second"]);

        let result = chain.transform(Node::document()).unwrap();
        let texts: Vec<_> = result
            .find_all("text")
            .filter_map(|n| n.content.as_deref())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn chain_remove_by_name() {
        let mut chain = TransformerChain::from_transformers(vec![
            Box::new(Append("a")),
            Box::new(Append("b")),
        ]);
        assert!(chain.remove("a").is_some());
        assert!(chain.remove("missing").is_none());
        assert_eq!(chain.names(), vec!["b"]);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn removing_the_root_yields_empty_document() {
        let doc = Node::document().with_child(Node::paragraph());
        let result = DropEverything.transform(doc).unwrap();
        assert_eq!(result, Node::document());
    }
}
