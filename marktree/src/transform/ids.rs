//! Unique `id` attributes for headings (or any other kinds).

use super::{visit_document, Transformer};
use crate::ast::Node;
use crate::common::params::{param_bool, param_list, param_string, Params};
use crate::common::slug::IdGenerator;
use crate::common::text::extract_text;
use crate::error::{OptionError, Result};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGeneratorOptions {
    pub prefix: String,
    pub separator: String,
    /// Replace ids that are already present
    pub overwrite: bool,
    /// Node kinds that receive ids
    pub target_elements: Vec<String>,
}

impl Default for IdGeneratorOptions {
    fn default() -> Self {
        IdGeneratorOptions {
            prefix: String::new(),
            separator: "-".to_string(),
            overwrite: false,
            target_elements: vec!["heading".to_string()],
        }
    }
}

impl IdGeneratorOptions {
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let separator = param_string(params, "separator", "-");
        if separator.is_empty() {
            return Err(OptionError::invalid("separator", "", "a non-empty separator"));
        }
        Ok(IdGeneratorOptions {
            prefix: param_string(params, "prefix", ""),
            separator,
            overwrite: param_bool(params, "overwrite", false)?,
            target_elements: param_list(params, "target_elements", &["heading"]),
        })
    }
}

/// Assigns slug ids derived from each target node's text.
///
/// Ids already present anywhere in the document are reserved first (unless overwriting),
/// so generated ids never collide with hand-written ones.
#[derive(Debug, Clone)]
pub struct IdGeneratorTransformer {
    options: IdGeneratorOptions,
    ids: IdGenerator,
}

impl IdGeneratorTransformer {
    pub fn new(options: IdGeneratorOptions) -> Self {
        let ids = IdGenerator::with_prefix(options.prefix.clone(), options.separator.clone());
        IdGeneratorTransformer { options, ids }
    }

    pub fn for_headings() -> Self {
        Self::new(IdGeneratorOptions::default())
    }

    pub fn for_tables() -> Self {
        Self::new(IdGeneratorOptions {
            prefix: "table".to_string(),
            target_elements: vec!["table".to_string()],
            ..IdGeneratorOptions::default()
        })
    }

    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        Ok(Self::new(IdGeneratorOptions::from_params(params)?))
    }

    pub fn options(&self) -> &IdGeneratorOptions {
        &self.options
    }

    pub fn apply(&mut self, document: Node) -> Node {
        self.ids.reset();
        if !self.options.overwrite {
            for node in document.walk() {
                if let Some(id) = node.attr_str("id").filter(|id| !id.is_empty()) {
                    debug!(id, "found existing id");
                    self.ids.reserve(id);
                }
            }
        }
        visit_document(self, document)
    }

    fn is_target(&self, node: &Node) -> bool {
        self.options
            .target_elements
            .iter()
            .any(|kind| node.is(kind))
    }

    fn assign_id(&mut self, node: &mut Node) {
        if !self.options.overwrite {
            if let Some(existing) = node.attr_str("id").filter(|id| !id.is_empty()) {
                debug!(id = existing, "keeping existing id");
                return;
            }
        }

        let text = extract_text(node);
        if text.is_empty() {
            debug!(kind = node.kind_name(), "no text to derive an id from");
            return;
        }

        let id = self.ids.generate(&text);
        debug!(id = %id, kind = node.kind_name(), "generated id");
        node.set_attr("id", id);
    }
}

impl Default for IdGeneratorTransformer {
    fn default() -> Self {
        Self::for_headings()
    }
}

impl Transformer for IdGeneratorTransformer {
    fn name(&self) -> &str {
        "id_generator"
    }

    fn description(&self) -> String {
        format!(
            "Generates unique IDs for {} elements",
            self.options.target_elements.join(", ")
        )
    }

    fn transform(&mut self, document: Node) -> Result<Node> {
        Ok(self.apply(document))
    }

    fn visit(&mut self, mut node: Node) -> Option<Node> {
        if self.is_target(&node) {
            self.assign_id(&mut node);
        }
        Some(self.generic_visit(node))
    }
}

/// Give every heading a unique id
pub fn add_heading_ids(document: Node) -> Node {
    IdGeneratorTransformer::for_headings().apply(document)
}

/// Give every node of the listed kinds a unique id
pub fn add_ids_to_elements(document: Node, elements: &[&str]) -> Node {
    IdGeneratorTransformer::new(IdGeneratorOptions {
        target_elements: elements.iter().map(|kind| kind.to_string()).collect(),
        ..IdGeneratorOptions::default()
    })
    .apply(document)
}
