//! Heading level rewriting.

use super::{visit_document, Transformer};
use crate::ast::{Node, NodeKind};
use crate::common::params::{param_int, param_level, param_string, Params};
use crate::error::{OptionError, Result};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// What to do with each heading level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingOperation {
    Increase(i64),
    Decrease(i64),
    Set(u8),
    /// Map the distinct levels present to 1, 2, 3, ... preserving their order
    Normalize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingLevelOptions {
    pub operation: HeadingOperation,
    /// Results are clamped into `min_level..=max_level`, and always into 1..=6
    pub min_level: u8,
    pub max_level: u8,
}

impl Default for HeadingLevelOptions {
    fn default() -> Self {
        HeadingLevelOptions {
            operation: HeadingOperation::Increase(1),
            min_level: 1,
            max_level: 6,
        }
    }
}

impl HeadingLevelOptions {
    pub fn with_operation(operation: HeadingOperation) -> Self {
        HeadingLevelOptions {
            operation,
            ..Self::default()
        }
    }

    /// Read `operation`, `amount`, `level`, `min_level` and `max_level`
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let raw = param_string(params, "operation", "increase");
        let amount = param_int(params, "amount", 1)?;
        let operation = match raw.as_str() {
            "increase" => HeadingOperation::Increase(amount),
            "decrease" => HeadingOperation::Decrease(amount),
            "set" => HeadingOperation::Set(param_level(params, "level", 1)?),
            "normalize" => HeadingOperation::Normalize,
            _ => {
                return Err(OptionError::invalid(
                    "operation",
                    &raw,
                    "one of increase, decrease, set, normalize",
                ))
            }
        };

        let min_level = param_level(params, "min_level", 1)?;
        let max_level = param_level(params, "max_level", 6)?;
        if min_level > max_level {
            return Err(OptionError::invalid(
                "min_level",
                &min_level.to_string(),
                "a level not above max_level",
            ));
        }

        Ok(HeadingLevelOptions {
            operation,
            min_level,
            max_level,
        })
    }
}

/// Raises, lowers, flattens or normalizes heading levels
#[derive(Debug, Clone, Default)]
pub struct HeadingLevelTransformer {
    options: HeadingLevelOptions,
    level_map: HashMap<u8, u8>,
}

impl HeadingLevelTransformer {
    pub fn new(options: HeadingLevelOptions) -> Self {
        HeadingLevelTransformer {
            options,
            level_map: HashMap::new(),
        }
    }

    /// Positive shifts increase, negative shifts decrease
    pub fn shift(amount: i64) -> Self {
        let operation = if amount >= 0 {
            HeadingOperation::Increase(amount)
        } else {
            HeadingOperation::Decrease(amount.saturating_neg())
        };
        Self::new(HeadingLevelOptions::with_operation(operation))
    }

    pub fn normalizer() -> Self {
        Self::new(HeadingLevelOptions::with_operation(HeadingOperation::Normalize))
    }

    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        Ok(Self::new(HeadingLevelOptions::from_params(params)?))
    }

    pub fn options(&self) -> &HeadingLevelOptions {
        &self.options
    }

    /// Rewrite every heading in `document`
    pub fn apply(&mut self, document: Node) -> Node {
        if self.options.operation == HeadingOperation::Normalize {
            // The level map has to be built from the untouched tree
            let levels: BTreeSet<u8> = document.walk().filter_map(Node::heading_level).collect();
            debug!(?levels, "found heading levels");
            self.level_map = levels
                .into_iter()
                .zip(1u8..)
                .collect();
        }
        visit_document(self, document)
    }

    fn new_level(&self, current: u8) -> u8 {
        let current_wide = i64::from(current);
        let target = match self.options.operation {
            HeadingOperation::Increase(amount) => current_wide.saturating_add(amount),
            HeadingOperation::Decrease(amount) => current_wide.saturating_sub(amount),
            HeadingOperation::Set(level) => i64::from(level),
            HeadingOperation::Normalize => {
                i64::from(self.level_map.get(&current).copied().unwrap_or(current))
            }
        };
        let clamped = target
            .min(i64::from(self.options.max_level))
            .max(i64::from(self.options.min_level))
            .clamp(1, 6);
        clamped as u8
    }
}

impl Transformer for HeadingLevelTransformer {
    fn name(&self) -> &str {
        "heading_level"
    }

    fn description(&self) -> String {
        match self.options.operation {
            HeadingOperation::Increase(amount) => format!("Increases heading levels by {amount}"),
            HeadingOperation::Decrease(amount) => format!("Decreases heading levels by {amount}"),
            HeadingOperation::Set(level) => format!("Sets all headings to level {level}"),
            HeadingOperation::Normalize => {
                "Normalizes heading hierarchy starting from level 1".to_string()
            }
        }
    }

    fn transform(&mut self, document: Node) -> Result<Node> {
        Ok(self.apply(document))
    }

    fn visit(&mut self, mut node: Node) -> Option<Node> {
        if let NodeKind::Heading { level } = node.kind {
            let new_level = self.new_level(level);
            if new_level != level {
                debug!(from = level, to = new_level, "changing heading level");
                node.kind = NodeKind::Heading { level: new_level };
            }
        }
        Some(self.generic_visit(node))
    }
}

pub fn increase_heading_levels(document: Node, amount: i64) -> Node {
    HeadingLevelTransformer::new(HeadingLevelOptions::with_operation(
        HeadingOperation::Increase(amount),
    ))
    .apply(document)
}

pub fn decrease_heading_levels(document: Node, amount: i64) -> Node {
    HeadingLevelTransformer::new(HeadingLevelOptions::with_operation(
        HeadingOperation::Decrease(amount),
    ))
    .apply(document)
}

/// Close gaps in the heading hierarchy so it starts at level 1
pub fn normalize_headings(document: Node) -> Node {
    HeadingLevelTransformer::normalizer().apply(document)
}
