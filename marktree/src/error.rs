//! Error types for tree construction, validation, parsing and lookup

use crate::common::flat_to_nested::ConversionError;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure surfaced by the library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Extension(#[from] ExtensionError),
    #[error(transparent)]
    Option(#[from] OptionError),
}

/// Construction and structural lookup failures on a single node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// Heading level outside 1..=6
    #[error("heading level must be between 1 and 6, got {0}")]
    InvalidHeadingLevel(i64),
    /// Node kinds are never empty
    #[error("node kind cannot be empty")]
    EmptyKind,
    /// The referenced child is not a direct child of the parent
    #[error("child {index} not found in {parent}")]
    ChildNotFound { parent: String, index: usize },
    /// An index path does not resolve to a node
    #[error("no node at path {0:?}")]
    PathNotFound(Vec<usize>),
}

/// A structural violation reported by the validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {kind} node")]
pub struct ValidationError {
    pub message: String,
    /// Kind of the offending node
    pub kind: String,
    /// Child-index path from the validated root to the offending node
    pub path: Vec<usize>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, kind: impl Into<String>, path: Vec<usize>) -> Self {
        ValidationError {
            message: message.into(),
            kind: kind.into(),
            path,
        }
    }
}

/// Failures raised while turning Markdown text into a tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The event stream produced by the parser collaborator could not be nested
    #[error("failed to build tree from events: {0}")]
    Tree(#[from] ConversionError),
}

/// Name lookups against parser, renderer and transformer registries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{registry} '{name}' not registered. Available: {}", .available.join(", "))]
    NotFound {
        registry: &'static str,
        name: String,
        available: Vec<String>,
    },
    #[error("number of configs ({configs}) must match number of transformers ({names})")]
    ConfigMismatch { names: usize, configs: usize },
}

/// Extension registration bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("extension '{0}' is already registered")]
    AlreadyRegistered(String),
    #[error("extension '{extension}' depends on '{dependency}', which is not registered")]
    MissingDependency {
        extension: String,
        dependency: String,
    },
    #[error("cannot unregister '{extension}': required by {}", .dependents.join(", "))]
    HasDependents {
        extension: String,
        dependents: Vec<String>,
    },
    #[error("extension '{0}' is not registered")]
    NotRegistered(String),
    #[error("unknown extension '{0}'")]
    Unknown(String),
    /// `setup` or `teardown` failed; the extension's own error is the source
    #[error("extension '{extension}' failed during {phase}: {source}")]
    Lifecycle {
        extension: String,
        phase: &'static str,
        #[source]
        source: Box<ExtensionError>,
    },
}

impl ExtensionError {
    pub fn lifecycle(extension: &str, phase: &'static str, source: ExtensionError) -> Self {
        ExtensionError::Lifecycle {
            extension: extension.to_string(),
            phase,
            source: Box::new(source),
        }
    }
}

/// A component option could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("invalid value '{value}' for option '{key}': expected {expected}")]
    Invalid {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl OptionError {
    pub fn invalid(key: &str, value: &str, expected: &'static str) -> Self {
        OptionError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}
