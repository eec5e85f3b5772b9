//! Parser registry for lookup by name

use super::markdown::MarkdownParser;
use super::{ParseOptions, Parser};
use crate::common::params::Params;
use crate::error::{RegistryError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub type ParserConstructor = fn(&Params) -> Result<Box<dyn Parser>>;

struct Entry {
    constructor: ParserConstructor,
    /// File extensions without the leading dot
    extensions: &'static [&'static str],
}

pub struct ParserRegistry {
    parsers: HashMap<String, Entry>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        ParserRegistry {
            parsers: HashMap::new(),
        }
    }

    /// Register a parser, replacing any previous one with the same name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        extensions: &'static [&'static str],
        constructor: ParserConstructor,
    ) {
        let name = name.into();
        debug!(parser = %name, "registered parser");
        self.parsers.insert(
            name,
            Entry {
                constructor,
                extensions,
            },
        );
    }

    pub fn has(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    pub fn create(&self, name: &str, params: &Params) -> Result<Box<dyn Parser>> {
        let entry = self.parsers.get(name).ok_or_else(|| RegistryError::NotFound {
            registry: "Parser",
            name: name.to_string(),
            available: self.list(),
        })?;
        (entry.constructor)(params)
    }

    /// All registered names (sorted)
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.parsers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the parser claiming the extension of `filename`
    pub fn detect_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension().and_then(|ext| ext.to_str())?;
        let mut matches: Vec<&String> = self
            .parsers
            .iter()
            .filter(|(_, entry)| entry.extensions.contains(&extension))
            .map(|(name, _)| name)
            .collect();
        matches.sort();
        matches.first().map(|name| name.to_string())
    }

    /// Registry with the comrak-backed `markdown` parser
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("markdown", &["md", "markdown", "mdown"], markdown);
        registry
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn markdown(params: &Params) -> Result<Box<dyn Parser>> {
    Ok(Box::new(MarkdownParser::with_options(
        ParseOptions::from_params(params)?,
    )))
}
