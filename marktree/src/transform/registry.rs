//! Transformer registry for lookup by name
//!
//! The CLI and the configuration layer refer to transformers by name; this registry maps
//! each name to a constructor taking a string parameter map.

use super::heading::HeadingLevelTransformer;
use super::ids::IdGeneratorTransformer;
use super::links::LinkReferenceTransformer;
use super::toc::TocGenerator;
use super::{Transformer, TransformerChain};
use crate::common::params::Params;
use crate::error::{RegistryError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Builds a transformer from its parameters
pub type TransformerConstructor = fn(&Params) -> Result<Box<dyn Transformer>>;

pub struct TransformerRegistry {
    constructors: HashMap<String, TransformerConstructor>,
}

impl TransformerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        TransformerRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, constructor: TransformerConstructor) {
        let name = name.into();
        debug!(transformer = %name, "registered transformer");
        self.constructors.insert(name, constructor);
    }

    pub fn has(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Instantiate the transformer registered under `name`
    pub fn create(&self, name: &str, params: &Params) -> Result<Box<dyn Transformer>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RegistryError::NotFound {
                registry: "Transformer",
                name: name.to_string(),
                available: self.list(),
            })?;
        constructor(params)
    }

    /// Build a chain from names, with one parameter map per name when `configs` is given
    pub fn create_chain(&self, names: &[String], configs: Option<&[Params]>) -> Result<TransformerChain> {
        let empty = Params::new();
        let mut chain = TransformerChain::new();
        match configs {
            Some(configs) if configs.len() != names.len() => {
                return Err(RegistryError::ConfigMismatch {
                    names: names.len(),
                    configs: configs.len(),
                }
                .into());
            }
            Some(configs) => {
                for (name, params) in names.iter().zip(configs) {
                    chain.add(self.create(name, params)?);
                }
            }
            None => {
                for name in names {
                    chain.add(self.create(name, &empty)?);
                }
            }
        }
        Ok(chain)
    }

    /// All registered names (sorted)
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in transformers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("heading_level", heading_level);
        registry.register("id_generator", id_generator);
        registry.register("toc", toc);
        registry.register("link_reference", link_reference);
        registry
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn heading_level(params: &Params) -> Result<Box<dyn Transformer>> {
    Ok(Box::new(HeadingLevelTransformer::from_params(params)?))
}

fn id_generator(params: &Params) -> Result<Box<dyn Transformer>> {
    Ok(Box::new(IdGeneratorTransformer::from_params(params)?))
}

fn toc(params: &Params) -> Result<Box<dyn Transformer>> {
    Ok(Box::new(TocGenerator::from_params(params)?))
}

fn link_reference(params: &Params) -> Result<Box<dyn Transformer>> {
    Ok(Box::new(LinkReferenceTransformer::from_params(params)?))
}
