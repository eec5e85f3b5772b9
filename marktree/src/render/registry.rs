//! Renderer registry for lookup by output format name

use super::html::HtmlRenderer;
use super::markdown::MarkdownRenderer;
use super::Renderer;
use crate::common::params::Params;
use crate::error::{RegistryError, Result};
use std::collections::HashMap;
use tracing::debug;

pub type RendererConstructor = fn(&Params) -> Result<Box<dyn Renderer>>;

pub struct RendererRegistry {
    constructors: HashMap<String, RendererConstructor>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        RendererRegistry {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, constructor: RendererConstructor) {
        let name = name.into();
        debug!(renderer = %name, "registered renderer");
        self.constructors.insert(name, constructor);
    }

    pub fn has(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn create(&self, name: &str, params: &Params) -> Result<Box<dyn Renderer>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RegistryError::NotFound {
                registry: "Renderer",
                name: name.to_string(),
                available: self.list(),
            })?;
        constructor(params)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with the `html` and `markdown` renderers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("html", html);
        registry.register("markdown", markdown);
        registry
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn html(params: &Params) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(HtmlRenderer::from_params(params)?))
}

fn markdown(params: &Params) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(MarkdownRenderer::from_params(params)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn builtins_render_by_name() {
        let registry = RendererRegistry::default();
        assert_eq!(registry.list(), vec!["html", "markdown"]);

        let doc = Node::document().with_child(Node::horizontal_rule());
        let mut html = registry.create("html", &Params::new()).unwrap();
        assert_eq!(html.name(), "html");
        assert_eq!(html.render(&doc), "<hr>\n");
        let mut markdown = registry.create("markdown", &Params::new()).unwrap();
        assert_eq!(markdown.render(&doc), "---\n");
    }

    #[test]
    fn unknown_renderer() {
        let err = RendererRegistry::default()
            .create("rst", &Params::new())
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Renderer 'rst' not registered. Available: html, markdown"
        );
    }

    #[test]
    fn params_reach_the_renderer() {
        let mut params = Params::new();
        params.insert("xhtml".to_string(), "true".to_string());
        let mut html = RendererRegistry::default().create("html", &params).unwrap();
        let doc = Node::document().with_child(Node::horizontal_rule());
        assert_eq!(html.render(&doc), "<hr />\n");
    }
}
