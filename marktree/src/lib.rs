//! Markdown document trees: parse, transform, render
//!
//!     Markdown text goes in, a typed tree comes out, a chain of structural transformers
//!     rewrites it, and a renderer turns it back into Markdown or HTML. Grammar work is
//!     delegated to comrak; this crate owns the tree and everything done to it.
//!
//!     This is a pure lib: no code here assumes a shell, reads env vars or prints. The
//!     marktree-cli crate does that.
//!
//! Architecture
//!
//!     .
//!     ├── ast                     # Node, NodeKind, Attributes, flat Event form
//!     ├── common                  # events → tree builder, slugs, text extraction, params
//!     ├── parse                   # Parser trait, comrak adapter, ParserRegistry
//!     ├── transform               # Transformer trait, chain, the four built-ins, registry
//!     ├── render                  # Renderer trait, override chains, HTML and Markdown
//!     ├── extensions              # Extension trait, ExtensionManager, built-in extensions
//!     ├── validate.rs             # structural checks
//!     └── error.rs
//!
//!     Data flow:
//!
//!         text ─ Parser ─▶ Event stream ─ events_to_tree ─▶ Node
//!              ─ ExtensionManager (tree hooks) ─▶ TransformerChain ─▶ Renderer ─▶ text
//!
//! The Tree
//!
//!     Nodes own their children; there are no parent pointers. Ancestors are found by
//!     searching for an index path from the root (see Node::find_path), which is linear in
//!     the tree size and fine for documents. Kinds are a closed enum plus Custom { name }
//!     so extensions can add kinds the renderers have never seen; rendering any unknown
//!     kind falls back instead of failing.
//!
//! Transformers
//!
//!     A transformer consumes the tree and returns the new one. The default traversal is a
//!     post-order rebuild in which a visit may drop a node by returning None. Transformers
//!     keep per-run state (assigned ids, reference tables) and reset it at the start of
//!     every run, so one instance can be reused.
//!
//! Rendering
//!
//!     The Markdown renderer is the careful one: its output must re-parse into an
//!     equivalent tree, and rendering that tree again must give identical text. See
//!     tests/markdown for the round-trip properties.
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs                  # test crate root
//!     ├── common                  # shared helpers and fixtures
//!     ├── markdown                # parse + Markdown rendering, round trips
//!     ├── html
//!     ├── transforms
//!     └── extensions
//!
pub mod ast;
pub mod common;
pub mod error;
pub mod extensions;
pub mod parse;
pub mod render;
pub mod transform;
pub mod validate;

pub use ast::{Alignment, AttrValue, Attributes, Event, Node, NodeKind};
pub use error::{Error, Result};
pub use extensions::{Extension, ExtensionManager};
pub use parse::{MarkdownParser, ParseOptions, Parser, ParserRegistry};
pub use render::{HtmlOptions, HtmlRenderer, MarkdownOptions, MarkdownRenderer, Renderer, RendererRegistry};
pub use transform::{Transformer, TransformerChain, TransformerRegistry};
pub use validate::Validator;

use common::params::Params;
use error::RegistryError;
use tracing::debug;

/// Parse Markdown with the default comrak-backed parser
pub fn parse_markdown(text: &str) -> Result<Node> {
    Ok(MarkdownParser::new().parse(text)?)
}

/// Render a tree as Markdown with default options
pub fn to_markdown(document: &Node) -> String {
    MarkdownRenderer::default().render(document)
}

/// Render a tree as HTML with default options
pub fn to_html(document: &Node) -> String {
    HtmlRenderer::default().render(document)
}

/// Target of [`Pipeline::render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            _ => Err(RegistryError::NotFound {
                registry: "Renderer",
                name: s.to_string(),
                available: vec!["html".to_string(), "markdown".to_string()],
            }
            .into()),
        }
    }
}

/// Parser, extensions, transformers and renderer wired together
pub struct Pipeline {
    parser: Box<dyn Parser>,
    extensions: ExtensionManager,
    transformers: TransformerChain,
    output: OutputFormat,
    render_params: Params,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            parser: Box::new(MarkdownParser::new()),
            extensions: ExtensionManager::new(),
            transformers: TransformerChain::new(),
            output: OutputFormat::Markdown,
            render_params: Params::new(),
        }
    }

    pub fn with_parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = parser;
        self.extensions.apply_parser_extensions(self.parser.as_mut());
        self
    }

    /// Use these extensions; their grammar hooks are applied to the parser right away
    pub fn with_extensions(mut self, extensions: ExtensionManager) -> Self {
        extensions.apply_parser_extensions(self.parser.as_mut());
        self.extensions = extensions;
        self
    }

    pub fn with_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.transformers.add(transformer);
        self
    }

    pub fn with_transformers(mut self, chain: TransformerChain) -> Self {
        self.transformers = chain;
        self
    }

    /// Output format plus renderer options (`--extra-*` style parameters)
    pub fn with_output(mut self, output: OutputFormat, params: Params) -> Self {
        self.output = output;
        self.render_params = params;
        self
    }

    pub fn extensions(&self) -> &ExtensionManager {
        &self.extensions
    }

    pub fn transformers(&self) -> &TransformerChain {
        &self.transformers
    }

    /// Parse and run the extensions' tree hooks
    pub fn parse(&self, text: &str) -> Result<Node> {
        let document = self.parser.parse(text)?;
        self.extensions.apply_ast_transformations(document)
    }

    pub fn transform(&mut self, document: Node) -> Result<Node> {
        self.transformers.transform(document)
    }

    /// Render with a fresh renderer carrying the extensions' overrides
    pub fn render(&self, document: &Node) -> Result<String> {
        let output = match self.output {
            OutputFormat::Markdown => {
                let mut renderer = MarkdownRenderer::from_params(&self.render_params)?;
                self.extensions.apply_markdown_renderer(&mut renderer);
                renderer.render(document)
            }
            OutputFormat::Html => {
                let mut renderer = HtmlRenderer::from_params(&self.render_params)?;
                self.extensions.apply_html_renderer(&mut renderer);
                renderer.render(document)
            }
        };
        Ok(output)
    }

    /// Parse, transform and render `text`
    pub fn run(&mut self, text: &str) -> Result<String> {
        let document = self.parse(text)?;
        let document = self.transform(document)?;
        debug!(
            transformers = self.transformers.len(),
            output = self.output.as_str(),
            "rendering document"
        );
        self.render(&document)
    }
}
