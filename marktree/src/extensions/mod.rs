//! Optional syntax plugged into the pipeline.
//!
//! An [`Extension`] can touch every stage: it may flip grammar switches on the parser,
//! rewrite the tree after parsing, and add per-kind overrides to the HTML and Markdown
//! renderers. The [`ExtensionManager`] keeps extensions in registration order and checks
//! declared dependencies when extensions are added or removed; it does not reorder.
//!
//! | Name            | Grammar            | Tree                                  | Renders                 |
//! |-----------------|--------------------|---------------------------------------|-------------------------|
//! | `strikethrough` | `~~text~~`         |                                       | `<del>` / `~~…~~`       |
//! | `tasklist`      |                    | `[ ]` / `[x]` item prefixes           | checkbox / `[x] `       |
//! | `kbd`           |                    | `++key++` → `keyboard_key` nodes      | `<kbd>` / `++key++`     |
//! | `gfm`           | strikethrough      | tasklist                              | both of the above       |

pub mod gfm;
pub mod kbd;
pub mod strikethrough;
pub mod tasklist;

use crate::ast::Node;
use crate::error::{ExtensionError, Result};
use crate::parse::Parser;
use crate::render::{HtmlRenderer, MarkdownRenderer};
use tracing::{debug, info};

pub use gfm::GfmExtension;
pub use kbd::KbdExtension;
pub use strikethrough::StrikethroughExtension;
pub use tasklist::TaskListExtension;

/// Names accepted by [`builtin`]
pub const BUILTIN_EXTENSIONS: [&str; 4] = ["gfm", "kbd", "strikethrough", "tasklist"];

/// A bundle of parser, tree and renderer hooks. Every hook defaults to doing nothing.
pub trait Extension: Send {
    /// Unique name
    fn name(&self) -> &str;

    fn description(&self) -> String;

    /// Extensions that must be registered before this one
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn register_inline_rules(&self, _parser: &mut dyn Parser) {}

    fn register_block_rules(&self, _parser: &mut dyn Parser) {}

    /// Rewrite the whole tree after parsing
    fn transform_ast(&self, document: Node) -> Result<Node> {
        Ok(document)
    }

    fn register_html_renderer(&self, _renderer: &mut HtmlRenderer) {}

    fn register_markdown_renderer(&self, _renderer: &mut MarkdownRenderer) {}

    /// Called once on registration
    fn setup(&mut self) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Called once on removal
    fn teardown(&mut self) -> Result<(), ExtensionError> {
        Ok(())
    }
}

/// Instantiate a built-in extension by name
pub fn builtin(name: &str) -> Result<Box<dyn Extension>, ExtensionError> {
    match name {
        "strikethrough" => Ok(Box::new(StrikethroughExtension)),
        "tasklist" => Ok(Box::new(TaskListExtension)),
        "kbd" => Ok(Box::new(KbdExtension)),
        "gfm" => Ok(Box::new(GfmExtension::new())),
        _ => Err(ExtensionError::Unknown(name.to_string())),
    }
}

/// Registered extensions in load order
#[derive(Default)]
pub struct ExtensionManager {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager holding the named built-ins, registered in the given order
    pub fn with_extensions<S: AsRef<str>>(names: &[S]) -> Result<Self, ExtensionError> {
        let mut manager = Self::new();
        for name in names {
            manager.register(builtin(name.as_ref())?)?;
        }
        Ok(manager)
    }

    /// Add an extension after checking its name and dependencies, then run its setup
    pub fn register(&mut self, mut extension: Box<dyn Extension>) -> Result<(), ExtensionError> {
        let name = extension.name().to_string();
        if self.contains(&name) {
            return Err(ExtensionError::AlreadyRegistered(name));
        }
        if let Some(dependency) = extension
            .dependencies()
            .into_iter()
            .find(|dependency| !self.contains(dependency))
        {
            return Err(ExtensionError::MissingDependency {
                extension: name,
                dependency,
            });
        }

        extension
            .setup()
            .map_err(|source| ExtensionError::lifecycle(&name, "setup", source))?;
        self.extensions.push(extension);
        info!(extension = %name, "registered extension");
        Ok(())
    }

    /// Remove an extension nothing else depends on, running its teardown
    pub fn unregister(&mut self, name: &str) -> Result<Box<dyn Extension>, ExtensionError> {
        let position = self
            .extensions
            .iter()
            .position(|ext| ext.name() == name)
            .ok_or_else(|| ExtensionError::NotRegistered(name.to_string()))?;

        let dependents: Vec<String> = self
            .extensions
            .iter()
            .filter(|ext| ext.name() != name && ext.dependencies().iter().any(|d| d == name))
            .map(|ext| ext.name().to_string())
            .collect();
        if !dependents.is_empty() {
            return Err(ExtensionError::HasDependents {
                extension: name.to_string(),
                dependents,
            });
        }

        // A failed teardown leaves the extension registered
        self.extensions[position]
            .teardown()
            .map_err(|source| ExtensionError::lifecycle(name, "teardown", source))?;
        let extension = self.extensions.remove(position);
        info!(extension = %name, "unregistered extension");
        Ok(extension)
    }

    pub fn get(&self, name: &str) -> Result<&dyn Extension, ExtensionError> {
        self.extensions
            .iter()
            .find(|ext| ext.name() == name)
            .map(|ext| ext.as_ref())
            .ok_or_else(|| ExtensionError::NotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext.name() == name)
    }

    /// Names in load order
    pub fn list(&self) -> Vec<&str> {
        self.extensions.iter().map(|ext| ext.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn apply_parser_extensions(&self, parser: &mut dyn Parser) {
        for extension in &self.extensions {
            extension.register_inline_rules(parser);
            extension.register_block_rules(parser);
            debug!(extension = extension.name(), "applied parser hooks");
        }
    }

    pub fn apply_ast_transformations(&self, document: Node) -> Result<Node> {
        let mut document = document;
        for extension in &self.extensions {
            document = extension.transform_ast(document)?;
            debug!(extension = extension.name(), "applied tree transform");
        }
        Ok(document)
    }

    pub fn apply_html_renderer(&self, renderer: &mut HtmlRenderer) {
        for extension in &self.extensions {
            extension.register_html_renderer(renderer);
            debug!(extension = extension.name(), "applied html render hooks");
        }
    }

    pub fn apply_markdown_renderer(&self, renderer: &mut MarkdownRenderer) {
        for extension in &self.extensions {
            extension.register_markdown_renderer(renderer);
            debug!(extension = extension.name(), "applied markdown render hooks");
        }
    }
}

impl std::fmt::Debug for ExtensionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionManager")
            .field("extensions", &self.list())
            .finish()
    }
}
