//! Parser adapters.
//!
//! Grammar work is delegated to an external Markdown parser. An adapter walks that
//! parser's output into the crate's flat [`Event`](crate::ast::Event) stream and rebuilds a
//! document tree with [`events_to_tree`](crate::common::events_to_tree).

pub mod markdown;
pub mod registry;

use crate::ast::Node;
use crate::common::params::{param_bool, Params};
use crate::error::{OptionError, ParseError};

pub use markdown::MarkdownParser;
pub use registry::ParserRegistry;

/// Grammar switches exposed to extensions.
///
/// Extensions that hook the grammar (see
/// [`Extension::register_inline_rules`](crate::extensions::Extension::register_inline_rules))
/// flip these before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// GFM pipe tables
    pub tables: bool,
    /// Bare URLs and `www.` links become links
    pub autolink: bool,
    /// `~~text~~` spans
    pub strikethrough: bool,
    /// Typographic quotes and dashes
    pub smart: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            tables: true,
            autolink: true,
            strikethrough: false,
            smart: false,
        }
    }
}

impl ParseOptions {
    pub fn from_params(params: &Params) -> Result<Self, OptionError> {
        let defaults = ParseOptions::default();
        Ok(ParseOptions {
            tables: param_bool(params, "tables", defaults.tables)?,
            autolink: param_bool(params, "autolink", defaults.autolink)?,
            strikethrough: param_bool(params, "strikethrough", defaults.strikethrough)?,
            smart: param_bool(params, "smart", defaults.smart)?,
        })
    }
}

/// Feature flags a parser reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub tables: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    pub footnotes: bool,
    pub definition_lists: bool,
    pub math: bool,
    pub smart_quotes: bool,
    pub custom_extensions: bool,
}

/// Turns Markdown text into a document tree
pub trait Parser: Send + Sync {
    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> Result<Node, ParseError>;

    fn capabilities(&self) -> Capabilities;

    fn options(&self) -> &ParseOptions;

    fn options_mut(&mut self) -> &mut ParseOptions;

    /// Problems found while parsing `text`; empty when it parses cleanly
    fn validate_markdown(&self, text: &str) -> Vec<String> {
        match self.parse(text) {
            Ok(_) => Vec::new(),
            Err(err) => vec![err.to_string()],
        }
    }
}

/// Normalize line endings to `\n` and guarantee a trailing newline
pub fn preprocess(text: &str) -> String {
    let mut normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}
