//! Document renderers.
//!
//! Each renderer dispatches on the node kind with an exhaustive match over the built-in
//! kinds and a non-failing fallback for everything else, so any tree renders, including
//! kinds contributed by extensions the renderer has never heard of.
//!
//! Extensions customise rendering through per-kind override chains ([`Overrides`]). An
//! override receives the renderer, the node, and a [`Next`] handle that invokes the
//! previously registered override or, at the end of the chain, the built-in method. The
//! most recently added override runs first.
//!
//! Cross-cutting state (list nesting and tightness, table and code block flags) lives in a
//! [`RenderContext`] owned by the renderer and reset at the start of every `render` call.

pub mod html;
pub mod markdown;
pub mod registry;

use crate::ast::{AttrValue, Node};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

pub use html::{HtmlOptions, HtmlRenderer};
pub use markdown::{HeadingStyle, MarkdownOptions, MarkdownRenderer};
pub use registry::RendererRegistry;

/// Turns a document tree into text
pub trait Renderer: Send {
    fn name(&self) -> &str;

    fn render(&mut self, document: &Node) -> String;
}

/// A per-kind rendering override for renderer type `R`
pub type RenderOverride<R> = Arc<dyn Fn(&mut R, &Node, Next<'_, R>) -> String + Send + Sync>;

/// The remainder of an override chain
pub struct Next<'a, R> {
    chain: &'a [RenderOverride<R>],
    base: fn(&mut R, &Node) -> String,
}

impl<'a, R> Next<'a, R> {
    pub fn new(chain: &'a [RenderOverride<R>], base: fn(&mut R, &Node) -> String) -> Self {
        Next { chain, base }
    }

    /// Render `node` with the next override, or the built-in method when none is left
    pub fn render(self, renderer: &mut R, node: &Node) -> String {
        match self.chain.split_last() {
            Some((last, rest)) => last(
                renderer,
                node,
                Next {
                    chain: rest,
                    base: self.base,
                },
            ),
            None => (self.base)(renderer, node),
        }
    }
}

/// Override chains keyed by node kind
pub struct Overrides<R> {
    by_kind: HashMap<String, Vec<RenderOverride<R>>>,
}

impl<R> Overrides<R> {
    pub fn new() -> Self {
        Overrides {
            by_kind: HashMap::new(),
        }
    }

    pub fn add(&mut self, kind: impl Into<String>, render: RenderOverride<R>) {
        let kind = kind.into();
        trace!(kind = %kind, "added render override");
        self.by_kind.entry(kind).or_default().push(render);
    }

    /// Snapshot of the chain for `kind`, oldest first
    pub fn chain(&self, kind: &str) -> Vec<RenderOverride<R>> {
        self.by_kind.get(kind).cloned().unwrap_or_default()
    }

    pub fn has(&self, kind: &str) -> bool {
        self.by_kind.get(kind).is_some_and(|chain| !chain.is_empty())
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<_> = self.by_kind.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl<R> Default for Overrides<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Overrides<R> {
    fn clone(&self) -> Self {
        Overrides {
            by_kind: self.by_kind.clone(),
        }
    }
}

impl<R> fmt::Debug for Overrides<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Render state shared by all node methods of one `render` call
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    tight: Vec<bool>,
    in_table: bool,
    in_code_block: bool,
    data: HashMap<String, AttrValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn enter_list(&mut self, tight: bool) {
        self.tight.push(tight);
        trace!(depth = self.tight.len(), tight, "entered list");
    }

    pub fn exit_list(&mut self) {
        self.tight.pop();
        trace!(depth = self.tight.len(), "exited list");
    }

    pub fn list_depth(&self) -> usize {
        self.tight.len()
    }

    /// Whether the innermost open list is tight; false outside lists
    pub fn tight_list(&self) -> bool {
        self.tight.last().copied().unwrap_or(false)
    }

    pub fn enter_table(&mut self) {
        self.in_table = true;
    }

    pub fn exit_table(&mut self) {
        self.in_table = false;
    }

    pub fn in_table(&self) -> bool {
        self.in_table
    }

    pub fn enter_code_block(&mut self) {
        self.in_code_block = true;
    }

    pub fn exit_code_block(&mut self) {
        self.in_code_block = false;
    }

    pub fn in_code_block(&self) -> bool {
        self.in_code_block
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get_data(&self, key: &str) -> Option<&AttrValue> {
        self.data.get(key)
    }
}
