//! Tree model: nodes, their attributes, and the flat event form used at the parser boundary.

pub mod attributes;
pub mod events;
pub mod node;

pub use attributes::{AttrValue, Attributes};
pub use events::Event;
pub use node::{Alignment, Node, NodeKind, Walk};
