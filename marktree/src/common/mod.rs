//! Format-agnostic tree utilities shared by the parser, transformers and renderers.

pub mod flat_to_nested;
pub mod params;
pub mod slug;
pub mod text;

pub use flat_to_nested::{events_to_tree, ConversionError};
pub use params::Params;
pub use slug::{generate_id, slugify, slugify_with, IdGenerator, SlugOptions};
pub use text::{collect_links, extract_text, LinkInfo};
