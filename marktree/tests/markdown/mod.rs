//! Markdown rendering tests
//!
//! Parse → tree → Markdown, including the round-trip guarantees.

mod export;
mod round_trip;
mod table;
