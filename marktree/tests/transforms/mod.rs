//! Transformer tests on parsed documents

mod chain;
mod links;
mod toc;
