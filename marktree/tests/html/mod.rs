//! HTML rendering tests, parsed from Markdown text

mod export;
