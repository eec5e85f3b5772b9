//! Slugs and unique identifiers.
//!
//! Every operation in the crate that assigns a unique identifier (heading ids, table ids,
//! text-style reference ids) goes through the same linear probe: try the base slug, then
//! `base-1`, `base-2`, ... until an unused value is found.

use std::collections::HashSet;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Fallback used when a label slugifies to nothing
pub const EMPTY_SLUG_FALLBACK: &str = "section";

/// Knobs for [`slugify_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugOptions {
    pub lowercase: bool,
    pub separator: String,
    pub max_length: Option<usize>,
    /// Characters kept in addition to ASCII letters and digits
    pub allowed_chars: String,
}

impl Default for SlugOptions {
    fn default() -> Self {
        SlugOptions {
            lowercase: true,
            separator: "-".to_string(),
            max_length: None,
            allowed_chars: String::new(),
        }
    }
}

impl SlugOptions {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Slugify with the default options (lowercase, `-` separator, no length limit)
pub fn slugify(text: &str) -> String {
    slugify_with(text, &SlugOptions::default())
}

/// Turn arbitrary text into a URL/ID-safe token.
///
/// Compatibility-decomposes the text, drops anything that is not ASCII, keeps letters,
/// digits, whitespace, `-` and `allowed_chars`, collapses whitespace/hyphen runs into one
/// separator and trims separators from both ends. With `max_length` the result is cut to
/// that many characters without leaving a dangling separator.
pub fn slugify_with(text: &str, options: &SlugOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let ascii = if options.lowercase {
        ascii.to_ascii_lowercase()
    } else {
        ascii
    };

    let mut slug = String::with_capacity(ascii.len());
    let mut in_gap = false;
    for c in ascii.chars() {
        if is_space(c) || c == '-' {
            in_gap = true;
        } else if c.is_ascii_alphanumeric() || options.allowed_chars.contains(c) {
            if in_gap {
                slug.push_str(&options.separator);
                in_gap = false;
            }
            slug.push(c);
        }
    }
    if in_gap {
        slug.push_str(&options.separator);
    }

    let is_sep = |c: char| options.separator.contains(c);
    let mut slug = slug.trim_matches(is_sep).to_string();

    if let Some(max) = options.max_length {
        if slug.len() > max {
            let mut cut = max;
            while !slug.is_char_boundary(cut) {
                cut -= 1;
            }
            slug.truncate(cut);
            slug = slug.trim_end_matches(is_sep).to_string();
        }
    }

    slug
}

// ASCII whitespace as understood by regex `\s`, including vertical tab
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Probe `base`, `base-1`, `base-2`, ... and return the first value not in `taken`
pub fn unique_with_suffix(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter = 1usize;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate) {
            debug!(id = %candidate, "generated unique id");
            return candidate;
        }
        counter += 1;
    }
}

/// One-shot unique id from text; an empty slug falls back to `section`
pub fn generate_id(text: &str, existing: &HashSet<String>) -> String {
    let base = slugify(text);
    let base = if base.is_empty() {
        EMPTY_SLUG_FALLBACK.to_string()
    } else {
        base
    };
    unique_with_suffix(&base, existing)
}

/// Stateful id generator remembering every id it has issued or been told about
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    prefix: String,
    separator: String,
    used: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::with_prefix("", "-")
    }

    pub fn with_prefix(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        IdGenerator {
            prefix: prefix.into(),
            separator: separator.into(),
            used: HashSet::new(),
        }
    }

    /// Produce a new unique id for `text` and remember it
    pub fn generate(&mut self, text: &str) -> String {
        let label = if self.prefix.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.prefix, self.separator, text)
        };

        let options = SlugOptions {
            separator: self.separator.clone(),
            allowed_chars: self.separator.clone(),
            ..SlugOptions::default()
        };
        let base = slugify_with(&label, &options);
        let base = if base.is_empty() {
            EMPTY_SLUG_FALLBACK.to_string()
        } else {
            base
        };

        let id = unique_with_suffix(&base, &self.used);
        self.used.insert(id.clone());
        id
    }

    /// Mark an externally assigned id as taken
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.used.insert(id.into());
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn reset(&mut self) {
        self.used.clear();
        debug!("reset id generator");
    }
}
