//! Shared configuration loader for the marktree toolchain.
//!
//! `defaults/marktree.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MarktreeConfig`].
//!
//! Each section converts into the matching option struct of the library, and into a
//! string [`Params`] map for the name-based registries, where `--extra-<key>` values
//! from the command line can be merged over it.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use marktree::common::params::Params;
use marktree::parse::ParseOptions;
use marktree::render::{HeadingStyle, HtmlOptions, MarkdownOptions};
use marktree::transform::{
    HeadingLevelOptions, HeadingOperation, IdGeneratorOptions, LinkReferenceOptions, LinkStyle,
    TocOptions,
};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/marktree.default.toml");

/// Top-level configuration consumed by marktree applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarktreeConfig {
    pub parse: ParseConfig,
    pub extensions: ExtensionsConfig,
    pub transforms: TransformsConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Grammar switches handed to the parser.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub tables: bool,
    pub autolink: bool,
    pub strikethrough: bool,
    pub smart: bool,
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions {
            tables: config.tables,
            autolink: config.autolink,
            strikethrough: config.strikethrough,
            smart: config.smart,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionsConfig {
    /// Built-in extension names, registered in order
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformsConfig {
    /// Transformer names, applied in order
    pub enabled: Vec<String>,
    pub heading_level: HeadingLevelConfig,
    pub id_generator: IdGeneratorConfig,
    pub toc: TocConfig,
    pub link_reference: LinkReferenceConfig,
}

impl TransformsConfig {
    /// Parameters for the registry constructor of transformer `name`; empty when the
    /// name has no section.
    pub fn params_for(&self, name: &str) -> Params {
        match name {
            "heading_level" => self.heading_level.params(),
            "id_generator" => self.id_generator.params(),
            "toc" => self.toc.params(),
            "link_reference" => self.link_reference.params(),
            _ => Params::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingOperationName {
    Increase,
    Decrease,
    Set,
    Normalize,
}

impl HeadingOperationName {
    fn as_str(&self) -> &'static str {
        match self {
            HeadingOperationName::Increase => "increase",
            HeadingOperationName::Decrease => "decrease",
            HeadingOperationName::Set => "set",
            HeadingOperationName::Normalize => "normalize",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadingLevelConfig {
    pub operation: HeadingOperationName,
    /// Used by increase and decrease
    pub amount: i64,
    /// Used by set
    pub level: u8,
    pub min_level: u8,
    pub max_level: u8,
}

impl HeadingLevelConfig {
    pub fn params(&self) -> Params {
        params([
            ("operation", self.operation.as_str().to_string()),
            ("amount", self.amount.to_string()),
            ("level", self.level.to_string()),
            ("min_level", self.min_level.to_string()),
            ("max_level", self.max_level.to_string()),
        ])
    }
}

impl From<&HeadingLevelConfig> for HeadingLevelOptions {
    fn from(config: &HeadingLevelConfig) -> Self {
        let operation = match config.operation {
            HeadingOperationName::Increase => HeadingOperation::Increase(config.amount),
            HeadingOperationName::Decrease => HeadingOperation::Decrease(config.amount),
            HeadingOperationName::Set => HeadingOperation::Set(config.level),
            HeadingOperationName::Normalize => HeadingOperation::Normalize,
        };
        HeadingLevelOptions {
            operation,
            min_level: config.min_level,
            max_level: config.max_level,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdGeneratorConfig {
    pub prefix: String,
    pub separator: String,
    pub overwrite: bool,
    pub target_elements: Vec<String>,
}

impl IdGeneratorConfig {
    pub fn params(&self) -> Params {
        params([
            ("prefix", self.prefix.clone()),
            ("separator", self.separator.clone()),
            ("overwrite", self.overwrite.to_string()),
            ("target_elements", self.target_elements.join(",")),
        ])
    }
}

impl From<&IdGeneratorConfig> for IdGeneratorOptions {
    fn from(config: &IdGeneratorConfig) -> Self {
        IdGeneratorOptions {
            prefix: config.prefix.clone(),
            separator: config.separator.clone(),
            overwrite: config.overwrite,
            target_elements: config.target_elements.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TocConfig {
    pub min_level: u8,
    pub max_level: u8,
    pub title: String,
    pub marker: String,
    pub insert: bool,
    pub ordered: bool,
}

impl TocConfig {
    pub fn params(&self) -> Params {
        params([
            ("min_level", self.min_level.to_string()),
            ("max_level", self.max_level.to_string()),
            ("title", self.title.clone()),
            ("marker", self.marker.clone()),
            ("insert", self.insert.to_string()),
            ("ordered", self.ordered.to_string()),
        ])
    }
}

impl From<&TocConfig> for TocOptions {
    fn from(config: &TocConfig) -> Self {
        TocOptions {
            min_level: config.min_level,
            max_level: config.max_level,
            title: config.title.clone(),
            marker: config.marker.clone(),
            insert: config.insert,
            ordered: config.ordered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyleName {
    Numeric,
    Text,
}

impl From<LinkStyleName> for LinkStyle {
    fn from(name: LinkStyleName) -> Self {
        match name {
            LinkStyleName::Numeric => LinkStyle::Numeric,
            LinkStyleName::Text => LinkStyle::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkReferenceConfig {
    pub style: LinkStyleName,
    pub section_title: String,
    pub dedup: bool,
    pub preserve_titles: bool,
}

impl LinkReferenceConfig {
    pub fn params(&self) -> Params {
        params([
            ("style", LinkStyle::from(self.style).as_str().to_string()),
            ("section_title", self.section_title.clone()),
            ("dedup", self.dedup.to_string()),
            ("preserve_titles", self.preserve_titles.to_string()),
        ])
    }
}

impl From<&LinkReferenceConfig> for LinkReferenceOptions {
    fn from(config: &LinkReferenceConfig) -> Self {
        LinkReferenceOptions {
            style: config.style.into(),
            section_title: config.section_title.clone(),
            dedup: config.dedup,
            preserve_titles: config.preserve_titles,
        }
    }
}

/// Per-format renderer knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub markdown: MarkdownConfig,
    pub html: HtmlConfig,
}

impl RenderConfig {
    /// Parameters for the renderer registered as `format`
    pub fn params_for(&self, format: &str) -> Params {
        match format {
            "markdown" | "md" => self.markdown.params(),
            "html" => self.html.params(),
            _ => Params::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyleName {
    Atx,
    Setext,
}

impl From<HeadingStyleName> for HeadingStyle {
    fn from(name: HeadingStyleName) -> Self {
        match name {
            HeadingStyleName::Atx => HeadingStyle::Atx,
            HeadingStyleName::Setext => HeadingStyle::Setext,
        }
    }
}

/// Mirrors the knobs exposed by the Markdown renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub heading_style: HeadingStyleName,
    pub emphasis_char: String,
    pub strong_char: String,
    pub bullet_char: char,
    pub code_fence: char,
    pub line_width: usize,
}

impl MarkdownConfig {
    pub fn params(&self) -> Params {
        let heading_style = match self.heading_style {
            HeadingStyleName::Atx => "atx",
            HeadingStyleName::Setext => "setext",
        };
        params([
            ("heading_style", heading_style.to_string()),
            ("emphasis_char", self.emphasis_char.clone()),
            ("strong_char", self.strong_char.clone()),
            ("bullet_char", self.bullet_char.to_string()),
            ("code_fence", self.code_fence.to_string()),
            ("line_width", self.line_width.to_string()),
        ])
    }
}

impl From<&MarkdownConfig> for MarkdownOptions {
    fn from(config: &MarkdownConfig) -> Self {
        MarkdownOptions {
            heading_style: config.heading_style.into(),
            emphasis_char: config.emphasis_char.clone(),
            strong_char: config.strong_char.clone(),
            bullet_char: config.bullet_char,
            code_fence: config.code_fence,
            line_width: config.line_width,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub xhtml: bool,
    pub breaks: bool,
    pub lang_prefix: String,
    pub typographer: bool,
}

impl HtmlConfig {
    pub fn params(&self) -> Params {
        params([
            ("xhtml", self.xhtml.to_string()),
            ("breaks", self.breaks.to_string()),
            ("lang_prefix", self.lang_prefix.clone()),
            ("typographer", self.typographer.to_string()),
        ])
    }
}

impl From<&HtmlConfig> for HtmlOptions {
    fn from(config: &HtmlConfig) -> Self {
        HtmlOptions {
            xhtml: config.xhtml,
            breaks: config.breaks,
            lang_prefix: config.lang_prefix.clone(),
            typographer: config.typographer,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (`error`, `warn`, `info`, ...)
    pub level: String,
}

fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MarktreeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarktreeConfig, ConfigError> {
    Loader::new().build()
}
