//! Defines the flat event stream emitted by the parser adapter.

use super::node::Alignment;

/// A single event in the document stream.
///
/// Containers are bracketed by a `Start*`/`End*` pair; leaves are single events. The
/// stream for a whole document is wrapped in `StartDocument`/`EndDocument`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument,
    EndDocument,
    StartHeading(u8),
    EndHeading(u8),
    StartParagraph,
    EndParagraph,
    StartBlockQuote,
    EndBlockQuote,
    StartList {
        ordered: bool,
        start: Option<i64>,
        tight: bool,
    },
    EndList,
    StartListItem,
    EndListItem,
    StartTable,
    EndTable,
    StartTableRow,
    EndTableRow,
    StartTableCell {
        header: bool,
        align: Option<Alignment>,
    },
    EndTableCell,
    StartEmphasis,
    EndEmphasis,
    StartStrong,
    EndStrong,
    StartLink {
        href: String,
        title: Option<String>,
    },
    EndLink,
    /// Container of an extension-defined kind, e.g. `strikethrough`
    StartCustom(String),
    EndCustom(String),
    Text(String),
    /// Soft or hard line break
    LineBreak,
    Code(String),
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    Html {
        block: bool,
        content: String,
    },
    Rule,
}

impl Event {
    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartDocument => "StartDocument",
            Event::EndDocument => "EndDocument",
            Event::StartHeading(_) => "StartHeading",
            Event::EndHeading(_) => "EndHeading",
            Event::StartParagraph => "StartParagraph",
            Event::EndParagraph => "EndParagraph",
            Event::StartBlockQuote => "StartBlockQuote",
            Event::EndBlockQuote => "EndBlockQuote",
            Event::StartList { .. } => "StartList",
            Event::EndList => "EndList",
            Event::StartListItem => "StartListItem",
            Event::EndListItem => "EndListItem",
            Event::StartTable => "StartTable",
            Event::EndTable => "EndTable",
            Event::StartTableRow => "StartTableRow",
            Event::EndTableRow => "EndTableRow",
            Event::StartTableCell { .. } => "StartTableCell",
            Event::EndTableCell => "EndTableCell",
            Event::StartEmphasis => "StartEmphasis",
            Event::EndEmphasis => "EndEmphasis",
            Event::StartStrong => "StartStrong",
            Event::EndStrong => "EndStrong",
            Event::StartLink { .. } => "StartLink",
            Event::EndLink => "EndLink",
            Event::StartCustom(_) => "StartCustom",
            Event::EndCustom(_) => "EndCustom",
            Event::Text(_) => "Text",
            Event::LineBreak => "LineBreak",
            Event::Code(_) => "Code",
            Event::CodeBlock { .. } => "CodeBlock",
            Event::Image { .. } => "Image",
            Event::Html { .. } => "Html",
            Event::Rule => "Rule",
        }
    }
}
