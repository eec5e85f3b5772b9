//! Inspection views
//!
//! Each view shows one stage of the pipeline:
//!
//!  - `events`:   the flat event stream produced by the parser adapter, one per line
//!  - `ast-tree`: the tree after extension hooks and transformers, indented (default)
//!  - `ast-json`: the same tree as pretty-printed JSON
//!
//! Example: `marktree inspect notes.md ast-json --extension gfm`

use marktree::{MarkdownParser, Node, NodeKind, Pipeline};

/// All available inspection views
pub const AVAILABLE_VIEWS: &[&str] = &["ast-tree", "ast-json", "events"];

pub const DEFAULT_VIEW: &str = "ast-tree";

/// Render `source` through the requested view
pub fn execute_view(source: &str, view: &str, pipeline: &mut Pipeline) -> Result<String, String> {
    match view {
        "events" => {
            let mut out = String::new();
            for event in MarkdownParser::new().events(source) {
                out.push_str(&format!("{event:?}\n"));
            }
            Ok(out)
        }
        "ast-tree" => {
            let document = build_tree(source, pipeline)?;
            let mut out = String::new();
            write_tree(&document, 0, &mut out);
            Ok(out)
        }
        "ast-json" => {
            let document = build_tree(source, pipeline)?;
            serde_json::to_string_pretty(&document)
                .map(|json| json + "\n")
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        _ => Err(format!(
            "Unknown view '{view}'. Available: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn build_tree(source: &str, pipeline: &mut Pipeline) -> Result<Node, String> {
    let document = pipeline
        .parse(source)
        .map_err(|e| format!("Parse failed: {e}"))?;
    pipeline
        .transform(document)
        .map_err(|e| format!("Transform failed: {e}"))
}

fn write_tree(node: &Node, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&label(node));
    out.push('\n');
    for child in &node.children {
        write_tree(child, depth + 1, out);
    }
}

/// One-line description: kind, kind-specific fields, attributes, content
fn label(node: &Node) -> String {
    let mut label = node.kind_name().to_string();
    match &node.kind {
        NodeKind::Heading { level } => label.push_str(&format!(" level={level}")),
        NodeKind::Link { href, .. } => label.push_str(&format!(" href={href:?}")),
        NodeKind::Image { src, .. } => label.push_str(&format!(" src={src:?}")),
        NodeKind::CodeBlock {
            language: Some(language),
        } => label.push_str(&format!(" language={language}")),
        NodeKind::List { ordered, tight, .. } => {
            label.push_str(&format!(" ordered={ordered} tight={tight}"))
        }
        _ => {}
    }
    for (key, value) in node.attributes.iter() {
        label.push_str(&format!(" @{key}={value}"));
    }
    if let Some(content) = &node.content {
        label.push_str(&format!(" {content:?}"));
    }
    label
}
