//! Converts a flat event stream into a nested document tree.
//!
//! # The High-Level Concept
//!
//! The parser collaborator hands us a linear sequence of events. The builder uses a stack
//! as a memory of "open" containers: a `Start*` event pushes a fresh node, which becomes
//! the current container; the matching `End*` event pops it and appends it to whatever is
//! now on top. Leaf events (text, inline code, code blocks, images, rules, raw HTML) are
//! appended to the current container without touching the stack.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Expect `StartDocument` and push an empty document node
//!
//! 2. **Processing `Start` Events:**
//!    - Build the node for that container (heading level, list shape, link target, ...)
//!    - Push it onto the stack as the new current container
//!
//! 3. **Processing Leaf Events:**
//!    - Append the leaf to the container on top of the stack
//!    - Adjacent text runs are merged into one Text node
//!
//! 4. **Processing `End` Events:**
//!    - Pop the node off the stack
//!    - Validate that the popped node is the container the event closes
//!    - Append it to the new top of the stack
//!
//! 5. **Completion:**
//!    - On `EndDocument` the stack must hold only the document node
//!    - No events may follow `EndDocument`

use crate::ast::{Event, Node, NodeKind};
use thiserror::Error;

/// Error type for flat-to-nested conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Stack was empty when trying to pop
    #[error("unexpected end event: {0}")]
    UnexpectedEnd(String),
    /// Mismatched start/end events
    #[error("mismatched events: expected {expected}, found {found}")]
    MismatchedEvents { expected: String, found: String },
    /// Inline content in a container that only holds blocks
    #[error("unexpected inline content: {0}")]
    UnexpectedInline(String),
    /// Events remaining after document end
    #[error("extra events after document end")]
    ExtraEvents,
    /// Stack not empty at end (unclosed containers)
    #[error("unclosed containers: {0} nodes remain on stack")]
    UnclosedContainers(usize),
}

/// Build a document tree from a flat event stream.
///
/// An empty stream yields an empty document.
pub fn events_to_tree(events: &[Event]) -> Result<Node, ConversionError> {
    let mut iter = events.iter().peekable();

    let mut stack = match iter.next() {
        None => return Ok(Node::document()),
        Some(Event::StartDocument) => vec![Node::document()],
        Some(other) => {
            return Err(ConversionError::MismatchedEvents {
                expected: "StartDocument".to_string(),
                found: other.name().to_string(),
            })
        }
    };

    while let Some(event) = iter.next() {
        match event {
            Event::StartDocument => {
                return Err(ConversionError::MismatchedEvents {
                    expected: "content or EndDocument".to_string(),
                    found: event.name().to_string(),
                });
            }
            Event::EndDocument => {
                if stack.len() != 1 {
                    return Err(ConversionError::UnclosedContainers(stack.len() - 1));
                }
                if iter.peek().is_some() {
                    return Err(ConversionError::ExtraEvents);
                }
                return stack
                    .pop()
                    .ok_or_else(|| ConversionError::UnexpectedEnd("EndDocument".to_string()));
            }
            Event::StartHeading(level) => stack.push(Node::new(NodeKind::Heading { level: *level })),
            Event::StartParagraph => stack.push(Node::paragraph()),
            Event::StartBlockQuote => stack.push(Node::blockquote()),
            Event::StartList {
                ordered,
                start,
                tight,
            } => stack.push(Node::list(*ordered, *start, *tight)),
            Event::StartListItem => stack.push(Node::list_item()),
            Event::StartTable => stack.push(Node::table()),
            Event::StartTableRow => stack.push(Node::table_row()),
            Event::StartTableCell { header, align } => stack.push(Node::table_cell(*header, *align)),
            Event::StartEmphasis => stack.push(Node::emphasis()),
            Event::StartStrong => stack.push(Node::strong()),
            Event::StartLink { href, title } => stack.push(Node::link(href.clone(), title.clone())),
            Event::StartCustom(name) => stack.push(Node::new(NodeKind::Custom { name: name.clone() })),

            Event::EndHeading(_)
            | Event::EndParagraph
            | Event::EndBlockQuote
            | Event::EndList
            | Event::EndListItem
            | Event::EndTable
            | Event::EndTableRow
            | Event::EndTableCell
            | Event::EndEmphasis
            | Event::EndStrong
            | Event::EndLink
            | Event::EndCustom(_) => close_container(&mut stack, event)?,

            Event::Text(text) => append_text(&mut stack, text)?,
            Event::LineBreak => append_text(&mut stack, "\n")?,
            Event::Code(code) => append_inline(&mut stack, Node::inline_code(code.clone()))?,
            Event::Html {
                block: false,
                content,
            } => append_inline(&mut stack, Node::html_inline(content.clone()))?,
            Event::Html {
                block: true,
                content,
            } => append_block(&mut stack, Node::html_block(content.clone()))?,
            Event::CodeBlock { language, content } => {
                append_block(&mut stack, Node::code_block(content.clone(), language.clone()))?
            }
            Event::Image { src, alt, title } => append_inline(
                &mut stack,
                Node::image(src.clone(), alt.clone(), title.clone()),
            )?,
            Event::Rule => append_block(&mut stack, Node::horizontal_rule())?,
        }
    }

    // If we reach here, the document wasn't properly closed
    Err(ConversionError::UnclosedContainers(stack.len()))
}

/// Whether `event` is the end marker for `node`
fn closes(node: &Node, event: &Event) -> bool {
    match (&node.kind, event) {
        (NodeKind::Heading { level }, Event::EndHeading(end)) => level == end,
        (NodeKind::Paragraph, Event::EndParagraph)
        | (NodeKind::BlockQuote, Event::EndBlockQuote)
        | (NodeKind::List { .. }, Event::EndList)
        | (NodeKind::ListItem, Event::EndListItem)
        | (NodeKind::Table, Event::EndTable)
        | (NodeKind::TableRow, Event::EndTableRow)
        | (NodeKind::TableCell { .. }, Event::EndTableCell)
        | (NodeKind::Emphasis, Event::EndEmphasis)
        | (NodeKind::Strong, Event::EndStrong)
        | (NodeKind::Link { .. }, Event::EndLink) => true,
        (NodeKind::Custom { name }, Event::EndCustom(end)) => name == end,
        _ => false,
    }
}

fn close_container(stack: &mut Vec<Node>, event: &Event) -> Result<(), ConversionError> {
    // The document itself is only closed by EndDocument
    if stack.len() < 2 {
        return Err(ConversionError::UnexpectedEnd(format!(
            "{} with no open container",
            event.name()
        )));
    }
    let node = stack
        .pop()
        .ok_or_else(|| ConversionError::UnexpectedEnd(event.name().to_string()))?;
    if !closes(&node, event) {
        return Err(ConversionError::MismatchedEvents {
            expected: format!("end of {}", node.kind_name()),
            found: event.name().to_string(),
        });
    }
    let parent = stack
        .last_mut()
        .ok_or_else(|| ConversionError::UnexpectedEnd(format!("no parent for {}", node.kind_name())))?;
    parent.add_child(node);
    Ok(())
}

/// Containers that only hold block-level or structural children
fn rejects_inline(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::Document | NodeKind::List { .. } | NodeKind::Table | NodeKind::TableRow
    )
}

fn current(stack: &mut [Node]) -> Result<&mut Node, ConversionError> {
    stack
        .last_mut()
        .ok_or_else(|| ConversionError::UnexpectedEnd("empty stack".to_string()))
}

fn append_inline(stack: &mut [Node], node: Node) -> Result<(), ConversionError> {
    let parent = current(stack)?;
    if rejects_inline(parent) {
        return Err(ConversionError::UnexpectedInline(format!(
            "{} inside {}",
            node.kind_name(),
            parent.kind_name()
        )));
    }
    parent.add_child(node);
    Ok(())
}

fn append_block(stack: &mut [Node], node: Node) -> Result<(), ConversionError> {
    current(stack)?.add_child(node);
    Ok(())
}

fn append_text(stack: &mut [Node], text: &str) -> Result<(), ConversionError> {
    let parent = current(stack)?;
    if rejects_inline(parent) {
        return Err(ConversionError::UnexpectedInline(format!(
            "text inside {}",
            parent.kind_name()
        )));
    }
    match parent.children.last_mut() {
        Some(last) if last.is("text") && last.attributes.is_empty() => {
            last.content.get_or_insert_with(String::new).push_str(text);
        }
        _ => parent.add_child(Node::text(text)),
    }
    Ok(())
}
