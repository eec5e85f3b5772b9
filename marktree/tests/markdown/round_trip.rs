use crate::common::{count, parse, KITCHENSINK};
use marktree::{to_markdown, Node, NodeKind};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn inline() -> impl Strategy<Value = Node> {
    prop_oneof![
        word().prop_map(Node::text),
        word().prop_map(|w| Node::emphasis().with_child(Node::text(w))),
        word().prop_map(|w| Node::strong().with_child(Node::text(w))),
        (word(), word()).prop_map(|(text, path)| {
            Node::link(format!("https://example.com/{path}"), None).with_child(Node::text(text))
        }),
    ]
}

/// Inline nodes separated by single spaces
fn spaced(inlines: Vec<Node>) -> Vec<Node> {
    let mut children = Vec::new();
    for (i, inline) in inlines.into_iter().enumerate() {
        if i > 0 {
            children.push(Node::text(" "));
        }
        children.push(inline);
    }
    children
}

fn paragraph() -> impl Strategy<Value = Node> {
    prop::collection::vec(inline(), 1..6).prop_map(|inlines| Node::paragraph().with_children(spaced(inlines)))
}

fn heading() -> impl Strategy<Value = Node> {
    (1u8..=6, prop::collection::vec(inline(), 1..4)).prop_map(|(level, inlines)| {
        Node::heading(level).unwrap().with_children(spaced(inlines))
    })
}

fn list() -> impl Strategy<Value = Node> {
    (any::<bool>(), prop::collection::vec(paragraph(), 1..4)).prop_map(|(ordered, paragraphs)| {
        Node::list(ordered, ordered.then_some(1), true)
            .with_children(paragraphs.into_iter().map(|p| Node::list_item().with_child(p)))
    })
}

fn document() -> impl Strategy<Value = Node> {
    prop::collection::vec(prop_oneof![heading(), paragraph(), list()], 1..8).prop_map(|blocks| {
        let mut doc = Node::document();
        for block in blocks {
            let is_list = block.is("list");
            doc.add_child(block);
            // keeps consecutive lists from merging when re-parsed
            if is_list {
                doc.add_child(Node::paragraph().with_child(Node::text("end")));
            }
        }
        doc
    })
}

proptest! {
    #[test]
    fn reparsed_markdown_keeps_structure(doc in document()) {
        let markdown = to_markdown(&doc);
        let reparsed = parse(&markdown);
        for kind in ["heading", "list", "link"] {
            prop_assert_eq!(count(&reparsed, kind), count(&doc, kind), "{} count in {:?}", kind, markdown);
        }
        prop_assert_eq!(to_markdown(&reparsed), markdown);
    }
}

#[test]
fn kitchensink_is_a_fixed_point() {
    let doc = parse(KITCHENSINK);
    assert_eq!(to_markdown(&doc), KITCHENSINK);
}

#[test]
fn escaped_text_survives_a_round_trip() {
    let source = "Use \\*stars\\*, \\[brackets\\] and a \\# hash\n";
    let doc = parse(source);
    let text = doc.find_all("text").next().and_then(|t| t.content.clone());
    assert_eq!(text.as_deref(), Some("Use *stars*, [brackets] and a # hash"));
    assert_eq!(to_markdown(&doc), source);
}

#[test]
fn fences_outgrow_their_content() {
    let source = "````\n```\ninner\n```\n````\n";
    let doc = parse(source);
    assert_eq!(to_markdown(&doc), source);
}

#[test]
fn image_alt_with_brackets_survives_a_round_trip() {
    let image = Node::image("shot.png", "a [b] c", None);
    let doc = Node::document().with_child(Node::paragraph().with_child(image));
    let reparsed = parse(&to_markdown(&doc));
    let alts: Vec<_> = reparsed
        .find_all("image")
        .filter_map(|node| match &node.kind {
            NodeKind::Image { alt, .. } => Some(alt.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(alts, vec!["a [b] c"]);
}
