use marktree::transform::heading::normalize_headings;
use marktree::validate::{validate, Validator};
use marktree::{Node, NodeKind};

fn heading(level: u8, text: &str) -> Node {
    Node::heading(level).unwrap().with_child(Node::text(text))
}

#[test]
fn flags_the_classic_violations() {
    let bad_heading = Node::new(NodeKind::Heading { level: 7 }).with_child(Node::text("deep"));
    let bad_list = Node::list(false, None, true)
        .with_child(Node::paragraph().with_child(Node::text("not an item")));
    let bad_table = Node::table()
        .with_child(
            Node::table_row()
                .with_child(Node::table_cell(true, None))
                .with_child(Node::table_cell(true, None)),
        )
        .with_child(Node::table_row().with_child(Node::table_cell(false, None)));
    let bad_link = Node::paragraph().with_child(Node::link("", None).with_child(Node::text("x")));
    let bad_image = Node::paragraph()
        .with_child(Node::image("a.png", "a", None).with_child(Node::text("child")));

    let doc = Node::document()
        .with_child(bad_heading)
        .with_child(bad_list)
        .with_child(bad_table)
        .with_child(bad_link)
        .with_child(bad_image);

    let errors = validate(&doc, false);
    let kinds: Vec<&str> = errors.iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, vec!["heading", "paragraph", "table", "link", "image"]);
    assert!(!Validator::new(false).is_valid(&doc));
}

#[test]
fn normalized_headings_validate_cleanly() {
    let doc = Node::document()
        .with_child(heading(2, "a"))
        .with_child(heading(4, "b"))
        .with_child(heading(6, "c"))
        .with_child(heading(4, "d"));
    let doc = normalize_headings(doc);

    let levels: Vec<u8> = doc.find_all("heading").filter_map(Node::heading_level).collect();
    assert_eq!(levels, vec![1, 2, 3, 2]);
    assert!(validate(&doc, false).is_empty());
}
