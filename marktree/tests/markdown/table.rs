use crate::common::parse;
use marktree::ast::Alignment;
use marktree::{to_markdown, Node, NodeKind};

#[test]
fn columns_pad_to_the_widest_cell() {
    let doc = parse("| H1 | H22 |\n|---|---|\n| a | bb |\n");
    assert_eq!(to_markdown(&doc), "| H1  | H22 |\n| --- | --- |\n| a   | bb  |\n");
}

#[test]
fn alignment_is_parsed_and_rendered() {
    let doc = parse("| Left | Center | Right |\n| :--- | :----: | ----: |\n| L | C | R |\n");
    let aligns: Vec<Option<Alignment>> = doc
        .find_all("table_cell")
        .take(3)
        .filter_map(|cell| match cell.kind {
            NodeKind::TableCell { align, .. } => Some(align),
            _ => None,
        })
        .collect();
    assert_eq!(
        aligns,
        vec![Some(Alignment::Left), Some(Alignment::Center), Some(Alignment::Right)]
    );

    assert_eq!(
        to_markdown(&doc),
        "| Left | Center | Right |\n| :--- | :----: | ----: |\n| L    |   C    |     R |\n"
    );
}

#[test]
fn headerless_tables_still_get_a_separator() {
    let row = |a: &str, b: &str| {
        Node::table_row()
            .with_child(Node::table_cell(false, None).with_child(Node::text(a)))
            .with_child(Node::table_cell(false, None).with_child(Node::text(b)))
    };
    let doc = Node::document().with_child(Node::table().with_child(row("x", "y")).with_child(row("1", "2")));
    let markdown = to_markdown(&doc);
    assert_eq!(markdown, "| x   | y   |\n| --- | --- |\n| 1   | 2   |\n");
    assert_eq!(parse(&markdown).find_all("table_row").count(), 2);
}
