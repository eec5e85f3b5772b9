use crate::common::{count, parse};
use marktree::transform::{LinkReferenceOptions, LinkReferenceTransformer, LinkStyle, Transformer};
use marktree::{to_markdown, NodeKind};

fn hrefs(doc: &marktree::Node) -> Vec<String> {
    doc.find_all("link")
        .filter_map(|link| match &link.kind {
            NodeKind::Link { href, .. } => Some(href.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn numeric_references_resolve_when_reparsed() {
    let source = "See [one](https://a.example) and [two](https://b.example) or [one again](https://a.example).\n";
    let original = parse(source);
    let mut transformer = LinkReferenceTransformer::default();
    let doc = transformer.transform(original.clone()).unwrap();

    let markdown = to_markdown(&doc);
    insta::assert_snapshot!(markdown.trim_end(), @r"
    See [one][1] and [two][2] or [one again][1].

    ## References

    [1]: https://a.example

    [2]: https://b.example
    ");

    let reparsed = parse(&markdown);
    assert_eq!(count(&reparsed, "link"), 3);
    assert_eq!(hrefs(&reparsed), hrefs(&original));
    assert_eq!(transformer.references().len(), 3);
}

#[test]
fn text_style_shares_one_id_per_href() {
    let source = "[Rust Book](https://doc.rust-lang.org/book/) and [the book](https://doc.rust-lang.org/book/ \"TRPL\").\n";
    let mut transformer = LinkReferenceTransformer::new(LinkReferenceOptions {
        style: LinkStyle::Text,
        section_title: String::new(),
        ..LinkReferenceOptions::default()
    });
    let doc = transformer.transform(parse(source)).unwrap();
    assert_eq!(
        to_markdown(&doc),
        "[Rust Book][rust-book] and [the book][rust-book].\n\n[rust-book]: https://doc.rust-lang.org/book/\n"
    );
}
