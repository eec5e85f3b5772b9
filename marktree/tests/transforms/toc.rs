use crate::common::parse;
use marktree::transform::{IdGeneratorTransformer, TocGenerator, TocOptions, Transformer};
use marktree::{to_markdown, Node, TransformerChain};

fn with_toc(text: &str, options: TocOptions) -> Node {
    let mut chain = TransformerChain::from_transformers(vec![
        Box::new(IdGeneratorTransformer::for_headings()),
        Box::new(TocGenerator::new(options)),
    ]);
    chain.transform(parse(text)).unwrap()
}

#[test]
fn marker_is_replaced_by_a_nested_toc() {
    let doc = with_toc(
        "# Guide\n\n[[TOC]]\n\n## Install\n\n### From source\n\n## Usage\n",
        TocOptions::default(),
    );
    insta::assert_snapshot!(to_markdown(&doc).trim_end(), @r"
    # Guide

    ## Table of Contents

    - [Guide](#guide)
       - [Install](#install)
          - [From source](#from-source)
       - [Usage](#usage)

    ## Install

    ### From source

    ## Usage
    ");
}

#[test]
fn every_entry_links_to_an_existing_id() {
    let doc = with_toc(
        "# One\n\n## Two\n\n## Two\n\n#### Deep\n\n### Three\n",
        TocOptions {
            min_level: 2,
            max_level: 3,
            ..TocOptions::default()
        },
    );

    let ids: Vec<String> = doc
        .find_all("heading")
        .filter_map(|h| h.attr_str("id").map(str::to_string))
        .collect();
    let targets: Vec<String> = doc
        .find_all("link")
        .map(|link| match &link.kind {
            marktree::NodeKind::Link { href, .. } => href.trim_start_matches('#').to_string(),
            _ => unreachable!(),
        })
        .collect();

    assert_eq!(targets, vec!["two", "two-1", "three"]);
    assert!(targets.iter().all(|t| ids.contains(t)));
}

#[test]
fn headings_outside_the_range_leave_the_document_alone() {
    let text = "#### Only deep\n\nBody\n";
    let mut toc = TocGenerator::default();
    let doc = toc.transform(parse(text)).unwrap();
    assert!(toc.toc().is_none());
    assert_eq!(to_markdown(&doc), text);
}
