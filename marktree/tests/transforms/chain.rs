use crate::common::parse;
use marktree::common::params::Params;
use marktree::{to_html, Transformer, TransformerRegistry};

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn registry_chain_runs_in_order() {
    let registry = TransformerRegistry::default();
    let names = vec!["heading_level".to_string(), "id_generator".to_string()];
    let configs = vec![params(&[("operation", "increase")]), Params::new()];
    let mut chain = registry.create_chain(&names, Some(&configs)).unwrap();
    assert_eq!(chain.names(), vec!["heading_level", "id_generator"]);

    let doc = chain.transform(parse("# A\n\n## B\n")).unwrap();
    assert_eq!(to_html(&doc), "<h2 id=\"a\">A</h2>\n<h3 id=\"b\">B</h3>\n");
}

#[test]
fn normalize_closes_level_gaps() {
    let registry = TransformerRegistry::default();
    let mut normalize = registry
        .create("heading_level", &params(&[("operation", "normalize")]))
        .unwrap();
    let doc = normalize.transform(parse("## A\n\n#### B\n\n###### C\n")).unwrap();
    let levels: Vec<u8> = doc.find_all("heading").filter_map(|h| h.heading_level()).collect();
    assert_eq!(levels, vec![1, 2, 3]);
}

#[test]
fn mismatched_configs_are_rejected() {
    let registry = TransformerRegistry::default();
    let names = vec!["toc".to_string()];
    let err = registry
        .create_chain(&names, Some(&[Params::new(), Params::new()]))
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "number of configs (2) must match number of transformers (1)"
    );
}

#[test]
fn bad_options_surface_as_errors() {
    let err = TransformerRegistry::default()
        .create("toc", &params(&[("max_level", "9")]))
        .err()
        .unwrap();
    assert!(err.to_string().contains("max_level"));
}
