use marktree::common::params::Params;
use marktree::parse::{MarkdownParser, ParseOptions};
use marktree::{to_html, ExtensionManager, OutputFormat, Pipeline};

const TASKS: &str = "## Todo\n\n- [x] ship ~~v1~~ v2\n- [ ] write docs\n- plain item\n";

fn gfm(output: OutputFormat) -> Pipeline {
    let extensions = ExtensionManager::with_extensions(&["gfm"]).unwrap();
    Pipeline::new()
        .with_extensions(extensions)
        .with_output(output, Params::new())
}

#[test]
fn tasks_render_as_checkboxes() {
    let html = gfm(OutputFormat::Html).run(TASKS).unwrap();
    insta::assert_snapshot!(html.trim_end(), @r#"
    <h2>Todo</h2>
    <ul>
    <li><input type="checkbox" disabled checked> ship <del>v1</del> v2</li>
    <li><input type="checkbox" disabled> write docs</li>
    <li>plain item</li>
    </ul>
    "#);
}

#[test]
fn tasks_round_trip_through_markdown() {
    let mut pipeline = gfm(OutputFormat::Markdown);
    let markdown = pipeline.run(TASKS).unwrap();
    assert_eq!(markdown, TASKS);
}

#[test]
fn grammar_without_renderer_falls_back_to_a_comment() {
    let parser = MarkdownParser::with_options(ParseOptions {
        strikethrough: true,
        ..ParseOptions::default()
    });
    let doc = Pipeline::new().with_parser(Box::new(parser)).parse("a ~~b~~ c\n").unwrap();
    assert_eq!(to_html(&doc), "<p>a <!-- Unknown node type: strikethrough --> c</p>\n");
}

#[test]
fn extension_order_is_kept() {
    let pipeline = Pipeline::new().with_extensions(ExtensionManager::with_extensions(&["kbd", "gfm"]).unwrap());
    assert_eq!(pipeline.extensions().list(), vec!["kbd", "gfm"]);
}
