use crate::common::{parse, KITCHENSINK};
use marktree::common::params::Params;
use marktree::{to_html, HtmlRenderer, Node, Renderer};

fn render_with(params: &[(&str, &str)], text: &str) -> String {
    let params: Params = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    HtmlRenderer::from_params(&params).unwrap().render(&parse(text))
}

#[test]
fn kitchensink() {
    let html = to_html(&parse(KITCHENSINK));
    insta::assert_snapshot!(html.trim_end(), @r#"
    <h1>Kitchen Sink</h1>
    <p>Intro with <em>emphasis</em>, <strong>strong</strong>, <code>code</code> and a <a href="https://example.com" title="Example">link</a>.</p>
    <h2>Lists</h2>
    <ul>
    <li>first</li>
    <li>second
    <ul>
    <li>nested</li>
    </ul></li>
    </ul>
    <ol>
    <li>one</li>
    <li>two</li>
    </ol>
    <h2>Code</h2>
    <pre><code class="language-rust">fn main() {}
    </code></pre>
    <blockquote>
    <p>quoted text</p>
    </blockquote>
    <hr>
    <table>
    <thead>
    <tr>
    <th style="text-align: left;">Name</th>
    <th style="text-align: right;">Count</th>
    </tr>
    </thead>
    <tbody>
    <tr>
    <td style="text-align: left;">a</td>
    <td style="text-align: right;">1</td>
    </tr>
    </tbody>
    </table>
    "#);
}

#[test]
fn loose_lists_keep_paragraphs() {
    let html = to_html(&parse("- a\n\n- b\n"));
    assert_eq!(html, "<ul>\n<li><p>a</p>\n</li>\n<li><p>b</p>\n</li>\n</ul>\n");
}

#[test]
fn ordered_lists_carry_their_start() {
    let html = to_html(&parse("3. three\n4. four\n"));
    assert!(html.starts_with("<ol start=\"3\">\n"));
}

#[test]
fn text_is_escaped_once() {
    let html = to_html(&parse("a &amp; b < c\n"));
    assert_eq!(html, "<p>a &amp; b &lt; c</p>\n");
}

#[test]
fn xhtml_closes_void_elements() {
    let html = render_with(&[("xhtml", "true")], "![logo](logo.png)\n\n---\n");
    assert_eq!(html, "<p><img src=\"logo.png\" alt=\"logo\" /></p>\n<hr />\n");
}

#[test]
fn typographer_replaces_dashes_and_ellipses() {
    let html = render_with(&[("typographer", "true")], "Wait... what -- really\n");
    assert_eq!(html, "<p>Wait\u{2026} what \u{2014} really</p>\n");
}

#[test]
fn custom_lang_prefix() {
    let html = render_with(&[("lang_prefix", "lang-")], "```py\nx = 1\n```\n");
    assert_eq!(html, "<pre><code class=\"lang-py\">x = 1\n</code></pre>\n");
}

#[test]
fn unknown_kinds_become_comments() {
    let doc = Node::document().with_child(Node::custom("widget").unwrap());
    assert_eq!(to_html(&doc), "<!-- Unknown node type: widget -->\n");
}
