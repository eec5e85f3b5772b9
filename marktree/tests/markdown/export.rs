use crate::common::parse;
use marktree::common::params::Params;
use marktree::{MarkdownRenderer, Renderer};

const SAMPLE: &str = "Title\n=====\n\n## Sub\n\n### Deep\n\n*one* and **two**\n\n- a\n- b\n\n```\ncode\n```\n";

fn render_with(params: &[(&str, &str)], text: &str) -> String {
    let params: Params = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    MarkdownRenderer::from_params(&params).unwrap().render(&parse(text))
}

#[test]
fn defaults() {
    let out = render_with(&[], SAMPLE);
    insta::assert_snapshot!(out.trim_end(), @r"
    # Title

    ## Sub

    ### Deep

    *one* and **two**

    - a
    - b

    ```
    code
    ```
    ");
}

#[test]
fn alternate_markers() {
    let out = render_with(
        &[
            ("heading_style", "setext"),
            ("emphasis_char", "_"),
            ("strong_char", "__"),
            ("bullet_char", "*"),
            ("code_fence", "~"),
        ],
        SAMPLE,
    );
    insta::assert_snapshot!(out.trim_end(), @r"
    Title
    =====

    Sub
    ---

    ### Deep

    _one_ and __two__

    * a
    * b

    ~~~
    code
    ~~~
    ");
}

#[test]
fn paragraphs_wrap_at_line_width() {
    let out = render_with(&[("line_width", "11")], "alpha beta gamma delta\n");
    assert_eq!(out, "alpha beta\ngamma delta\n");
}

#[test]
fn invalid_option_values_are_rejected() {
    for (key, value) in [
        ("bullet_char", "#"),
        ("emphasis_char", "~"),
        ("heading_style", "fancy"),
        ("line_width", "-1"),
    ] {
        let params: Params = [(key.to_string(), value.to_string())].into_iter().collect();
        assert!(
            MarkdownRenderer::from_params(&params).is_err(),
            "{key}={value} should be rejected"
        );
    }
}
