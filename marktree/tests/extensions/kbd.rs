use marktree::common::params::Params;
use marktree::{ExtensionManager, OutputFormat, Pipeline};

fn pipeline(output: OutputFormat) -> Pipeline {
    let extensions = ExtensionManager::with_extensions(&["kbd"]).unwrap();
    Pipeline::new()
        .with_extensions(extensions)
        .with_output(output, Params::new())
}

#[test]
fn keys_render_as_kbd_elements() {
    let html = pipeline(OutputFormat::Html).run("Press ++Ctrl++ + ++C++\n").unwrap();
    assert_eq!(html, "<p>Press <kbd>Ctrl</kbd> + <kbd>C</kbd></p>\n");
}

#[test]
fn keys_survive_markdown_output() {
    let mut pipeline = pipeline(OutputFormat::Markdown);
    let markdown = pipeline.run("Press ++Ctrl++ + ++C++\n").unwrap();
    assert_eq!(markdown, "Press ++Ctrl++ \\+ ++C++\n");
    assert_eq!(pipeline.run(&markdown).unwrap(), markdown);
}

#[test]
fn without_the_extension_keys_stay_text() {
    let html = Pipeline::new()
        .with_output(OutputFormat::Html, Params::new())
        .run("Press ++Ctrl++\n")
        .unwrap();
    assert_eq!(html, "<p>Press ++Ctrl++</p>\n");
}
