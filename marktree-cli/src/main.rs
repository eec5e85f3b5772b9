// Command-line interface for marktree
//
// This binary wires the marktree library to files and stdout: read Markdown, run it through
// extensions and transformers, and write Markdown or HTML.
//
// Usage:
//  marktree <input> --to <format> [-o <file>]          - Convert (default command)
//  marktree convert <input> --to <format> [-o <file>]  - Same as above (explicit)
//  marktree inspect <input> [<view>]                   - Show events or the tree (defaults to "ast-tree")
//  marktree validate <input> [--strict]                - Check the parsed tree's structure
//  marktree --list-transforms                          - List transformers, extensions and formats
//
// Configuration:
//
// Defaults come from marktree-config. A marktree.toml in the working directory is layered on
// top when present, then the file given with --config. --transform and --extension replace
// the configured lists when given.
//
// Extra Parameters:
//
// Options can be passed using --extra-<name> <value>. The CLI strips the "extra-" prefix and
// hands the map to every transformer and to the renderer, over the configured values. Each
// component picks the keys it knows and ignores the rest.
// Example:
//  marktree notes.md --to markdown --transform toc --extra-max_level 2

mod inspect;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use marktree::common::params::Params;
use marktree::extensions::BUILTIN_EXTENSIONS;
use marktree::parse::ParseOptions;
use marktree::{
    ExtensionManager, OutputFormat, ParserRegistry, Pipeline, RendererRegistry, Transformer,
    TransformerRegistry, Validator,
};
use marktree_config::{Loader, MarktreeConfig};
use std::fs;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, Params) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = Params::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input Markdown file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("marktree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse, transform and render Markdown document trees")
        .long_about(
            "marktree parses Markdown into a document tree, applies structural transformers\n\
            (heading levels, ids, table of contents, reference links) and renders the result\n\
            as Markdown or HTML.\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass transformer and renderer options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            marktree notes.md --to html                          # HTML to stdout\n  \
            marktree notes.md --to markdown --transform toc      # Add a table of contents\n  \
            marktree inspect notes.md ast-json                   # Tree as JSON\n  \
            marktree validate notes.md --strict                  # Structural checks",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transformers, extensions and formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a marktree.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Raise the log level (repeatable); RUST_LOG takes precedence")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("transform")
                .long("transform")
                .short('t')
                .value_name("NAME")
                .help("Transformer to apply, in order (repeatable)")
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .short('e')
                .value_name("NAME")
                .help("Extension to enable, in order (repeatable)")
                .action(ArgAction::Append)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert Markdown to Markdown or HTML (default command)")
                .arg(input_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format: markdown or html")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the event stream or the document tree")
                .arg(input_arg())
                .arg(
                    Arg::new("view")
                        .help("View to print. Defaults to 'ast-tree'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check the structure of the parsed (and transformed) tree")
                .arg(input_arg())
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Also report empty items, empty blockquotes and textless links")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare input path means "convert"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["convert", "inspect", "validate", "help"].contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config, matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, to, output, &matches, &extra_params, &config);
        }
        Some(("inspect", sub_matches)) => {
            let input = required(sub_matches, "input");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(inspect::DEFAULT_VIEW);
            handle_inspect_command(input, view, &matches, &extra_params, &config);
        }
        Some(("validate", sub_matches)) => {
            let input = required(sub_matches, "input");
            let strict = sub_matches.get_flag("strict");
            handle_validate_command(input, strict, &matches, &extra_params, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing argument '{id}'");
            std::process::exit(1);
        })
}

/// Install the stderr subscriber: RUST_LOG wins, otherwise the configured level raised by -v
fn init_logging(config: &MarktreeConfig, verbosity: u8) {
    let level = log_level(&config.logging.level, verbosity);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn log_level(configured: &str, verbosity: u8) -> &'static str {
    let base = LOG_LEVELS
        .iter()
        .position(|level| level.eq_ignore_ascii_case(configured))
        .unwrap_or(1);
    LOG_LEVELS[(base + verbosity as usize).min(LOG_LEVELS.len() - 1)]
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Parser, extensions and transformers from configuration, command-line lists and extras
fn build_pipeline(
    input: &str,
    matches: &ArgMatches,
    extra_params: &Params,
    config: &MarktreeConfig,
) -> Pipeline {
    let parsers = ParserRegistry::default();
    let parser_name = parsers.detect_from_filename(input).unwrap_or_else(|| {
        debug!(input, "no parser claims this file extension, reading as markdown");
        "markdown".to_string()
    });
    let mut parse_params = parse_params(&ParseOptions::from(&config.parse));
    parse_params.extend(extra_params.clone());
    let parser = parsers.create(&parser_name, &parse_params).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let extensions = selected(matches, "extension", &config.extensions.enabled);
    let manager = ExtensionManager::with_extensions(&extensions).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let transforms = selected(matches, "transform", &config.transforms.enabled);
    let configs: Vec<Params> = transforms
        .iter()
        .map(|name| {
            let mut params = config.transforms.params_for(name);
            params.extend(extra_params.clone());
            params
        })
        .collect();
    let chain = TransformerRegistry::default()
        .create_chain(&transforms, Some(&configs))
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    info!(
        parser = %parser_name,
        extensions = ?extensions,
        transforms = ?transforms,
        "built pipeline"
    );
    Pipeline::new()
        .with_parser(parser)
        .with_extensions(manager)
        .with_transformers(chain)
}

fn parse_params(options: &ParseOptions) -> Params {
    [
        ("tables", options.tables),
        ("autolink", options.autolink),
        ("strikethrough", options.strikethrough),
        ("smart", options.smart),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Values given on the command line, else the configured list
fn selected(matches: &ArgMatches, id: &str, configured: &[String]) -> Vec<String> {
    match matches.get_many::<String>(id) {
        Some(values) => values.cloned().collect(),
        None => configured.to_vec(),
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    to: &str,
    output: Option<&str>,
    matches: &ArgMatches,
    extra_params: &Params,
    config: &MarktreeConfig,
) {
    let format: OutputFormat = to.parse().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    let source = read_input(input);

    let mut render_params = config.render.params_for(format.as_str());
    render_params.extend(extra_params.clone());

    let mut pipeline = build_pipeline(input, matches, extra_params, config).with_output(format, render_params);
    let result = pipeline.run(&source).unwrap_or_else(|e| {
        eprintln!("Conversion error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    input: &str,
    view: &str,
    matches: &ArgMatches,
    extra_params: &Params,
    config: &MarktreeConfig,
) {
    let source = read_input(input);
    let mut pipeline = build_pipeline(input, matches, extra_params, config);
    let output = inspect::execute_view(&source, view, &mut pipeline).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });
    print!("{output}");
}

/// Handle the validate command; exits with status 1 when any error is found
fn handle_validate_command(
    input: &str,
    strict: bool,
    matches: &ArgMatches,
    extra_params: &Params,
    config: &MarktreeConfig,
) {
    let source = read_input(input);
    let mut pipeline = build_pipeline(input, matches, extra_params, config);
    let document = pipeline
        .parse(&source)
        .and_then(|document| pipeline.transform(document))
        .unwrap_or_else(|e| {
            eprintln!("Parse error: {e}");
            std::process::exit(1);
        });

    let errors = Validator::new(strict).validate(&document);
    if errors.is_empty() {
        println!("{input}: ok");
        return;
    }
    for error in &errors {
        eprintln!("{input}: {error}");
    }
    std::process::exit(1);
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    let transformers = TransformerRegistry::default();
    println!("Transformers:");
    for name in transformers.list() {
        let description = transformers
            .create(&name, &Params::new())
            .map(|t| t.description())
            .unwrap_or_default();
        println!("  {name:<16}{description}");
    }

    println!("\nExtensions:");
    for name in BUILTIN_EXTENSIONS {
        println!("  {name}");
    }

    println!("\nOutput formats:");
    for name in RendererRegistry::default().list() {
        println!("  {name}");
    }

    println!("\nInspect views:");
    for name in inspect::AVAILABLE_VIEWS {
        println!("  {name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MarktreeConfig {
    let loader = Loader::new().with_optional_file("marktree.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let input = args(&["marktree", "inspect", "file.md"]);
        let (cleaned, extra) = parse_extra_args(&input);
        assert_eq!(cleaned, input);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_mixed_with_regular_args() {
        let input = args(&[
            "marktree",
            "convert",
            "input.md",
            "--extra-max_level",
            "2",
            "--to",
            "html",
        ]);
        let (cleaned, extra) = parse_extra_args(&input);
        assert_eq!(cleaned, args(&["marktree", "convert", "input.md", "--to", "html"]));
        assert_eq!(extra.get("max_level"), Some(&"2".to_string()));
    }

    #[test]
    fn test_parse_extra_args_boolean_flags() {
        let input = args(&["marktree", "doc.md", "--extra-xhtml", "--extra-dedup", "false", "--extra-breaks"]);
        let (cleaned, extra) = parse_extra_args(&input);
        assert_eq!(cleaned, args(&["marktree", "doc.md"]));
        assert_eq!(extra.len(), 3);
        assert_eq!(extra.get("xhtml"), Some(&"true".to_string()));
        assert_eq!(extra.get("dedup"), Some(&"false".to_string()));
        assert_eq!(extra.get("breaks"), Some(&"true".to_string()));
    }

    #[test]
    fn verbosity_raises_the_configured_level() {
        assert_eq!(log_level("warn", 0), "warn");
        assert_eq!(log_level("warn", 2), "debug");
        assert_eq!(log_level("INFO", 9), "trace");
        assert_eq!(log_level("bogus", 0), "warn");
    }

    #[test]
    fn command_line_lists_replace_configured_ones() {
        let matches = build_cli()
            .try_get_matches_from(["marktree", "convert", "a.md", "--to", "html", "-t", "toc", "-t", "id_generator"])
            .unwrap();
        let configured = vec!["heading_level".to_string()];
        assert_eq!(selected(&matches, "transform", &configured), vec!["toc", "id_generator"]);
        assert_eq!(selected(&matches, "extension", &configured), configured);
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
