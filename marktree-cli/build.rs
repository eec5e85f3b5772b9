use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the inspect views from src/inspect.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &["ast-tree", "ast-json", "events"];

const TRANSFORMERS: &[&str] = &["heading_level", "id_generator", "link_reference", "toc"];

const EXTENSIONS: &[&str] = &["gfm", "kbd", "strikethrough", "tasklist"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input Markdown file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("marktree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse, transform and render Markdown document trees")
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
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("transform")
                .long("transform")
                .short('t')
                .value_parser(clap::builder::PossibleValuesParser::new(TRANSFORMERS))
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .short('e')
                .value_parser(clap::builder::PossibleValuesParser::new(EXTENSIONS))
                .action(ArgAction::Append)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(input_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(["markdown", "html"])),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect").arg(input_arg()).arg(
                Arg::new("view")
                    .index(2)
                    .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS)),
            ),
        )
        .subcommand(
            Command::new("validate")
                .arg(input_arg())
                .arg(Arg::new("strict").long("strict").action(ArgAction::SetTrue)),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "marktree", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "marktree", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "marktree", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
