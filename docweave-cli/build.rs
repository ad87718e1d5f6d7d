use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the diagram types accepted by `diagram --type`.
// Build scripts can't reach the babel crate, so the list is repeated here.
const DIAGRAM_TYPES: &[&str] = &[
    "mermaid",
    "plantuml",
    "graphviz",
    "dot",
    "d2",
    "ditaa",
    "c4plantuml",
    "structurizr",
    "vega",
    "vegalite",
];

fn doc_arg() -> Arg {
    Arg::new("doc")
        .help("Document URL or id")
        .required(true)
        .index(1)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("docweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bridge Markdown and Google Docs")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("styles")
                .long("styles")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("push")
                .arg(Arg::new("file").index(1).value_hint(ValueHint::FilePath))
                .arg(Arg::new("stdin").long("stdin").action(ArgAction::SetTrue))
                .arg(Arg::new("title").long("title").short('t'))
                .arg(Arg::new("folder").long("folder").short('f')),
        )
        .subcommand(
            Command::new("pull")
                .arg(doc_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("update")
                        .long("update")
                        .short('u')
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("comments").arg(doc_arg()))
        .subcommand(Command::new("list"))
        .subcommand(
            Command::new("diagram")
                .arg(Arg::new("file").index(1).value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["png", "svg"]),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(Arg::new("inline").long("inline").action(ArgAction::SetTrue))
                .arg(Arg::new("stdin").long("stdin").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(clap::builder::PossibleValuesParser::new(DIAGRAM_TYPES)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("ingest")
                .arg(
                    Arg::new("source")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("local").long("local").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("auth"))
        .subcommand(Command::new("styles"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "docweave", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "docweave", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "docweave", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
