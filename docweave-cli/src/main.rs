// Command-line interface for docweave
//
// This binary moves Markdown in and out of Google Docs, renders diagram blocks and
// ingests outside content as Markdown. The pipelines live in the docweave-babel crate;
// this crate supplies the HTTP clients, the OAuth token store, the history file and the
// terminal output.
//
// Usage:
//  docweave push <file.md> [-t <title>] [-f <folder>]   - Create a styled Google Doc
//  docweave push --stdin [-t <title>]                   - Same, reading Markdown from stdin
//  docweave pull <doc> [-o <file> | -u]                 - Document content back to Markdown
//  docweave comments <doc>                              - Comments as a Markdown report
//  docweave list                                        - Recently created documents
//  docweave diagram <file.md> [--inline]                - Render diagram blocks via Kroki
//  docweave diagram --stdin --type <type> [-o <file>]   - Render one diagram from stdin
//  docweave ingest <url|file.pdf|file.html> [-o <file>] - Outside content to Markdown
//  docweave auth                                        - Sign in to Google
//  docweave styles                                      - Print the resolved styles as JSON
//
// Errors print as `Error: ...` on stderr with a remediation hint where one exists, and
// the process exits with status 1. Partial successes print `Warning: ...` lines and
// exit 0.

mod auth;
mod history;
mod paths;
mod remote;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use docweave_babel::comments::{extract_comments, CommentReport};
use docweave_babel::diagram::{
    extract_blocks, render_diagrams, render_single, DiagramJob, DiagramKind, ImageFormat,
};
use docweave_babel::ingest::ingest;
use docweave_babel::publish::{default_title, stdin_title};
use docweave_babel::service::{extract_doc_id, STDIN_SOURCE};
use docweave_babel::{
    pull, push, DocumentService, HistoryLog, PipelineError, PullTarget, PushRequest, ServiceError,
};
use docweave_config::{DocweaveConfig, Loader};
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::auth::Authenticator;
use crate::history::JsonHistory;
use crate::paths::StatePaths;
use crate::remote::{http_client, GoogleWorkspace, HttpWebSource, KrokiClient};

const LOG_ENV: &str = "DOCWEAVE_LOG";

fn build_cli() -> Command {
    Command::new("docweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bridge Markdown and Google Docs")
        .long_about(
            "docweave pushes Markdown to Google Docs as styled documents and pulls them back.\n\n\
            Commands:\n  \
            - push:     Create a Google Doc from Markdown\n  \
            - pull:     Export a Google Doc back to Markdown\n  \
            - comments: Collect a document's comments as a Markdown report\n  \
            - list:     Show recently created documents\n  \
            - diagram:  Render diagram code blocks to images via Kroki\n  \
            - ingest:   Convert a web page, PDF or HTML file to Markdown\n  \
            - auth:     Sign in to Google\n  \
            - styles:   Print the resolved style configuration\n\n\
            Examples:\n  \
            docweave push analysis.md --title \"Q1 Analysis\" --folder Work\n  \
            docweave push --stdin --title \"Quick Note\"\n  \
            docweave pull https://docs.google.com/document/d/1xABC/edit -u\n  \
            docweave diagram design.md --inline\n  \
            docweave ingest https://example.com/post -o post.md",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a docweave.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("styles")
                .long("styles")
                .value_name("PATH")
                .help("Path to a JSON file with style overrides")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log progress to stderr (-vv for debug output)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("push")
                .about("Create a styled Google Doc from Markdown")
                .arg(
                    Arg::new("file")
                        .help("Markdown file to push")
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("stdin")
                        .long("stdin")
                        .help("Read Markdown from stdin")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("file"),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .help("Document title (default: file name in title case)"),
                )
                .arg(
                    Arg::new("folder")
                        .long("folder")
                        .short('f')
                        .help("Drive folder to create the document in (created if missing)"),
                ),
        )
        .subcommand(
            Command::new("pull")
                .about("Export a Google Doc back to Markdown")
                .arg(
                    Arg::new("doc")
                        .help("Document URL or id")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("update")
                        .long("update")
                        .short('u')
                        .help("Overwrite the file the document was pushed from")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("output"),
                ),
        )
        .subcommand(
            Command::new("comments")
                .about("Collect a document's comments as a Markdown report")
                .arg(
                    Arg::new("doc")
                        .help("Document URL or id")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("list").about("Show recently created documents"))
        .subcommand(
            Command::new("diagram")
                .about("Render diagram code blocks to images via Kroki")
                .long_about(
                    "Render fenced diagram blocks of a Markdown file to images.\n\n\
                    Images are written as <stem>-diagram-<n>.<format> next to the file,\n\
                    or into --output-dir. With --inline the blocks that rendered are\n\
                    replaced by image references and the file is rewritten.\n\n\
                    With --stdin a single diagram of --type is read from stdin.",
                )
                .arg(
                    Arg::new("file")
                        .help("Markdown file with diagram blocks")
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Image format (default from configuration)")
                        .value_parser(["png", "svg"]),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .help("Directory for rendered images")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("inline")
                        .long("inline")
                        .help("Replace rendered blocks with image references")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("stdin")
                        .long("stdin")
                        .help("Read a single diagram from stdin")
                        .action(ArgAction::SetTrue)
                        .conflicts_with_all(["file", "inline", "output-dir"])
                        .requires("type"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("Diagram type for --stdin (mermaid, plantuml, graphviz, ...)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Image file for --stdin (raw bytes to stdout otherwise)")
                        .requires("stdin")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("ingest")
                .about("Convert a web page, PDF or HTML file to Markdown")
                .arg(
                    Arg::new("source")
                        .help("URL (http/https), .pdf file or .html/.htm file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("local")
                        .long("local")
                        .help("Convert web pages locally instead of using the reader service")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("auth").about("Sign in to Google and store a token"))
        .subcommand(Command::new("styles").about("Print the resolved style configuration as JSON"))
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let paths = StatePaths::discover().unwrap_or_else(|| {
        eprintln!(
            "Error: Cannot determine a home directory. Set {} to a state directory.",
            paths::HOME_ENV
        );
        std::process::exit(1);
    });
    let config = load_cli_config(
        &paths,
        matches.get_one::<String>("config").map(|s| s.as_str()),
        matches.get_one::<String>("styles").map(|s| s.as_str()),
    );

    let result = match matches.subcommand() {
        Some(("push", sub_matches)) => handle_push_command(sub_matches, &config, &paths),
        Some(("pull", sub_matches)) => handle_pull_command(sub_matches, &config, &paths),
        Some(("comments", sub_matches)) => handle_comments_command(sub_matches, &config, &paths),
        Some(("list", _)) => handle_list_command(&config, &paths),
        Some(("diagram", sub_matches)) => handle_diagram_command(sub_matches, &config),
        Some(("ingest", sub_matches)) => handle_ingest_command(sub_matches, &config),
        Some(("auth", _)) => handle_auth_command(&config, &paths),
        Some(("styles", _)) => handle_styles_command(&config),
        _ => Err(PipelineError::InvalidInput(
            "Unknown subcommand. Use --help for usage information.".to_string(),
        )),
    };

    if let Err(err) = result {
        report_error(&err);
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => env::var(LOG_ENV).unwrap_or_else(|_| "error".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_cli_config(
    paths: &StatePaths,
    explicit_path: Option<&str>,
    styles_path: Option<&str>,
) -> DocweaveConfig {
    let loader = Loader::new()
        .with_optional_file(paths.config())
        .with_optional_file("docweave.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let styles = styles_path
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.styles());

    loader
        .with_style_overrides(styles)
        .build()
        .unwrap_or_else(|err| {
            eprintln!("Error: Failed to load configuration: {err}");
            std::process::exit(1);
        })
}

/// Print an error and whatever the user can do about it.
fn report_error(err: &PipelineError) {
    eprintln!("Error: {err}");
    match err {
        PipelineError::NoHistorySource { .. } => {
            eprintln!("Use --output <file> instead.");
        }
        PipelineError::SourceDirMissing { recorded, .. } => {
            eprintln!("Original path from history: {recorded}");
            eprintln!("Use --output <file> instead.");
        }
        PipelineError::Service(ServiceError::Status { status: 401, .. })
        | PipelineError::Service(ServiceError::Status { status: 403, .. }) => {
            eprintln!("Run `docweave auth` to sign in again.");
        }
        _ => {}
    }
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}

fn google(config: &DocweaveConfig, paths: &StatePaths) -> Result<GoogleWorkspace, PipelineError> {
    let client = http_client(&config.services)?;
    let auth = Authenticator::new(client.clone(), paths.clone(), &config.services);
    Ok(GoogleWorkspace::new(client, auth, &config.services))
}

fn read_stdin() -> Result<String, PipelineError> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| PipelineError::io("Cannot read standard input", err))?;
    Ok(text)
}

fn read_existing(path: &Path) -> Result<String, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::InvalidInput(format!(
            "File not found: {}",
            path.display()
        )));
    }
    fs::read_to_string(path)
        .map_err(|err| PipelineError::io(format!("Cannot read {}", path.display()), err))
}

fn write_output(path: &str, contents: &[u8]) -> Result<(), PipelineError> {
    fs::write(path, contents).map_err(|err| PipelineError::io(format!("Cannot write {path}"), err))
}

/// Handle the push command
fn handle_push_command(
    matches: &ArgMatches,
    config: &DocweaveConfig,
    paths: &StatePaths,
) -> Result<(), PipelineError> {
    let explicit_title = matches.get_one::<String>("title").cloned();

    let (markdown, title, source) = if matches.get_flag("stdin") {
        let title = explicit_title.unwrap_or_else(|| stdin_title(chrono::Local::now().date_naive()));
        (read_stdin()?, title, STDIN_SOURCE.to_string())
    } else if let Some(file) = matches.get_one::<String>("file") {
        let path = Path::new(file);
        let markdown = read_existing(path)?;
        let title = explicit_title.unwrap_or_else(|| {
            default_title(&path.file_stem().unwrap_or_default().to_string_lossy())
        });
        // History records absolute paths so `pull --update` works from anywhere.
        let source = fs::canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        (markdown, title, source)
    } else {
        return Err(PipelineError::InvalidInput(
            "Provide a file path or --stdin".to_string(),
        ));
    };

    let service = google(config, paths)?;
    let history = JsonHistory::new(paths.history());
    let mut request = PushRequest::new(&markdown, title).with_source(source);
    if let Some(folder) = matches.get_one::<String>("folder") {
        request = request.with_folder(folder.clone());
    }

    let (file, warnings) = push(&service, &history, &config.style, &request)?.into_parts();
    print_warnings(&warnings);
    println!("Created: \"{}\"", file.name);
    println!("URL: {}", file.url);
    Ok(())
}

/// Handle the pull command
fn handle_pull_command(
    matches: &ArgMatches,
    config: &DocweaveConfig,
    paths: &StatePaths,
) -> Result<(), PipelineError> {
    let doc = matches
        .get_one::<String>("doc")
        .ok_or_else(|| PipelineError::InvalidInput("A document URL or id is required".into()))?;
    let doc_id = extract_doc_id(doc);
    let update = matches.get_flag("update");
    let target = match matches.get_one::<String>("output") {
        Some(path) => PullTarget::File(PathBuf::from(path)),
        None if update => PullTarget::UpdateSource,
        None => PullTarget::Stdout,
    };

    let service = google(config, paths)?;
    let history = JsonHistory::new(paths.history());
    let result = pull(&service, &history, &doc_id, &target)?;

    match &result.written_to {
        None => print!("{}", result.markdown),
        Some(path) => {
            let verb = if update { "Updated" } else { "Saved" };
            println!("{verb}: {}", path.display());
            if let Ok(file) = service.file_metadata(&doc_id) {
                println!("From: \"{}\"", file.name);
            }
        }
    }
    Ok(())
}

/// Handle the comments command
fn handle_comments_command(
    matches: &ArgMatches,
    config: &DocweaveConfig,
    paths: &StatePaths,
) -> Result<(), PipelineError> {
    let doc = matches
        .get_one::<String>("doc")
        .ok_or_else(|| PipelineError::InvalidInput("A document URL or id is required".into()))?;
    let service = google(config, paths)?;

    let (report, warnings) =
        extract_comments(&service, &extract_doc_id(doc), chrono::Local::now())?.into_parts();
    print_warnings(&warnings);
    match report {
        CommentReport::Empty { title } => println!("No comments found on \"{title}\""),
        CommentReport::Report { markdown, .. } => print!("{markdown}"),
    }
    Ok(())
}

/// Handle the list command
fn handle_list_command(config: &DocweaveConfig, paths: &StatePaths) -> Result<(), PipelineError> {
    let history = JsonHistory::new(paths.history());
    let entries = history
        .recent(config.history.list_limit)
        .map_err(|err| PipelineError::io("Cannot read history", err))?;

    if entries.is_empty() {
        println!("No documents created yet.");
        return Ok(());
    }

    println!("Recent documents ({}):\n", entries.len());
    for entry in entries {
        let created = entry.created_at.with_timezone(&chrono::Local);
        println!("  {}  {}", created.format("%Y-%m-%d %H:%M"), entry.title);
        println!("  {}", entry.url);
        println!("  Source: {}", entry.source);
        println!();
    }
    Ok(())
}

/// Handle the diagram command
fn handle_diagram_command(
    matches: &ArgMatches,
    config: &DocweaveConfig,
) -> Result<(), PipelineError> {
    let format = match matches.get_one::<String>("format") {
        Some(format) => format.parse::<ImageFormat>()?,
        None => config.diagram.image_format()?,
    };
    let renderer = KrokiClient::new(http_client(&config.services)?, &config.services.kroki_url);

    if matches.get_flag("stdin") {
        let kind: DiagramKind = matches
            .get_one::<String>("type")
            .ok_or_else(|| PipelineError::InvalidInput("--stdin requires --type".to_string()))?
            .parse()?;
        let source = read_stdin()?;
        let bytes = render_single(&renderer, kind, format, &source)?;
        match matches.get_one::<String>("output") {
            Some(path) => {
                write_output(path, &bytes)?;
                println!("Saved: {path}");
            }
            None => io::stdout()
                .write_all(&bytes)
                .map_err(|err| PipelineError::io("Cannot write to stdout", err))?,
        }
        return Ok(());
    }

    let file = matches.get_one::<String>("file").ok_or_else(|| {
        PipelineError::InvalidInput("Provide a Markdown file, or --stdin with --type".to_string())
    })?;
    let path = Path::new(file);
    let markdown = read_existing(path)?;

    let found = extract_blocks(&markdown).len();
    if found == 0 {
        println!("No diagram code blocks found.");
        return Ok(());
    }
    println!("Found {found} diagram(s). Rendering via Kroki...");

    let mut job = DiagramJob::new(&markdown)
        .with_source_path(path)
        .with_format(format)
        .inline(matches.get_flag("inline"));
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        job = job.with_output_dir(dir);
    }

    let report = render_diagrams(&renderer, &job)?;
    for result in &report.results {
        match &result.outcome {
            Ok(image) => println!(
                "  [{}/{found}] {} -> {}",
                result.index,
                result.kind,
                image.display()
            ),
            Err(err) => eprintln!("  [{}/{found}] {} FAILED: {err}", result.index, result.kind),
        }
    }
    if let Some(updated) = &report.updated_source {
        println!("\nUpdated {} with inline image references.", updated.display());
    }
    if report.failures() > 0 {
        eprintln!(
            "Warning: {} of {found} diagram(s) failed to render.",
            report.failures()
        );
    }
    Ok(())
}

/// Handle the ingest command
fn handle_ingest_command(
    matches: &ArgMatches,
    config: &DocweaveConfig,
) -> Result<(), PipelineError> {
    let source = matches
        .get_one::<String>("source")
        .ok_or_else(|| PipelineError::InvalidInput("A source is required".to_string()))?;
    let web = HttpWebSource::new(http_client(&config.services)?, &config.services.reader_url);

    let (markdown, warnings) = ingest(&web, source, matches.get_flag("local"))?.into_parts();
    print_warnings(&warnings);
    match matches.get_one::<String>("output") {
        Some(path) => {
            write_output(path, markdown.as_bytes())?;
            println!("Saved: {path}");
            println!("From: {source}");
        }
        None => print!("{markdown}"),
    }
    Ok(())
}

/// Handle the auth command
fn handle_auth_command(config: &DocweaveConfig, paths: &StatePaths) -> Result<(), PipelineError> {
    let auth = Authenticator::new(http_client(&config.services)?, paths.clone(), &config.services);
    auth.authorize(&mut auth::prompt_on_terminal)?;
    println!("Signed in. Token stored in {}", paths.token().display());
    Ok(())
}

/// Handle the styles command
fn handle_styles_command(config: &DocweaveConfig) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(&config.style).map_err(|err| {
        PipelineError::InvalidInput(format!("Cannot serialize styles: {err}"))
    })?;
    println!("{json}");
    Ok(())
}
