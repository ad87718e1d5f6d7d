//! Push pipeline: Markdown in, styled native document out.
//!
//! A push is two phases against the document service. Phase 1 renders the Markdown to
//! a self-contained HTML page and imports it, which gets the structure (headings,
//! lists, tables) right. Phase 2 is the structural styling pass, which fixes what the
//! import leaves at the service defaults.
//!
//! ```ignore
//! let request = PushRequest::new(&markdown, "Design Notes")
//!     .with_folder("Specs")
//!     .with_source("/home/me/notes/design-notes.md");
//! let outcome = push(&service, &history, &styles, &request)?;
//! println!("{}", outcome.value().url);
//! ```
//!
//! Everything up to and including the import is fatal on failure. Once the document
//! exists the push counts as done: styling and history problems come back as warnings
//! on a degraded [`Outcome`].

use crate::error::{Outcome, PipelineError};
use crate::formats::markdown::render_import_html;
use crate::service::{DocumentService, HistoryEntry, HistoryLog, RemoteFile, STDIN_SOURCE};
use crate::style::StyleConfig;
use crate::styling::apply_styling;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

/// What to push and where.
#[derive(Debug, Clone)]
pub struct PushRequest<'a> {
    pub markdown: &'a str,
    pub title: String,
    /// Folder name at the account root; created when missing.
    pub folder: Option<String>,
    /// Recorded in history; an absolute path or `"stdin"`.
    pub source: String,
}

impl<'a> PushRequest<'a> {
    pub fn new(markdown: &'a str, title: impl Into<String>) -> Self {
        Self {
            markdown,
            title: title.into(),
            folder: None,
            source: STDIN_SOURCE.to_string(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Create a document from Markdown, style it and record it in history.
pub fn push(
    service: &dyn DocumentService,
    history: &dyn HistoryLog,
    styles: &StyleConfig,
    request: &PushRequest<'_>,
) -> Result<Outcome<RemoteFile>, PipelineError> {
    let html = render_import_html(request.markdown, &request.title, styles);
    debug!(bytes = html.len(), "rendered import html");

    let parent = match request.folder.as_deref() {
        Some(name) => Some(resolve_folder(service, name)?),
        None => None,
    };

    let file = service.import_html(&request.title, &html, parent.as_deref())?;
    info!(id = %file.id, title = %file.name, "imported document");

    let (_, mut warnings) = apply_styling(service, &file.id, styles).into_parts();

    let entry = HistoryEntry {
        id: file.id.clone(),
        title: request.title.clone(),
        source: request.source.clone(),
        url: file.url.clone(),
        created_at: Utc::now(),
    };
    if let Err(err) = history.append(entry) {
        warn!(error = %err, "could not record document in history");
        warnings.push(format!("Could not record document in history: {err}"));
    }

    Ok(Outcome::from_parts(file, warnings))
}

/// Id of the named folder, creating it only when the lookup finds nothing.
fn resolve_folder(service: &dyn DocumentService, name: &str) -> Result<String, PipelineError> {
    if let Some(id) = service.find_folder(name)? {
        debug!(folder = name, %id, "reusing folder");
        return Ok(id);
    }
    let id = service.create_folder(name)?;
    info!(folder = name, %id, "created folder");
    Ok(id)
}

/// Document title for a file stem: separators become spaces, words are capitalized.
///
/// `design-notes_v2` becomes `Design Notes V2`.
pub fn default_title(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Title used for content read from standard input.
pub fn stdin_title(today: NaiveDate) -> String {
    format!("Untitled - {}", today.format("%Y-%m-%d"))
}
