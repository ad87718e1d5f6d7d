//! Comment extraction into a Markdown feedback report.

use crate::error::{Outcome, PipelineError};
use crate::service::{CommentThread, DocumentService};
use chrono::{DateTime, Local};
use std::fmt::Write;
use tracing::warn;

/// Quotes longer than this are cut and suffixed with `...`.
pub const QUOTE_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentReport {
    /// The document has no comments.
    Empty { title: String },
    Report { markdown: String, open: usize, resolved: usize },
}

/// Fetch the comments on `doc_id` and render them as a report.
///
/// Failing to read the file metadata is fatal. Failing to read the comments
/// degrades to an empty report with a warning.
pub fn extract_comments(
    service: &dyn DocumentService,
    doc_id: &str,
    pulled_at: DateTime<Local>,
) -> Result<Outcome<CommentReport>, PipelineError> {
    let file = service.file_metadata(doc_id)?;

    let threads = match service.list_comments(doc_id) {
        Ok(threads) => threads,
        Err(err) => {
            warn!(error = %err, doc_id, "could not fetch comments");
            return Ok(Outcome::degraded(
                CommentReport::Empty { title: file.name },
                format!("Could not fetch comments: {err}"),
            ));
        }
    };

    if threads.is_empty() {
        return Ok(Outcome::Complete(CommentReport::Empty { title: file.name }));
    }

    let (open, resolved) = partition(&threads);
    let markdown = render_report(&file.name, &file.url, pulled_at, &threads);
    Ok(Outcome::Complete(CommentReport::Report {
        markdown,
        open: open.len(),
        resolved: resolved.len(),
    }))
}

/// Split into open and resolved threads, each in fetch order.
pub fn partition(threads: &[CommentThread]) -> (Vec<&CommentThread>, Vec<&CommentThread>) {
    threads.iter().partition(|thread| !thread.resolved)
}

pub fn render_report(
    title: &str,
    url: &str,
    pulled_at: DateTime<Local>,
    threads: &[CommentThread],
) -> String {
    let (open, resolved) = partition(threads);
    let mut out = String::new();
    let _ = writeln!(out, "## Feedback from: {title}");
    let _ = writeln!(out, "> Pulled: {} from {url}", pulled_at.format("%Y-%m-%d %H:%M"));

    for (heading, group) in [("Open Comments", open), ("Resolved Comments", resolved)] {
        if group.is_empty() {
            continue;
        }
        let _ = write!(out, "\n### {heading}\n\n");
        for thread in group {
            render_thread(&mut out, thread);
        }
    }
    out
}

fn render_thread(out: &mut String, thread: &CommentThread) {
    let author = thread.author.as_deref().unwrap_or("Unknown");
    let status = if thread.resolved { "resolved" } else { "open" };
    let _ = write!(out, "- **{author}**");
    if let Some(quote) = thread.quoted.as_deref().filter(|q| !q.is_empty()) {
        let _ = write!(out, " (on \"{}\")", truncate_quote(quote));
    }
    let _ = writeln!(out, ": \"{}\" [{status}]", thread.body);
    for reply in &thread.replies {
        let replier = reply.author.as_deref().unwrap_or("Unknown");
        let _ = writeln!(out, "  - **{replier}** replied: \"{}\"", reply.body);
    }
}

fn truncate_quote(quote: &str) -> String {
    match quote.char_indices().nth(QUOTE_LIMIT) {
        Some((cut, _)) => format!("{}...", &quote[..cut]),
        None => quote.to_string(),
    }
}
