//! Pull pipeline: remote document back to Markdown.
//!
//! The document is exported as HTML and run through [`html_to_markdown`] with the
//! export cleanup profile. Where the result goes is a [`PullTarget`]; the update
//! target is resolved against history before anything is fetched, so a stale history
//! entry fails fast without a network round trip.

use crate::error::PipelineError;
use crate::formats::html::html_to_markdown;
use crate::formats::markdown::CleanupProfile;
use crate::service::{DocumentService, HistoryLog};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullTarget {
    /// Return the Markdown to the caller.
    Stdout,
    /// Write to an explicit path.
    File(PathBuf),
    /// Overwrite the file the document was originally pushed from.
    UpdateSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullResult {
    pub markdown: String,
    /// Where the Markdown was written, if anywhere.
    pub written_to: Option<PathBuf>,
}

/// Export `doc_id` and deliver it as Markdown to `target`.
pub fn pull(
    service: &dyn DocumentService,
    history: &dyn HistoryLog,
    doc_id: &str,
    target: &PullTarget,
) -> Result<PullResult, PipelineError> {
    let destination = match target {
        PullTarget::Stdout => None,
        PullTarget::File(path) => Some(path.clone()),
        PullTarget::UpdateSource => Some(resolve_update_target(history, doc_id)?),
    };

    let html = service.export_html(doc_id)?;
    debug!(doc_id, bytes = html.len(), "exported document html");
    let markdown = html_to_markdown(&html, CleanupProfile::Export);

    if let Some(path) = &destination {
        fs::write(path, &markdown)
            .map_err(|err| PipelineError::io(format!("Cannot write {}", path.display()), err))?;
        info!(path = %path.display(), "wrote pulled markdown");
    }

    Ok(PullResult {
        markdown,
        written_to: destination,
    })
}

/// The source path recorded for `doc_id`, checked to be writable in principle:
/// its parent directory must still exist.
pub fn resolve_update_target(
    history: &dyn HistoryLog,
    doc_id: &str,
) -> Result<PathBuf, PipelineError> {
    let recorded = history
        .find_source(doc_id)
        .map_err(|err| PipelineError::io("Cannot read history", err))?
        .ok_or_else(|| PipelineError::NoHistorySource {
            doc_id: doc_id.to_string(),
        })?;

    let path = PathBuf::from(&recorded);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        return Err(PipelineError::SourceDirMissing { dir, recorded });
    }
    Ok(path)
}
