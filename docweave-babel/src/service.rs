//! Seams to the outside world.
//!
//! The pipelines in this crate talk to remote services and local state only through
//! these traits. The CLI provides HTTP and file-backed implementations; tests provide
//! recording fakes. Every method is blocking.

use crate::error::ServiceError;
use crate::styling::{DocumentTree, StyleMutation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use url::Url;

/// A file as reported by the document service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReply {
    pub author: Option<String>,
    pub body: String,
}

/// A comment on a document, as a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    pub author: Option<String>,
    pub body: String,
    pub resolved: bool,
    /// The document text the comment is anchored to.
    pub quoted: Option<String>,
    pub replies: Vec<CommentReply>,
}

/// Cloud document storage plus the structured document API on top of it.
pub trait DocumentService {
    /// Id of a non-trashed folder with exactly this name at the account root.
    fn find_folder(&self, name: &str) -> Result<Option<String>, ServiceError>;

    fn create_folder(&self, name: &str) -> Result<String, ServiceError>;

    /// Import an HTML page as a new native document.
    fn import_html(
        &self,
        title: &str,
        html: &str,
        parent: Option<&str>,
    ) -> Result<RemoteFile, ServiceError>;

    fn file_metadata(&self, doc_id: &str) -> Result<RemoteFile, ServiceError>;

    fn fetch_structure(&self, doc_id: &str) -> Result<DocumentTree, ServiceError>;

    /// Apply all mutations in one atomic batch.
    fn batch_update(&self, doc_id: &str, mutations: &[StyleMutation]) -> Result<(), ServiceError>;

    fn export_html(&self, doc_id: &str) -> Result<String, ServiceError>;

    fn list_comments(&self, doc_id: &str) -> Result<Vec<CommentThread>, ServiceError>;
}

/// Renders diagram source text to image bytes.
pub trait DiagramRenderer {
    /// `kind` is the renderer's diagram type name (`graphviz`, `mermaid`, ...),
    /// `format` the image extension (`png`, `svg`).
    fn render(&self, kind: &str, format: &str, source: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Access to web content for ingestion.
pub trait WebSource {
    /// Markdown for a URL from the reader service.
    fn read_markdown(&self, url: &str) -> Result<String, ServiceError>;

    /// Raw page body (HTML) from the URL itself.
    fn fetch_text(&self, url: &str) -> Result<String, ServiceError>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}

/// What was pushed, from where, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    /// Absolute path of the pushed file, or `"stdin"`.
    pub source: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Source label recorded for content pushed from standard input.
pub const STDIN_SOURCE: &str = "stdin";

/// Append-only log of created documents.
pub trait HistoryLog {
    fn append(&self, entry: HistoryEntry) -> io::Result<()>;

    fn entries(&self) -> io::Result<Vec<HistoryEntry>>;

    /// Source path of the most recent entry for `doc_id` that did not come from stdin.
    fn find_source(&self, doc_id: &str) -> io::Result<Option<String>> {
        let entries = self.entries()?;
        Ok(entries
            .iter()
            .rev()
            .find(|entry| entry.id == doc_id && entry.source != STDIN_SOURCE)
            .map(|entry| entry.source.clone()))
    }

    /// Up to `limit` entries, newest first.
    fn recent(&self, limit: usize) -> io::Result<Vec<HistoryEntry>> {
        let mut entries = self.entries()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Document id from a document URL or a bare id.
///
/// `https://docs.google.com/document/d/<id>/edit` yields `<id>`; anything else is
/// trimmed of whitespace and trailing slashes and used as-is.
pub fn extract_doc_id(identifier: &str) -> String {
    let trimmed = identifier.trim();
    if let Ok(url) = Url::parse(trimmed) {
        if let Some(segments) = url.path_segments() {
            let segments: Vec<&str> = segments.collect();
            if let Some(pos) = segments
                .windows(2)
                .position(|pair| pair[0] == "d" && !pair[1].is_empty())
            {
                if pos > 0 && segments[pos - 1] == "document" {
                    return segments[pos + 1].to_string();
                }
            }
        }
    }
    trimmed.trim_end_matches('/').to_string()
}
