//! Ingestion of external content (web pages, PDFs, HTML files) as clean Markdown.
//!
//! Web pages go through a reader service that already returns Markdown. When the
//! reader fails, or when the caller asks for local conversion, the page is fetched
//! directly and converted with the same HTML cleaner and Markdown writer that the pull
//! pipeline uses. PDFs are converted by [`crate::formats::pdf`]. Every result ends with
//! the ingest cleanup profile.

use crate::error::{Outcome, PipelineError};
use crate::formats::html::html_to_markdown;
use crate::formats::markdown::{CleanupProfile, MarkdownCleaner};
use crate::service::WebSource;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const SUPPORTED_SOURCES: &str = "Supported: URLs (http/https), .pdf files, .html/.htm files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Url,
    PdfUrl,
    PdfFile,
    HtmlFile,
}

/// Classify an ingestion source by its scheme or file extension.
pub fn detect_source(source: &str) -> Result<SourceKind, PipelineError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Ok(if source.to_ascii_lowercase().ends_with(".pdf") {
            SourceKind::PdfUrl
        } else {
            SourceKind::Url
        });
    }

    let extension = Path::new(source)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => Ok(SourceKind::PdfFile),
        Some("html") | Some("htm") => Ok(SourceKind::HtmlFile),
        _ => Err(PipelineError::InvalidInput(format!(
            "Unknown source type: {source}\n{SUPPORTED_SOURCES}"
        ))),
    }
}

/// Convert `source` to Markdown.
///
/// With `local` set, URLs skip the reader service. Falling back from the reader and
/// finding no text in a PDF are reported as warnings.
pub fn ingest(
    web: &dyn WebSource,
    source: &str,
    local: bool,
) -> Result<Outcome<String>, PipelineError> {
    let kind = detect_source(source)?;
    debug!(source, ?kind, "ingesting");
    let mut warnings = Vec::new();

    let markdown = match kind {
        SourceKind::Url => ingest_url(web, source, local, &mut warnings)?,
        SourceKind::PdfUrl => {
            let bytes = web.fetch_bytes(source)?;
            pdf_bytes(&bytes, &mut warnings)?
        }
        SourceKind::PdfFile => pdf_file(existing_file(source)?, &mut warnings)?,
        SourceKind::HtmlFile => {
            let path = existing_file(source)?;
            let html = fs::read_to_string(path).map_err(|err| {
                PipelineError::io(format!("Cannot read {}", path.display()), err)
            })?;
            html_to_markdown(&html, CleanupProfile::Ingest)
        }
    };

    let cleaned = MarkdownCleaner::ingest().clean(&markdown);
    info!(source, bytes = cleaned.len(), "ingested");
    Ok(Outcome::from_parts(cleaned, warnings))
}

fn ingest_url(
    web: &dyn WebSource,
    url: &str,
    local: bool,
    warnings: &mut Vec<String>,
) -> Result<String, PipelineError> {
    if !local {
        match web.read_markdown(url) {
            Ok(markdown) => return Ok(markdown),
            Err(err) => {
                warn!(error = %err, "reader service failed, converting locally");
                warnings.push(format!("Reader service failed ({err}), fell back to local conversion"));
            }
        }
    }
    let html = web.fetch_text(url)?;
    Ok(html_to_markdown(&html, CleanupProfile::Ingest))
}

fn existing_file(source: &str) -> Result<&Path, PipelineError> {
    let path = Path::new(source);
    if path.exists() {
        Ok(path)
    } else {
        Err(PipelineError::InvalidInput(format!("File not found: {source}")))
    }
}

const EMPTY_PDF_WARNING: &str = "PDF appears to be image-only or empty. OCR is not supported.";

fn check_pdf_text(markdown: String, warnings: &mut Vec<String>) -> String {
    if markdown.trim().is_empty() {
        warn!("pdf produced no text");
        warnings.push(EMPTY_PDF_WARNING.to_string());
        return String::new();
    }
    markdown
}

#[cfg(feature = "pdf-import")]
fn pdf_file(path: &Path, warnings: &mut Vec<String>) -> Result<String, PipelineError> {
    let markdown = crate::formats::pdf::pdf_to_markdown(path)?;
    Ok(check_pdf_text(markdown, warnings))
}

#[cfg(feature = "pdf-import")]
fn pdf_bytes(bytes: &[u8], warnings: &mut Vec<String>) -> Result<String, PipelineError> {
    let markdown = crate::formats::pdf::pdf_bytes_to_markdown(bytes)?;
    Ok(check_pdf_text(markdown, warnings))
}

#[cfg(not(feature = "pdf-import"))]
fn pdf_file(_path: &Path, _warnings: &mut Vec<String>) -> Result<String, PipelineError> {
    Err(pdf_disabled())
}

#[cfg(not(feature = "pdf-import"))]
fn pdf_bytes(_bytes: &[u8], _warnings: &mut Vec<String>) -> Result<String, PipelineError> {
    Err(pdf_disabled())
}

#[cfg(not(feature = "pdf-import"))]
fn pdf_disabled() -> PipelineError {
    crate::error::FormatError::NotSupported(
        "PDF import is disabled in this build (feature `pdf-import`)".to_string(),
    )
    .into()
}
