//! Format implementations
//!
//! This module contains the conversions between the text formats docweave moves
//! documents through: Markdown, HTML and (inbound only) PDF.

pub mod html;
pub mod markdown;
#[cfg(feature = "pdf-import")]
pub mod pdf;

pub use html::{clean_html, html_to_markdown, HtmlCleaner, MarkdownWriter};
pub use markdown::{render_html, render_import_html, CleanupProfile, MarkdownCleaner};
