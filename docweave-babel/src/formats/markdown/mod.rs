//! Markdown support
//!
//!     Two directions live here:
//!
//!     - Rendering ([`render_html`], [`render_import_html`]): Markdown to HTML through comrak,
//!       used by the forward converter before the document import.
//!     - Cleanup ([`cleanup`]): normalization of Markdown produced by the reverse converter
//!       and by ingestion, removing artifacts the export format leaves behind.
//!
//! Rendering Profile
//!
//!     | Construct          | Markdown                 | HTML                                   |
//!     |--------------------|--------------------------|----------------------------------------|
//!     | Tables             | GFM pipe tables          | <table> with <thead>/<tbody>           |
//!     | Footnotes          | [^1]                     | <section class="footnotes">            |
//!     | Definition lists   | Term / : definition      | <dl><dt><dd>                           |
//!     | Strikethrough      | ~~text~~                 | <del>                                  |
//!     | Smart punctuation  | "quotes", --, ...        | curly quotes, dashes, ellipsis         |
//!     | Raw HTML           | inline or block          | passed through untouched               |
//!     | Heading anchors    | # Title                  | <h1> with an `id` slug anchor          |
//!
//!     List numbering follows CommonMark: an ordered list keeps its first number and the
//!     renderer renumbers the rest, and bullet/ordered lists never merge.

pub mod cleanup;

use crate::style::StyleConfig;
use crate::templates::render_import_document;
use comrak::{markdown_to_html, ComrakOptions};

pub use cleanup::{CleanupProfile, MarkdownCleaner};

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.description_lists = true;
    options.extension.header_ids = Some(String::new());
    options.parse.smart = true;
    options.render.unsafe_ = true;
    options
}

/// Render a Markdown fragment to HTML body content.
pub fn render_html(markdown: &str) -> String {
    markdown_to_html(markdown, &default_comrak_options())
}

/// Render Markdown into the complete, styled HTML page used for import.
pub fn render_import_html(markdown: &str, title: &str, styles: &StyleConfig) -> String {
    let body = render_html(markdown);
    render_import_document(&body, title, styles)
}
