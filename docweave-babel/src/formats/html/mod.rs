//! HTML support
//!
//! # Library Choice
//!
//! We use the `html5ever` + `rcdom` + `markup5ever` ecosystem for HTML parsing and serialization:
//! - `html5ever`: Browser-grade HTML5 parser from the Servo project
//! - `markup5ever_rcdom`: Reference-counted DOM tree implementation
//! - `markup5ever`: Serialization infrastructure
//!
//! Exported documents and scraped pages are frequently malformed; html5ever recovers the same
//! way a browser would, which is what the author saw when the document was written.
//!
//! # Pipeline
//!
//! ```text
//! HTML string -> RcDom -> HtmlCleaner (in place) -> MarkdownWriter -> MarkdownCleaner
//! ```
//!
//! # Element Mapping Table
//!
//! | HTML                         | Markdown                         | Notes                                       |
//! |------------------------------|----------------------------------|---------------------------------------------|
//! | `<h1>`..`<h6>`               | `#`..`######`                    | ATX only, content forced onto one line      |
//! | `<p>`, `<div>` and friends   | paragraph                        | blank line separated                        |
//! | `<strong>`/`<b>`             | `**text**`                       | surrounding spaces kept outside the markers |
//! | `<em>`/`<i>`                 | `*text*`                         |                                             |
//! | `<del>`/`<s>`                | `~~text~~`                       |                                             |
//! | `<code>`                     | `` `code` ``                     | double backticks when content has one       |
//! | `<pre>`                      | fenced block                     | content verbatim                            |
//! | `<a href>`                   | `[text](href)` or `<href>`       | empty href keeps the text only              |
//! | `<img>`                      | `![alt](src)`                    |                                             |
//! | `<ul>`/`<ol>`                | `-` / `1.` items                 | nesting via child lists or list levels      |
//! | `<blockquote>`               | `> ` prefixed lines              |                                             |
//! | `<table>`                    | pipe table                       | first non-empty row is the header           |
//! | `<dl>`/`<dt>`/`<dd>`         | term / `: definition`            |                                             |
//! | `<hr>`                       | `---`                            |                                             |

pub mod cleaner;
pub mod dom;
pub mod writer;

use crate::error::FormatError;
use crate::formats::markdown::{CleanupProfile, MarkdownCleaner};

pub use cleaner::{unwrap_redirect, HtmlCleaner};
pub use dom::{parse_html, serialize_dom};
pub use writer::MarkdownWriter;

/// Remove export artifacts and return the cleaned HTML.
pub fn clean_html(html: &str) -> Result<String, FormatError> {
    let dom = parse_html(html);
    HtmlCleaner::default().clean(&dom);
    serialize_dom(&dom)
}

/// Convert HTML to Markdown, cleaning both the DOM and the resulting text.
pub fn html_to_markdown(html: &str, profile: CleanupProfile) -> String {
    let dom = parse_html(html);
    HtmlCleaner::default().clean(&dom);
    let raw = MarkdownWriter::default().write(&dom);
    MarkdownCleaner::new(profile).clean(&raw)
}
