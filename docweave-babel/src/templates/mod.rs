//! Ready-to-insert snippets and document shells.
//!
//! - The import shell ([`render_import_document`]): wraps rendered Markdown in a complete
//!   HTML page whose stylesheet is driven by the `css` variables of a [`StyleConfig`].
//!   Every variable is substituted into `{{name}}` placeholders of `css/import.css` and
//!   is also declared as a `--name` custom property under `:root`, so keys the stock
//!   stylesheet does not know about still reach the page.
//!
//! - Image references ([`image_reference`]): Markdown image syntax pointing at a
//!   rendered file, relative to the document that embeds it.

mod util;

use crate::style::StyleConfig;
use std::path::Path;

pub(crate) use util::normalize_path;

const IMPORT_CSS: &str = include_str!("../../css/import.css");

/// Build the full HTML page handed to the document import.
pub fn render_import_document(body_html: &str, title: &str, styles: &StyleConfig) -> String {
    let css = render_stylesheet(styles);
    let escaped_title = html_escape(title);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="generator" content="docweave">
  <title>{escaped_title}</title>
  <style>
{css}
  </style>
</head>
<body>
{body_html}
</body>
</html>"#
    )
}

/// The import stylesheet with all `css` variables applied.
pub fn render_stylesheet(styles: &StyleConfig) -> String {
    let mut root = String::from(":root {\n");
    let mut sheet = IMPORT_CSS.to_string();

    for (key, value) in &styles.css {
        let value = sanitize_css_value(value);
        root.push_str(&format!("    --{}: {value};\n", key.replace('_', "-")));
        sheet = sheet.replace(&format!("{{{{{key}}}}}"), &value);
    }
    root.push_str("}\n");

    format!("{root}{sheet}")
}

/// Markdown image pointing at `image` from a document living in `document_dir`.
pub fn image_reference(alt: &str, image: &Path, document_dir: Option<&Path>) -> String {
    format!("![{alt}]({})", normalize_path(image, document_dir))
}

// Values end up inside a <style> element.
fn sanitize_css_value(value: &str) -> String {
    value.replace(['<', '>', '{', '}'], "")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
