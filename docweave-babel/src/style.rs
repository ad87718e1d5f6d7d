//! Style configuration shared by the import template and the structural styling pass.
//!
//!     A [`StyleConfig`] is resolved once per run (defaults plus user overrides, see the
//!     docweave-config crate) and then only read. The typed groups drive the Docs API
//!     styling pass; the open `css` map feeds the HTML import template.
//!
//!     The values in [`StyleConfig::default`] mirror `docweave-config/defaults/docweave.default.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub layout: LayoutStyle,
    pub headings: HeadingStyles,
    pub body: BodyStyle,
    pub code: CodeStyle,
    pub blockquote: BlockquoteStyle,
    pub table: TableStyle,
    /// Raw CSS variables substituted into the import template.
    pub css: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutStyle {
    pub margins: Margins,
    pub pageless: bool,
    pub page_width: f64,
    pub page_height: f64,
}

/// Page margins in points. Unset sides are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingStyle {
    pub font: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub space_before: Option<f64>,
    pub space_after: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingStyles {
    pub h1: HeadingStyle,
    pub h2: HeadingStyle,
    pub h3: HeadingStyle,
    pub h4: HeadingStyle,
    pub h5: HeadingStyle,
    pub h6: HeadingStyle,
}

impl HeadingStyles {
    /// Style for a heading level (1-6).
    pub fn level(&self, level: u8) -> Option<&HeadingStyle> {
        match level {
            1 => Some(&self.h1),
            2 => Some(&self.h2),
            3 => Some(&self.h3),
            4 => Some(&self.h4),
            5 => Some(&self.h5),
            6 => Some(&self.h6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyStyle {
    pub font: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
    /// Multiplier, 1.15 means 115%.
    pub line_spacing: Option<f64>,
    pub space_after: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyle {
    pub font: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockquoteStyle {
    pub color: Option<String>,
    pub italic: Option<bool>,
    pub indent: Option<f64>,
    pub space_before: Option<f64>,
    pub space_after: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub header_background: Option<String>,
    pub cell_padding: Option<f64>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub font_size: Option<f64>,
    pub header_bold: bool,
    pub pin_header_rows: bool,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            margins: Margins {
                top: Some(36.0),
                bottom: Some(36.0),
                left: Some(36.0),
                right: Some(36.0),
            },
            pageless: true,
            page_width: 612.0,
            page_height: 792.0,
        }
    }
}

fn heading(size: f64, color: &str, space_before: f64, space_after: f64) -> HeadingStyle {
    HeadingStyle {
        font: Some("Inter".to_string()),
        size: Some(size),
        color: Some(color.to_string()),
        bold: Some(true),
        space_before: Some(space_before),
        space_after: Some(space_after),
    }
}

impl Default for HeadingStyles {
    fn default() -> Self {
        Self {
            h1: heading(24.0, "#111111", 18.0, 6.0),
            h2: heading(20.0, "#111111", 16.0, 4.0),
            h3: heading(16.0, "#111111", 14.0, 4.0),
            h4: heading(13.0, "#111111", 12.0, 2.0),
            h5: heading(11.0, "#111111", 10.0, 2.0),
            h6: heading(10.0, "#6a737d", 10.0, 2.0),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            layout: LayoutStyle::default(),
            headings: HeadingStyles::default(),
            body: BodyStyle {
                font: Some("Inter".to_string()),
                size: Some(11.0),
                color: Some("#1a1a1a".to_string()),
                line_spacing: Some(1.15),
                space_after: Some(4.0),
            },
            code: CodeStyle {
                font: Some("Roboto Mono".to_string()),
                size: Some(9.5),
                color: Some("#24292e".to_string()),
                background: Some("#f6f8fa".to_string()),
            },
            blockquote: BlockquoteStyle {
                color: Some("#6a737d".to_string()),
                italic: Some(true),
                indent: Some(18.0),
                space_before: Some(4.0),
                space_after: Some(4.0),
            },
            table: TableStyle {
                header_background: Some("#f6f8fa".to_string()),
                cell_padding: Some(4.0),
                border_color: Some("#d0d7de".to_string()),
                border_width: Some(0.75),
                font_size: Some(9.0),
                header_bold: true,
                pin_header_rows: true,
            },
            css: default_css_variables(),
        }
    }
}

fn default_css_variables() -> BTreeMap<String, String> {
    [
        ("font_family", "'Inter', 'Helvetica Neue', Arial, sans-serif"),
        ("code_font", "'Roboto Mono', 'SF Mono', 'Consolas', monospace"),
        ("body_font_size", "11pt"),
        ("body_line_height", "1.6"),
        ("body_color", "#1a1a1a"),
        ("heading_color", "#111111"),
        ("code_bg", "#f6f8fa"),
        ("code_border", "#e1e4e8"),
        ("code_color", "#24292e"),
        ("blockquote_border", "#dfe2e5"),
        ("blockquote_color", "#6a737d"),
        ("link_color", "#1a73e8"),
        ("table_border", "#d0d7de"),
        ("table_header_bg", "#f6f8fa"),
        ("hr_color", "#d0d7de"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Substrings that mark a font family as monospace, compared case-insensitively.
pub const MONOSPACE_MARKERS: &[&str] = &["mono", "courier", "consolas", "menlo"];

pub fn is_monospace_font(family: &str) -> bool {
    let family = family.to_lowercase();
    MONOSPACE_MARKERS.iter().any(|marker| family.contains(marker))
}

/// Color with channels in `0.0..=1.0`, the form the Docs API expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl RgbColor {
    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map(|v| f64::from(v) / 255.0)
        };
        Some(Self {
            red: channel(0)?,
            green: channel(2)?,
            blue: channel(4)?,
        })
    }
}
