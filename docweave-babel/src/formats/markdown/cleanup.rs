//! Markdown cleanup
//!
//!     HTML exported by the document service and HTML fetched from the web both leave
//!     residue once converted: non-breaking spaces, zero-width characters, emphasis
//!     markers around nothing, links without targets, rows of empty table cells.
//!     [`MarkdownCleaner`] removes them.
//!
//!     Rules run line by line outside fenced code blocks, followed by whitespace
//!     normalization, and the pair is repeated until the text stops changing: removing
//!     one artifact can expose another (`** ** **` style runs, a rule line with trailing
//!     blanks). The result is a fixed point, so cleaning already-clean text returns it
//!     unchanged.
//!
//!     | Rule                              | Export | Ingest |
//!     |-----------------------------------|--------|--------|
//!     | NBSP / narrow NBSP to space       |   x    |        |
//!     | zero-width chars, BOM removed     |   x    |        |
//!     | `** **` and `__ __` removed       |   x    |   x    |
//!     | `* *` removed                     |   x    |        |
//!     | `[text]()` to `text`              |   x    |   x    |
//!     | googleusercontent images dropped  |   x    |        |
//!     | pipe-only table rows dropped      |   x    |        |
//!     | rule lines normalized to `---`    |   x    |   x    |
//!     | whitespace normalization          |   x    |   x    |

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EMPTY_STRONG_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^*\w])\*\*[ \t]*\*\*([^*\w]|$)").expect("static regex"));
static EMPTY_STRONG_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^_\w])__[ \t]*__([^_\w]|$)").expect("static regex"));
static EMPTY_EM_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^*\w])\*[ \t]+\*([^*\w]|$)").expect("static regex"));
static EMPTY_TARGET_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!?)\[([^\]]*)\]\([ \t]*\)").expect("static regex"));
static HOSTED_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[[^\]]*\]\([ \t]*https?://[^)\s]*googleusercontent\.com[^)]*\)")
        .expect("static regex")
});
static PIPE_ONLY_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\|(?:[ \t]*\|)+[ \t]*$").expect("static regex"));
static RULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:-(?:[ \t]*-){2,}|\*(?:[ \t]*\*){2,}|_(?:[ \t]*_){2,})[ \t]*$")
        .expect("static regex")
});
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Which source the Markdown came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupProfile {
    /// Markdown converted from a document service export.
    Export,
    /// Markdown fetched or converted during ingestion.
    Ingest,
}

#[derive(Debug, Clone, Copy)]
pub struct MarkdownCleaner {
    profile: CleanupProfile,
}

impl MarkdownCleaner {
    pub fn new(profile: CleanupProfile) -> Self {
        Self { profile }
    }

    pub fn export() -> Self {
        Self::new(CleanupProfile::Export)
    }

    pub fn ingest() -> Self {
        Self::new(CleanupProfile::Ingest)
    }

    pub fn profile(&self) -> CleanupProfile {
        self.profile
    }

    pub fn clean(&self, markdown: &str) -> String {
        let mut current = markdown.replace("\r\n", "\n");
        loop {
            let next = normalize_whitespace(&self.apply_rules(&current));
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn is_export(&self) -> bool {
        self.profile == CleanupProfile::Export
    }

    fn apply_rules(&self, text: &str) -> String {
        let text = if self.is_export() {
            replace_invisible(text)
        } else {
            text.to_string()
        };

        let mut lines = Vec::new();
        let mut fence: Option<char> = None;

        for line in text.split('\n') {
            if let Some(marker) = fence_marker(line) {
                match fence {
                    None => fence = Some(marker),
                    Some(open) if open == marker => fence = None,
                    Some(_) => {}
                }
                lines.push(line.to_string());
                continue;
            }
            if fence.is_some() {
                lines.push(line.to_string());
                continue;
            }
            if self.is_export() && PIPE_ONLY_ROW.is_match(line) {
                continue;
            }
            if RULE_LINE.is_match(line) {
                lines.push("---".to_string());
                continue;
            }
            lines.push(self.clean_line(line));
        }

        lines.join("\n")
    }

    fn clean_line(&self, line: &str) -> String {
        let mut line = EMPTY_STRONG_STAR.replace_all(line, "$1$2").into_owned();
        line = EMPTY_STRONG_UNDERSCORE
            .replace_all(&line, "$1$2")
            .into_owned();
        if self.is_export() {
            line = EMPTY_EM_STAR.replace_all(&line, "$1$2").into_owned();
            line = HOSTED_IMAGE.replace_all(&line, "").into_owned();
        }
        EMPTY_TARGET_LINK
            .replace_all(&line, |caps: &Captures| {
                if caps[1].is_empty() {
                    caps[2].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }
}

impl Default for MarkdownCleaner {
    fn default() -> Self {
        Self::export()
    }
}

/// Marker character of a fence opening or closing line.
fn fence_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

fn replace_invisible(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{a0}' | '\u{202f}' => Some(' '),
            '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}' | '\u{feff}' => None,
            other => Some(other),
        })
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    let trimmed = text.split('\n').map(str::trim_end).collect::<Vec<_>>();
    let joined = trimmed.join("\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&joined, "\n\n");
    let body = collapsed.trim_start_matches('\n').trim_end_matches('\n');
    format!("{body}\n")
}
