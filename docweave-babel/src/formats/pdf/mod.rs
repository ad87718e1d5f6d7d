//! PDF text extraction built on the poppler `pdftotext` tool.
//!
//! The PDF is handed to `pdftotext` (located on `PATH`), which writes UTF-8 text with
//! form feeds between pages. That text is then reflowed into Markdown paragraphs:
//! wrapped lines are joined, words hyphenated across a line break are rejoined, and
//! pages are separated by blank lines.
//!
//! Scanned PDFs have no text layer and come back empty; there is no OCR step.

use crate::error::FormatError;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;
use which::which;

/// Extract the text of a PDF file as Markdown paragraphs.
pub fn pdf_to_markdown(path: &Path) -> Result<String, FormatError> {
    let text = extract_text(path)?;
    Ok(reflow_text(&text))
}

/// Same as [`pdf_to_markdown`] for a PDF held in memory (for example a download).
pub fn pdf_bytes_to_markdown(bytes: &[u8]) -> Result<String, FormatError> {
    let temp_dir =
        tempdir().map_err(|e| FormatError::ParseError(format!("Temp dir error: {e}")))?;
    let pdf_path = temp_dir.path().join("download.pdf");
    fs::write(&pdf_path, bytes).map_err(|e| FormatError::ParseError(e.to_string()))?;
    pdf_to_markdown(&pdf_path)
}

fn extract_text(path: &Path) -> Result<String, FormatError> {
    let binary = which("pdftotext").map_err(|_| {
        FormatError::NotSupported(
            "PDF conversion needs the `pdftotext` tool (poppler-utils) on PATH".to_string(),
        )
    })?;
    let temp_dir =
        tempdir().map_err(|e| FormatError::ParseError(format!("Temp dir error: {e}")))?;
    let text_path = temp_dir.path().join("extracted.txt");

    let output = Command::new(&binary)
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg(&text_path)
        .output()
        .map_err(|e| {
            FormatError::ParseError(format!(
                "Failed to launch pdftotext ({}): {e}",
                binary.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FormatError::ParseError(format!(
            "pdftotext exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    fs::read_to_string(&text_path).map_err(|e| FormatError::ParseError(e.to_string()))
}

/// Turn line-wrapped page text into Markdown paragraphs.
pub fn reflow_text(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, paragraphs: &mut Vec<String>| {
        if !current.is_empty() {
            paragraphs.push(std::mem::take(current));
        }
    };

    for page in text.split('\u{c}') {
        for line in page.lines() {
            let line = line.trim();
            if line.is_empty() {
                flush(&mut current, &mut paragraphs);
                continue;
            }
            if current.is_empty() {
                current.push_str(line);
            } else if current.ends_with('-')
                && !current.ends_with(" -")
                && line.starts_with(char::is_lowercase)
            {
                current.pop();
                current.push_str(line);
            } else {
                current.push(' ');
                current.push_str(line);
            }
        }
        flush(&mut current, &mut paragraphs);
    }

    if paragraphs.is_empty() {
        String::new()
    } else {
        format!("{}\n", paragraphs.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_wrapped_lines_into_paragraphs() {
        let text = "First line\nstill first.\n\nSecond para.\n";
        assert_eq!(reflow_text(text), "First line still first.\n\nSecond para.\n");
    }

    #[test]
    fn rejoins_hyphenated_words() {
        assert_eq!(reflow_text("an exam-\nple here\n"), "an example here\n");
        assert_eq!(reflow_text("dash -\nnext\n"), "dash - next\n");
    }

    #[test]
    fn pages_split_paragraphs() {
        assert_eq!(reflow_text("page one\u{c}page two\u{c}"), "page one\n\npage two\n");
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(reflow_text("\u{c}\n  \n\u{c}"), "");
    }
}
