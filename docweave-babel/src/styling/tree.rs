//! Typed view of a document's structure as returned by the Docs API (`documents.get`).
//!
//! Only what the styling pass needs is kept: paragraph ranges, named style, left
//! indent, the font of each text run, and table cell layout. Raw JSON is parsed once
//! by [`DocumentTree::from_json`]; nothing downstream touches `serde_json::Value`.

use crate::error::FormatError;
use serde::Deserialize;

/// Half-open `[start, end)` range into the document's flat text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamedStyle {
    Normal,
    Heading(u8),
    Other(String),
}

impl NamedStyle {
    fn parse(name: &str) -> Self {
        match name {
            "NORMAL_TEXT" => NamedStyle::Normal,
            _ => name
                .strip_prefix("HEADING_")
                .and_then(|level| level.parse::<u8>().ok())
                .filter(|level| (1..=6).contains(level))
                .map(NamedStyle::Heading)
                .unwrap_or_else(|| NamedStyle::Other(name.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub range: TextRange,
    pub named_style: NamedStyle,
    /// Left indent in points.
    pub indent_start: f64,
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub range: TextRange,
    /// Ranges of the paragraphs inside the cell.
    pub paragraphs: Vec<TextRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Index where the table starts; cells are addressed relative to it.
    pub start: u32,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructuralElement {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTree {
    pub elements: Vec<StructuralElement>,
}

impl DocumentTree {
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let raw: RawDocument = serde_json::from_str(json)
            .map_err(|e| FormatError::ParseError(format!("Invalid document structure: {e}")))?;
        Ok(Self {
            elements: convert_content(raw.body.content),
        })
    }
}

fn convert_content(content: Vec<RawStructuralElement>) -> Vec<StructuralElement> {
    content.into_iter().filter_map(convert_element).collect()
}

fn convert_element(raw: RawStructuralElement) -> Option<StructuralElement> {
    let start = raw.start_index.unwrap_or(0);
    let end = raw.end_index.unwrap_or(start);

    if let Some(paragraph) = raw.paragraph {
        let style = paragraph.paragraph_style.unwrap_or_default();
        let named_style = NamedStyle::parse(style.named_style_type.as_deref().unwrap_or("NORMAL_TEXT"));
        let indent_start = style
            .indent_start
            .and_then(|dimension| dimension.magnitude)
            .unwrap_or(0.0);
        let runs = paragraph
            .elements
            .into_iter()
            .filter_map(|element| element.text_run)
            .map(|run| TextRun {
                content: run.content,
                font_family: run
                    .text_style
                    .and_then(|style| style.weighted_font_family)
                    .and_then(|family| family.font_family),
            })
            .collect();
        return Some(StructuralElement::Paragraph(Paragraph {
            range: TextRange::new(start, end),
            named_style,
            indent_start,
            runs,
        }));
    }

    raw.table.map(|table| {
        let rows = table
            .table_rows
            .into_iter()
            .map(|row| TableRow {
                cells: row
                    .table_cells
                    .into_iter()
                    .map(|cell| {
                        let cell_start = cell.start_index.unwrap_or(0);
                        let paragraphs = cell
                            .content
                            .into_iter()
                            .filter(|element| element.paragraph.is_some())
                            .map(|element| {
                                let s = element.start_index.unwrap_or(0);
                                TextRange::new(s, element.end_index.unwrap_or(s))
                            })
                            .collect();
                        TableCell {
                            range: TextRange::new(
                                cell_start,
                                cell.end_index.unwrap_or(cell_start),
                            ),
                            paragraphs,
                        }
                    })
                    .collect(),
            })
            .collect();
        StructuralElement::Table(Table { start, rows })
    })
}

// Wire shapes of the Docs API, private to this module.

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    body: RawBody,
}

#[derive(Deserialize, Default)]
struct RawBody {
    #[serde(default)]
    content: Vec<RawStructuralElement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStructuralElement {
    start_index: Option<u32>,
    end_index: Option<u32>,
    paragraph: Option<RawParagraph>,
    table: Option<RawTable>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParagraph {
    #[serde(default)]
    elements: Vec<RawParagraphElement>,
    paragraph_style: Option<RawParagraphStyle>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawParagraphStyle {
    named_style_type: Option<String>,
    indent_start: Option<RawDimension>,
}

#[derive(Deserialize)]
struct RawDimension {
    magnitude: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParagraphElement {
    text_run: Option<RawTextRun>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextRun {
    #[serde(default)]
    content: String,
    text_style: Option<RawTextStyle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextStyle {
    weighted_font_family: Option<RawWeightedFontFamily>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeightedFontFamily {
    font_family: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTable {
    #[serde(default)]
    table_rows: Vec<RawTableRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTableRow {
    #[serde(default)]
    table_cells: Vec<RawTableCell>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTableCell {
    start_index: Option<u32>,
    end_index: Option<u32>,
    #[serde(default)]
    content: Vec<RawStructuralElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paragraphs_and_tables() {
        let json = r#"{
          "title": "Doc",
          "body": {"content": [
            {"endIndex": 1, "sectionBreak": {}},
            {"startIndex": 1, "endIndex": 7, "paragraph": {
              "elements": [{"startIndex": 1, "endIndex": 7, "textRun": {"content": "Title\n", "textStyle": {}}}],
              "paragraphStyle": {"namedStyleType": "HEADING_1"}}},
            {"startIndex": 7, "endIndex": 20, "table": {"rows": 1, "columns": 1, "tableRows": [
              {"tableCells": [{"startIndex": 8, "endIndex": 12, "content": [
                {"startIndex": 9, "endIndex": 12, "paragraph": {"elements": []}}]}]}]}}
          ]}
        }"#;
        let tree = DocumentTree::from_json(json).unwrap();
        assert_eq!(tree.elements.len(), 2);

        match &tree.elements[0] {
            StructuralElement::Paragraph(p) => {
                assert_eq!(p.named_style, NamedStyle::Heading(1));
                assert_eq!(p.range, TextRange::new(1, 7));
                assert_eq!(p.runs[0].content, "Title\n");
                assert_eq!(p.runs[0].font_family, None);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        match &tree.elements[1] {
            StructuralElement::Table(t) => {
                assert_eq!(t.start, 7);
                assert_eq!(t.rows[0].cells[0].range, TextRange::new(8, 12));
                assert_eq!(t.rows[0].cells[0].paragraphs, vec![TextRange::new(9, 12)]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn reads_indent_and_fonts() {
        let json = r#"{"body": {"content": [{"startIndex": 1, "endIndex": 5, "paragraph": {
            "elements": [{"textRun": {"content": "x()\n", "textStyle": {"weightedFontFamily": {"fontFamily": "Courier New", "weight": 400}}}}],
            "paragraphStyle": {"namedStyleType": "NORMAL_TEXT", "indentStart": {"magnitude": 36, "unit": "PT"}}}}]}}"#;
        let tree = DocumentTree::from_json(json).unwrap();
        let StructuralElement::Paragraph(p) = &tree.elements[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.named_style, NamedStyle::Normal);
        assert_eq!(p.indent_start, 36.0);
        assert_eq!(p.runs[0].font_family.as_deref(), Some("Courier New"));
    }

    #[test]
    fn unknown_named_styles_are_kept() {
        assert_eq!(NamedStyle::parse("TITLE"), NamedStyle::Other("TITLE".into()));
        assert_eq!(NamedStyle::parse("HEADING_9"), NamedStyle::Other("HEADING_9".into()));
    }

    #[test]
    fn rejects_non_json() {
        assert!(DocumentTree::from_json("<html>").is_err());
    }
}
