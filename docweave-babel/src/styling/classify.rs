//! Classification of structural elements into styling roles.
//!
//! After an HTML import, code blocks and block quotes are plain `NORMAL_TEXT`
//! paragraphs; the only traces left are the font of the text runs and the left indent.
//! Classification reads those signals once and yields an [`ElementKind`]; mutation
//! building works from the kind alone.

use super::tree::{DocumentTree, NamedStyle, Paragraph, StructuralElement, Table, TextRange};
use crate::style::is_monospace_font;

/// Left indent (points) above which a normal paragraph is taken for a block quote.
pub const BLOCKQUOTE_INDENT_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading(u8),
    Body,
    Code,
    Blockquote,
    Table,
}

/// An element that the styling pass will touch.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<'a> {
    Paragraph { kind: ElementKind, range: TextRange },
    Table(&'a Table),
}

impl Classified<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            Classified::Paragraph { kind, .. } => *kind,
            Classified::Table(_) => ElementKind::Table,
        }
    }
}

/// Kind of a paragraph, or `None` for named styles the pass leaves alone (title, subtitle).
pub fn classify_paragraph(paragraph: &Paragraph) -> Option<ElementKind> {
    match paragraph.named_style {
        NamedStyle::Heading(level) => Some(ElementKind::Heading(level)),
        NamedStyle::Normal => {
            if looks_like_code(paragraph) {
                Some(ElementKind::Code)
            } else if paragraph.indent_start > BLOCKQUOTE_INDENT_THRESHOLD {
                Some(ElementKind::Blockquote)
            } else {
                Some(ElementKind::Body)
            }
        }
        NamedStyle::Other(_) => None,
    }
}

fn looks_like_code(paragraph: &Paragraph) -> bool {
    paragraph
        .runs
        .iter()
        .filter(|run| !run.content.trim().is_empty())
        .filter_map(|run| run.font_family.as_deref())
        .any(is_monospace_font)
}

/// Classify every element that carries content, in document order.
pub fn classify_document(tree: &DocumentTree) -> Vec<Classified<'_>> {
    tree.elements
        .iter()
        .filter_map(|element| match element {
            StructuralElement::Paragraph(paragraph) => {
                if paragraph.range.is_empty() {
                    return None;
                }
                classify_paragraph(paragraph).map(|kind| Classified::Paragraph {
                    kind,
                    range: paragraph.range,
                })
            }
            StructuralElement::Table(table) => Some(Classified::Table(table)),
        })
        .collect()
}
