//! Structural styling pass
//!
//!     HTML import gets the content into the document but not the look: imported
//!     documents come out with the service's default fonts, margins and table borders.
//!     This pass reads the imported structure back, decides what each element is, and
//!     sends a single batch of style mutations.
//!
//!     The pass is split so the interesting part is pure:
//!
//!         DocumentTree --classify--> [Classified] --plan--> [StyleMutation]
//!
//!     - [`tree`]: typed document structure parsed from the API response.
//!     - [`classify`]: heading / body / code / blockquote / table decisions.
//!     - [`mutation`]: API request types with field masks derived from their content.
//!     - [`plan_mutations`]: the style-config driven mapping from classified elements
//!       to mutations. No I/O.
//!     - [`apply_styling`]: fetch, plan, send. Failures degrade, they never abort.
//!
//! Ordering
//!
//!     The document style mutation always comes first, followed by per-element mutations
//!     in document order. Each paragraph gets its text style before its paragraph style.

pub mod classify;
pub mod mutation;
pub mod tree;

use crate::error::{Outcome, ServiceError};
use crate::service::DocumentService;
use crate::style::{RgbColor, StyleConfig};
use classify::{classify_document, Classified, ElementKind};
use tracing::{debug, info, warn};

pub use mutation::{
    Dimension, DocumentStyle, FieldMask, OptionalColor, PageSize, ParagraphStyle, StyleMutation,
    TableCellBorder, TableCellStyle, TextStyle, WeightedFontFamily,
};
pub use tree::{DocumentTree, StructuralElement, TextRange};

/// Page height used to emulate a pageless document.
pub const PAGELESS_HEIGHT: f64 = 100_000.0;

const BOLD_WEIGHT: u16 = 700;
const REGULAR_WEIGHT: u16 = 400;

/// What the styling pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StylingReport {
    /// Number of mutations sent in the batch.
    pub mutations: usize,
    /// Whether the batch was accepted by the service.
    pub applied: bool,
}

/// Fetch the document structure, plan the mutations and apply them in one batch.
///
/// Never fails: a read or write error yields a degraded outcome with
/// `applied == false` and the error as a warning.
pub fn apply_styling(
    service: &dyn DocumentService,
    doc_id: &str,
    styles: &StyleConfig,
) -> Outcome<StylingReport> {
    let tree = match service.fetch_structure(doc_id) {
        Ok(tree) => tree,
        Err(err) => return degraded("Could not read document", err),
    };

    let mutations = plan_mutations(&tree, styles);
    if mutations.is_empty() {
        debug!(doc_id, "no style mutations to apply");
        return Outcome::Complete(StylingReport::default());
    }

    match service.batch_update(doc_id, &mutations) {
        Ok(()) => {
            info!(doc_id, count = mutations.len(), "applied structural styling");
            Outcome::Complete(StylingReport {
                mutations: mutations.len(),
                applied: true,
            })
        }
        Err(err) => degraded("Could not apply styles", err).map(|report| StylingReport {
            mutations: mutations.len(),
            ..report
        }),
    }
}

fn degraded(what: &str, err: ServiceError) -> Outcome<StylingReport> {
    warn!(error = %err, "{what}");
    Outcome::degraded(StylingReport::default(), format!("{what}: {err}"))
}

/// Map a document tree to the mutations that apply `styles` to it.
pub fn plan_mutations(tree: &DocumentTree, styles: &StyleConfig) -> Vec<StyleMutation> {
    let mut mutations = Vec::new();
    mutations.extend(StyleMutation::document(document_style(styles)));

    for element in classify_document(tree) {
        match element {
            Classified::Paragraph { kind, range } => {
                let (text, paragraph) = paragraph_styles(kind, styles);
                mutations.extend(StyleMutation::text(range, text));
                mutations.extend(StyleMutation::paragraph(range, paragraph));
            }
            Classified::Table(table) => {
                plan_table(table, styles, &mut mutations);
            }
        }
    }

    debug!(count = mutations.len(), "planned style mutations");
    mutations
}

fn document_style(styles: &StyleConfig) -> DocumentStyle {
    let layout = &styles.layout;
    let height = if layout.pageless {
        PAGELESS_HEIGHT
    } else {
        layout.page_height
    };
    DocumentStyle {
        margin_top: layout.margins.top.map(Dimension::pt),
        margin_bottom: layout.margins.bottom.map(Dimension::pt),
        margin_left: layout.margins.left.map(Dimension::pt),
        margin_right: layout.margins.right.map(Dimension::pt),
        page_size: Some(PageSize {
            width: Dimension::pt(layout.page_width),
            height: Dimension::pt(height),
        }),
    }
}

fn color(hex: Option<&str>) -> Option<OptionalColor> {
    let hex = hex?;
    match RgbColor::from_hex(hex) {
        Some(rgb) => Some(rgb.into()),
        None => {
            warn!(color = hex, "ignoring invalid color in style configuration");
            None
        }
    }
}

fn font(family: Option<&str>, weight: u16) -> Option<WeightedFontFamily> {
    family
        .filter(|f| !f.is_empty())
        .map(|font_family| WeightedFontFamily {
            font_family: font_family.to_string(),
            weight,
        })
}

fn paragraph_styles(kind: ElementKind, styles: &StyleConfig) -> (TextStyle, ParagraphStyle) {
    match kind {
        ElementKind::Heading(level) => {
            let Some(heading) = styles.headings.level(level) else {
                return Default::default();
            };
            let weight = if heading.bold.unwrap_or(true) {
                BOLD_WEIGHT
            } else {
                REGULAR_WEIGHT
            };
            (
                TextStyle {
                    weighted_font_family: font(heading.font.as_deref(), weight),
                    font_size: heading.size.map(Dimension::pt),
                    foreground_color: color(heading.color.as_deref()),
                    bold: heading.bold,
                    ..Default::default()
                },
                ParagraphStyle {
                    space_above: heading.space_before.map(Dimension::pt),
                    space_below: heading.space_after.map(Dimension::pt),
                    ..Default::default()
                },
            )
        }
        ElementKind::Body => {
            let body = &styles.body;
            (
                TextStyle {
                    weighted_font_family: font(body.font.as_deref(), REGULAR_WEIGHT),
                    font_size: body.size.map(Dimension::pt),
                    foreground_color: color(body.color.as_deref()),
                    ..Default::default()
                },
                ParagraphStyle {
                    line_spacing: body.line_spacing.map(|spacing| spacing * 100.0),
                    space_below: body.space_after.map(Dimension::pt),
                    ..Default::default()
                },
            )
        }
        ElementKind::Code => {
            let code = &styles.code;
            (
                TextStyle {
                    weighted_font_family: font(code.font.as_deref(), REGULAR_WEIGHT),
                    font_size: code.size.map(Dimension::pt),
                    foreground_color: color(code.color.as_deref()),
                    background_color: color(code.background.as_deref()),
                    ..Default::default()
                },
                ParagraphStyle::default(),
            )
        }
        ElementKind::Blockquote => {
            let quote = &styles.blockquote;
            (
                TextStyle {
                    foreground_color: color(quote.color.as_deref()),
                    italic: quote.italic,
                    ..Default::default()
                },
                ParagraphStyle {
                    indent_start: quote.indent.map(Dimension::pt),
                    space_above: quote.space_before.map(Dimension::pt),
                    space_below: quote.space_after.map(Dimension::pt),
                    ..Default::default()
                },
            )
        }
        ElementKind::Table => Default::default(),
    }
}

fn plan_table(table: &tree::Table, styles: &StyleConfig, mutations: &mut Vec<StyleMutation>) {
    let config = &styles.table;
    let border = match (color(config.border_color.as_deref()), config.border_width) {
        (Some(color), Some(width)) => Some(TableCellBorder::solid(color, width)),
        _ => None,
    };
    let header_background = color(config.header_background.as_deref());

    for (row_index, row) in table.rows.iter().enumerate() {
        let is_header = row_index == 0;
        for (column_index, cell) in row.cells.iter().enumerate() {
            if cell.range.is_empty() {
                continue;
            }

            let mut cell_style = TableCellStyle {
                background_color: if is_header { header_background } else { None },
                ..Default::default()
            };
            if let Some(padding) = config.cell_padding {
                cell_style = cell_style.with_padding(padding);
            }
            if let Some(border) = border {
                cell_style = cell_style.with_border(border);
            }
            mutations.extend(StyleMutation::table_cell(
                table.start,
                row_index as u32,
                column_index as u32,
                cell_style,
            ));

            let text = TextStyle {
                font_size: config.font_size.map(Dimension::pt),
                bold: (is_header && config.header_bold).then_some(true),
                ..Default::default()
            };
            for paragraph in &cell.paragraphs {
                mutations.extend(StyleMutation::text(*paragraph, text.clone()));
            }
        }
    }

    if config.pin_header_rows && !table.rows.is_empty() {
        mutations.push(StyleMutation::pin_header_row(table.start));
    }
}
