//! Style mutations in the shape of Docs API `batchUpdate` requests.
//!
//! Every mutation pairs a partial style with a field mask. The mask is computed from
//! the populated fields of the style by the constructors on [`StyleMutation`], so a
//! mutation always declares exactly the fields it sets and the service never resets
//! a field to its default by accident. Style structs serialize with absent fields
//! omitted, which keeps the JSON keys and the mask in lockstep.

use super::tree::TextRange;
use crate::style::RgbColor;
use serde::{Serialize, Serializer};

/// A length in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: &'static str,
}

impl Dimension {
    pub fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: "PT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

/// The API's nullable color wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: Color,
}

impl From<RgbColor> for OptionalColor {
    fn from(rgb_color: RgbColor) -> Self {
        OptionalColor {
            color: Color { rgb_color },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
    pub weight: u16,
}

/// Comma-separated list of the style fields a mutation touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask(Vec<&'static str>);

impl FieldMask {
    fn from_flags(flags: &[(&'static str, bool)]) -> Self {
        FieldMask(
            flags
                .iter()
                .filter(|(_, set)| *set)
                .map(|(name, _)| *name)
                .collect(),
        )
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(","))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
}

impl TextStyle {
    pub fn field_mask(&self) -> FieldMask {
        FieldMask::from_flags(&[
            ("weightedFontFamily", self.weighted_font_family.is_some()),
            ("fontSize", self.font_size.is_some()),
            ("foregroundColor", self.foreground_color.is_some()),
            ("backgroundColor", self.background_color.is_some()),
            ("bold", self.bold.is_some()),
            ("italic", self.italic.is_some()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_above: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_below: Option<Dimension>,
    /// Percentage, 115.0 means 1.15 lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<Dimension>,
}

impl ParagraphStyle {
    pub fn field_mask(&self) -> FieldMask {
        FieldMask::from_flags(&[
            ("spaceAbove", self.space_above.is_some()),
            ("spaceBelow", self.space_below.is_some()),
            ("lineSpacing", self.line_spacing.is_some()),
            ("indentStart", self.indent_start.is_some()),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellBorder {
    pub color: OptionalColor,
    pub width: Dimension,
    pub dash_style: &'static str,
}

impl TableCellBorder {
    pub fn solid(color: OptionalColor, width: f64) -> Self {
        Self {
            color,
            width: Dimension::pt(width),
            dash_style: "SOLID",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<TableCellBorder>,
}

impl TableCellStyle {
    pub fn with_padding(mut self, padding: f64) -> Self {
        let padding = Some(Dimension::pt(padding));
        self.padding_left = padding;
        self.padding_right = padding;
        self.padding_top = padding;
        self.padding_bottom = padding;
        self
    }

    pub fn with_border(mut self, border: TableCellBorder) -> Self {
        self.border_left = Some(border);
        self.border_right = Some(border);
        self.border_top = Some(border);
        self.border_bottom = Some(border);
        self
    }

    pub fn field_mask(&self) -> FieldMask {
        FieldMask::from_flags(&[
            ("backgroundColor", self.background_color.is_some()),
            ("paddingLeft", self.padding_left.is_some()),
            ("paddingRight", self.padding_right.is_some()),
            ("paddingTop", self.padding_top.is_some()),
            ("paddingBottom", self.padding_bottom.is_some()),
            ("borderLeft", self.border_left.is_some()),
            ("borderRight", self.border_right.is_some()),
            ("borderTop", self.border_top.is_some()),
            ("borderBottom", self.border_bottom.is_some()),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: Dimension,
    pub height: Dimension,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,
}

impl DocumentStyle {
    pub fn field_mask(&self) -> FieldMask {
        FieldMask::from_flags(&[
            ("marginTop", self.margin_top.is_some()),
            ("marginBottom", self.margin_bottom.is_some()),
            ("marginLeft", self.margin_left.is_some()),
            ("marginRight", self.margin_right.is_some()),
            ("pageSize", self.page_size.is_some()),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: u32,
    pub end_index: u32,
}

impl From<TextRange> for Range {
    fn from(range: TextRange) -> Self {
        Range {
            start_index: range.start,
            end_index: range.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellLocation {
    pub table_start_location: Location,
    pub row_index: u32,
    pub column_index: u32,
}

/// A single cell of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRange {
    pub table_cell_location: TableCellLocation,
    pub row_span: u32,
    pub column_span: u32,
}

/// One request of a `batchUpdate` call.
///
/// Build these through the constructors, which derive the field mask from the style
/// and refuse empty styles or empty ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StyleMutation {
    UpdateDocumentStyle {
        document_style: DocumentStyle,
        fields: FieldMask,
    },
    UpdateTextStyle {
        range: Range,
        text_style: TextStyle,
        fields: FieldMask,
    },
    UpdateParagraphStyle {
        range: Range,
        paragraph_style: ParagraphStyle,
        fields: FieldMask,
    },
    UpdateTableCellStyle {
        table_range: TableRange,
        table_cell_style: TableCellStyle,
        fields: FieldMask,
    },
    PinTableHeaderRows {
        table_start_location: Location,
        pinned_header_rows_count: u32,
    },
}

impl StyleMutation {
    pub fn document(style: DocumentStyle) -> Option<Self> {
        let fields = style.field_mask();
        (!fields.is_empty()).then_some(StyleMutation::UpdateDocumentStyle {
            document_style: style,
            fields,
        })
    }

    pub fn text(range: TextRange, style: TextStyle) -> Option<Self> {
        let fields = style.field_mask();
        (!fields.is_empty() && !range.is_empty()).then(|| StyleMutation::UpdateTextStyle {
            range: range.into(),
            text_style: style,
            fields,
        })
    }

    pub fn paragraph(range: TextRange, style: ParagraphStyle) -> Option<Self> {
        let fields = style.field_mask();
        (!fields.is_empty() && !range.is_empty()).then(|| StyleMutation::UpdateParagraphStyle {
            range: range.into(),
            paragraph_style: style,
            fields,
        })
    }

    pub fn table_cell(table_start: u32, row: u32, column: u32, style: TableCellStyle) -> Option<Self> {
        let fields = style.field_mask();
        (!fields.is_empty()).then(|| StyleMutation::UpdateTableCellStyle {
            table_range: TableRange {
                table_cell_location: TableCellLocation {
                    table_start_location: Location { index: table_start },
                    row_index: row,
                    column_index: column,
                },
                row_span: 1,
                column_span: 1,
            },
            table_cell_style: style,
            fields,
        })
    }

    pub fn pin_header_row(table_start: u32) -> Self {
        StyleMutation::PinTableHeaderRows {
            table_start_location: Location { index: table_start },
            pinned_header_rows_count: 1,
        }
    }

    /// The field mask carried by this mutation, if it has one.
    pub fn fields(&self) -> Option<&FieldMask> {
        match self {
            StyleMutation::UpdateDocumentStyle { fields, .. }
            | StyleMutation::UpdateTextStyle { fields, .. }
            | StyleMutation::UpdateParagraphStyle { fields, .. }
            | StyleMutation::UpdateTableCellStyle { fields, .. } => Some(fields),
            StyleMutation::PinTableHeaderRows { .. } => None,
        }
    }
}
