//! Tabular document model and the sheet builder seam.
//!
//! - `tabular`: request-scoped record of cells, styles and row styles
//! - `render`: maps page text onto rows of a sheet

pub mod render;
pub mod tabular;

use crate::error::{PdfError, Result};
use std::fmt;

pub use render::{TabularRenderer, render_pages};
pub use tabular::{CellEntry, RowStyle, TabularDocument};

/// Maximum sheet name length accepted by spreadsheet applications.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Identifier of a style registered with a [`SheetBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub u32);

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A solid pattern fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FillStyle {
    /// Upper-case RRGGBB
    color: String,
}

impl FillStyle {
    /// Solid fill of the given colour, written `RRGGBB` or `#RRGGBB`.
    pub fn solid(color: &str) -> Result<Self> {
        let hex = color.strip_prefix('#').unwrap_or(color);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PdfError::InvalidColor(color.to_string()));
        }
        Ok(Self {
            color: hex.to_ascii_uppercase(),
        })
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Colour as an ARGB string with an opaque alpha channel.
    pub fn argb(&self) -> String {
        format!("FF{}", self.color)
    }
}

/// A cell location; both column and row are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub column: u32,
}

impl CellRef {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { row, column }
    }

    /// Column letters, e.g. 1 -> "A", 27 -> "AA".
    pub fn column_name(&self) -> String {
        let mut n = self.column;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_name(), self.row)
    }
}

/// Inclusive range of 1-based rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    pub first: u32,
    pub last: u32,
}

impl RowRange {
    pub const fn single(row: u32) -> Self {
        Self {
            first: row,
            last: row,
        }
    }

    pub fn contains(&self, row: u32) -> bool {
        (self.first..=self.last).contains(&row)
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.first..=self.last
    }
}

/// Spreadsheet construction capability.
///
/// Implemented by artifact writers; a [`TabularDocument`] replays itself
/// into a builder with [`TabularDocument::write_to`].
pub trait SheetBuilder {
    /// Register a named style and return its id.
    fn register_style(&mut self, style: &FillStyle) -> Result<StyleId>;

    /// Set the value of a cell, creating the sheet on first use.
    fn set_cell_value(&mut self, sheet: &str, cell: CellRef, value: &str) -> Result<()>;

    /// Apply a registered style to a range of rows.
    fn apply_row_style(&mut self, sheet: &str, rows: RowRange, style: StyleId) -> Result<()>;

    /// Serialize everything built so far.
    fn finish(self) -> Result<Vec<u8>>;
}

/// Check a sheet name against spreadsheet naming rules.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.chars().count() > MAX_SHEET_NAME_LEN
        || name.starts_with('\'')
        || name.ends_with('\'')
        || name
            .chars()
            .any(|c| matches!(c, ':' | '\\' | '/' | '?' | '*' | '[' | ']'));
    if invalid {
        return Err(PdfError::InvalidSheetName(name.to_string()));
    }
    Ok(())
}
