//! Request-scoped tabular document.

use super::{CellRef, FillStyle, RowRange, SheetBuilder, StyleId, validate_sheet_name};
use crate::error::{PdfError, Result};

/// A cell value placed on a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEntry {
    pub sheet: String,
    pub cell: CellRef,
    pub value: String,
}

/// A style applied to a range of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStyle {
    pub sheet: String,
    pub rows: RowRange,
    pub style: StyleId,
}

/// Accumulated cells, styles and row-style assignments.
///
/// Built completely by one producer, then handed to an artifact writer
/// through [`TabularDocument::write_to`]. Style ids are local to the
/// document: the n-th registered style has id n.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularDocument {
    styles: Vec<FillStyle>,
    cells: Vec<CellEntry>,
    row_styles: Vec<RowStyle>,
}

impl TabularDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_style(&mut self, style: FillStyle) -> StyleId {
        self.styles.push(style);
        StyleId((self.styles.len() - 1) as u32)
    }

    pub fn set_cell_value(&mut self, sheet: &str, cell: CellRef, value: impl Into<String>) -> Result<()> {
        validate_sheet_name(sheet)?;
        let value = value.into();
        // A cell written twice keeps the last value
        match self
            .cells
            .iter_mut()
            .find(|entry| entry.sheet == sheet && entry.cell == cell)
        {
            Some(entry) => entry.value = value,
            None => self.cells.push(CellEntry {
                sheet: sheet.to_string(),
                cell,
                value,
            }),
        }
        Ok(())
    }

    pub fn apply_row_style(&mut self, sheet: &str, rows: RowRange, style: StyleId) -> Result<()> {
        validate_sheet_name(sheet)?;
        if self.style(style).is_none() {
            return Err(PdfError::UnknownStyle(style.0));
        }
        self.row_styles.push(RowStyle {
            sheet: sheet.to_string(),
            rows,
            style,
        });
        Ok(())
    }

    pub fn style(&self, id: StyleId) -> Option<&FillStyle> {
        self.styles.get(id.0 as usize)
    }

    pub fn styles(&self) -> &[FillStyle] {
        &self.styles
    }

    pub fn cells(&self) -> &[CellEntry] {
        &self.cells
    }

    pub fn row_styles(&self) -> &[RowStyle] {
        &self.row_styles
    }

    /// Value of a cell, if set.
    pub fn cell(&self, sheet: &str, cell: CellRef) -> Option<&str> {
        self.cells
            .iter()
            .find(|entry| entry.sheet == sheet && entry.cell == cell)
            .map(|entry| entry.value.as_str())
    }

    /// Style of a row; the last assignment covering the row wins.
    pub fn row_style(&self, sheet: &str, row: u32) -> Option<StyleId> {
        self.row_styles
            .iter()
            .rev()
            .find(|rs| rs.sheet == sheet && rs.rows.contains(row))
            .map(|rs| rs.style)
    }

    /// Replay the document into a builder and serialize it.
    pub fn write_to<B: SheetBuilder>(&self, mut builder: B) -> Result<Vec<u8>> {
        let mut ids = Vec::with_capacity(self.styles.len());
        for style in &self.styles {
            ids.push(builder.register_style(style)?);
        }
        for entry in &self.cells {
            builder.set_cell_value(&entry.sheet, entry.cell, &entry.value)?;
        }
        for rs in &self.row_styles {
            let id = ids
                .get(rs.style.0 as usize)
                .copied()
                .ok_or(PdfError::UnknownStyle(rs.style.0))?;
            builder.apply_row_style(&rs.sheet, rs.rows, id)?;
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_overwrite_keeps_last_value() {
        let mut doc = TabularDocument::new();
        doc.set_cell_value("Sheet1", CellRef::new(1, 1), "a").unwrap();
        doc.set_cell_value("Sheet1", CellRef::new(1, 1), "b").unwrap();
        assert_eq!(doc.cells().len(), 1);
        assert_eq!(doc.cell("Sheet1", CellRef::new(1, 1)), Some("b"));
    }

    #[test]
    fn test_unknown_style_rejected() {
        let mut doc = TabularDocument::new();
        let err = doc
            .apply_row_style("Sheet1", RowRange::single(1), StyleId(0))
            .unwrap_err();
        assert!(matches!(err, PdfError::UnknownStyle(0)));
    }
}
