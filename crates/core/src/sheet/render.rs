//! Page text to sheet rows.
//!
//! Page `p` writes its text to cell `A<p>` and row `p` gets the highlight
//! style registered before the first row.

use super::{CellRef, FillStyle, RowRange, StyleId, TabularDocument, validate_sheet_name};
use crate::error::{PdfError, Result};
use crate::extract::PageText;

/// Column receiving page text.
pub const TEXT_COLUMN: u32 = 1;

/// Incrementally renders page text into a [`TabularDocument`].
#[derive(Debug)]
pub struct TabularRenderer {
    document: TabularDocument,
    sheet: String,
    style: StyleId,
    next_row: u32,
}

impl TabularRenderer {
    /// Create a renderer and register the highlight style with the sheet.
    pub fn new(sheet: &str, highlight: FillStyle) -> Result<Self> {
        validate_sheet_name(sheet)?;
        let mut document = TabularDocument::new();
        let style = document.register_style(highlight);
        Ok(Self {
            document,
            sheet: sheet.to_string(),
            style,
            next_row: 1,
        })
    }

    pub fn style(&self) -> StyleId {
        self.style
    }

    /// Render the next page. Pages must arrive in order starting at 1.
    pub fn push(&mut self, page: &PageText) -> Result<()> {
        if page.page != self.next_row as usize {
            return Err(PdfError::InvalidRow {
                expected: self.next_row,
                got: page.page,
            });
        }
        let row = self.next_row;
        self.document
            .set_cell_value(&self.sheet, CellRef::new(TEXT_COLUMN, row), page.text.as_str())?;
        self.document
            .apply_row_style(&self.sheet, RowRange::single(row), self.style)?;
        self.next_row += 1;
        Ok(())
    }

    pub fn finish(self) -> TabularDocument {
        self.document
    }
}

/// Render all pages of a document into a fresh [`TabularDocument`].
pub fn render_pages(pages: &[PageText], sheet: &str, highlight: FillStyle) -> Result<TabularDocument> {
    let mut renderer = TabularRenderer::new(sheet, highlight)?;
    for page in pages {
        renderer.push(page)?;
    }
    Ok(renderer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight() -> FillStyle {
        FillStyle::solid("1F497D").unwrap()
    }

    #[test]
    fn test_out_of_order_page_rejected() {
        let mut renderer = TabularRenderer::new("Sheet1", highlight()).unwrap();
        renderer.push(&PageText::new(1, "a")).unwrap();
        let err = renderer.push(&PageText::new(3, "c")).unwrap_err();
        assert!(matches!(err, PdfError::InvalidRow { expected: 2, got: 3 }));
    }

    #[test]
    fn test_style_registered_before_rows() {
        let renderer = TabularRenderer::new("Sheet1", highlight()).unwrap();
        let style = renderer.style();
        let doc = renderer.finish();
        assert_eq!(doc.styles().len(), 1);
        assert_eq!(doc.style(style), Some(&highlight()));
        assert!(doc.cells().is_empty());
    }
}
