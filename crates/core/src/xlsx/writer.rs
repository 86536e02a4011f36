//! Workbook builder writing an xlsx package into memory.

use super::parts::{self, SheetData};
use crate::error::{PdfError, Result};
use crate::sheet::{CellRef, FillStyle, RowRange, SheetBuilder, StyleId, validate_sheet_name};
use indexmap::IndexMap;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Name of the sheet created when nothing else was added.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Rows in a worksheet.
pub const MAX_ROWS: u32 = 1_048_576;
/// Columns in a worksheet.
pub const MAX_COLUMNS: u32 = 16_384;
/// Characters a cell can hold; longer text is truncated.
pub const MAX_CELL_CHARS: usize = 32_767;

/// [`SheetBuilder`] producing xlsx bytes.
///
/// Sheets appear in the workbook in the order they were first used.
/// Output is deterministic: no timestamps are embedded and every zip entry
/// carries the fixed DOS epoch as its modification time.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    fills: Vec<FillStyle>,
    sheets: IndexMap<String, SheetData>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty sheet unless it already exists.
    pub fn add_sheet(&mut self, name: &str) -> Result<()> {
        self.sheet_mut(name).map(|_| ())
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut SheetData> {
        if !self.sheets.contains_key(name) {
            validate_sheet_name(name)?;
            let lower = name.to_lowercase();
            if self.sheets.keys().any(|existing| existing.to_lowercase() == lower) {
                return Err(PdfError::InvalidSheetName(name.to_string()));
            }
        }
        Ok(self.sheets.entry(name.to_string()).or_default())
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
    }

    fn add_file<W: Write + std::io::Seek>(zip: &mut ZipWriter<W>, path: &str, content: &str) -> Result<()> {
        zip.start_file(path, Self::options())?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl SheetBuilder for XlsxBuilder {
    fn register_style(&mut self, style: &FillStyle) -> Result<StyleId> {
        self.fills.push(style.clone());
        // Cell format 0 is the default format
        Ok(StyleId(self.fills.len() as u32))
    }

    fn set_cell_value(&mut self, sheet: &str, cell: CellRef, value: &str) -> Result<()> {
        if cell.row == 0 || cell.column == 0 || cell.row > MAX_ROWS || cell.column > MAX_COLUMNS {
            return Err(PdfError::Serialization(format!(
                "cell ({}, {}) outside the sheet",
                cell.column, cell.row
            )));
        }
        let value = match value.char_indices().nth(MAX_CELL_CHARS) {
            Some((end, _)) => {
                tracing::warn!(
                    sheet,
                    %cell,
                    chars = value.chars().count(),
                    "cell text truncated to {MAX_CELL_CHARS} characters"
                );
                &value[..end]
            }
            None => value,
        };
        self.sheet_mut(sheet)?.cells.insert(cell, value.to_string());
        Ok(())
    }

    fn apply_row_style(&mut self, sheet: &str, rows: RowRange, style: StyleId) -> Result<()> {
        if style.0 == 0 || style.0 as usize > self.fills.len() {
            return Err(PdfError::UnknownStyle(style.0));
        }
        if rows.first == 0 || rows.first > rows.last || rows.last > MAX_ROWS {
            return Err(PdfError::Serialization(format!(
                "invalid row range {}..={}",
                rows.first, rows.last
            )));
        }
        let data = self.sheet_mut(sheet)?;
        for row in rows.rows() {
            data.row_styles.insert(row, style);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.sheets.is_empty() {
            self.add_sheet(DEFAULT_SHEET_NAME)?;
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let count = self.sheets.len();
        Self::add_file(&mut zip, "[Content_Types].xml", &parts::content_types_xml(count))?;
        Self::add_file(&mut zip, "_rels/.rels", &parts::root_rels_xml())?;
        Self::add_file(
            &mut zip,
            "xl/workbook.xml",
            &parts::workbook_xml(self.sheets.keys().map(String::as_str)),
        )?;
        Self::add_file(&mut zip, "xl/_rels/workbook.xml.rels", &parts::workbook_rels_xml(count))?;
        Self::add_file(&mut zip, "xl/styles.xml", &parts::styles_xml(&self.fills))?;
        for (i, sheet) in self.sheets.values().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            Self::add_file(&mut zip, &path, &parts::worksheet_xml(sheet))?;
        }

        let cursor = zip.finish()?;
        tracing::debug!(sheets = count, bytes = cursor.get_ref().len(), "workbook serialized");
        Ok(cursor.into_inner())
    }
}
