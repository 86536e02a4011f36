//! Tests for the xlsx package writer, reading the archive back with `zip`.

use std::io::{Cursor, Read};

use pdfsheet_core::PdfError;
use pdfsheet_core::extract::PageText;
use pdfsheet_core::sheet::{CellRef, FillStyle, RowRange, SheetBuilder, render_pages};
use pdfsheet_core::xlsx::XlsxBuilder;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    let mut file = archive.by_name(name).expect("part present");
    let mut content = String::new();
    file.read_to_string(&mut content).expect("read part");
    content
}

fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    archive.file_names().map(str::to_string).collect()
}

fn two_page_workbook() -> Vec<u8> {
    let pages = vec![PageText::new(1, "Alpha"), PageText::new(2, "")];
    let doc = render_pages(&pages, "Sheet1", FillStyle::solid("1F497D").unwrap()).unwrap();
    doc.write_to(XlsxBuilder::new()).unwrap()
}

#[test]
fn test_package_parts() {
    let bytes = two_page_workbook();
    let mut names = part_names(&bytes);
    names.sort();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
        ]
    );
}

#[test]
fn test_worksheet_rows_and_styles() {
    let bytes = two_page_workbook();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    insta::assert_snapshot!(sheet, @r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData><row r="1" s="1" customFormat="1"><c r="A1" s="1" t="inlineStr"><is><t xml:space="preserve">Alpha</t></is></c></row><row r="2" s="1" customFormat="1"><c r="A2" s="1" t="inlineStr"><is><t xml:space="preserve"></t></is></c></row></sheetData></worksheet>"#);
}

#[test]
fn test_styles_part_carries_highlight_fill() {
    let bytes = two_page_workbook();
    let styles = read_part(&bytes, "xl/styles.xml");
    assert!(styles.contains(r#"<patternFill patternType="solid"><fgColor rgb="FF1F497D"/>"#));
    assert!(styles.contains(r#"<cellXfs count="2">"#));
}

#[test]
fn test_workbook_names_sheet() {
    let pages = vec![PageText::new(1, "x")];
    let doc = render_pages(&pages, "R&D", FillStyle::solid("FFFF00").unwrap()).unwrap();
    let mut builder = XlsxBuilder::new();
    builder.add_sheet("R&D").unwrap();
    let bytes = doc.write_to(builder).unwrap();

    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"<sheet name="R&amp;D" sheetId="1" r:id="rId1"/>"#));
}

#[test]
fn test_cell_text_is_escaped() {
    let mut builder = XlsxBuilder::new();
    builder
        .set_cell_value("Sheet1", CellRef::new(1, 1), "a < b & \"c\"\u{1}")
        .unwrap();
    let bytes = builder.finish().unwrap();

    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("a &lt; b &amp; &quot;c&quot;_x0001_"));
}

#[test]
fn test_empty_workbook_has_default_sheet() {
    let bytes = XlsxBuilder::new().finish().unwrap();

    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"<sheet name="Sheet1" sheetId="1" r:id="rId1"/>"#));
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.ends_with("<sheetData/></worksheet>"));
}

#[test]
fn test_styled_rows_without_cells() {
    let mut builder = XlsxBuilder::new();
    let style = builder.register_style(&FillStyle::solid("00FF00").unwrap()).unwrap();
    builder
        .apply_row_style("Sheet1", RowRange { first: 2, last: 3 }, style)
        .unwrap();
    let bytes = builder.finish().unwrap();

    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="2" s="1" customFormat="1"></row><row r="3" s="1" customFormat="1"></row>"#));
}

#[test]
fn test_multiple_sheets_keep_first_use_order() {
    let mut builder = XlsxBuilder::new();
    builder.set_cell_value("Zeta", CellRef::new(1, 1), "z").unwrap();
    builder.set_cell_value("Alpha", CellRef::new(2, 5), "a").unwrap();
    let bytes = builder.finish().unwrap();

    let workbook = read_part(&bytes, "xl/workbook.xml");
    let zeta = workbook.find("Zeta").unwrap();
    let alpha = workbook.find("Alpha").unwrap();
    assert!(zeta < alpha);

    let second = read_part(&bytes, "xl/worksheets/sheet2.xml");
    assert!(second.contains(r#"<row r="5"><c r="B5" t="inlineStr">"#));

    let rels = read_part(&bytes, "xl/_rels/workbook.xml.rels");
    assert!(rels.contains(r#"Id="rId3""#));
    assert!(rels.contains("styles.xml"));
}

#[test]
fn test_zero_based_cell_rejected() {
    let mut builder = XlsxBuilder::new();
    let err = builder
        .set_cell_value("Sheet1", CellRef::new(0, 1), "x")
        .unwrap_err();
    assert!(matches!(err, PdfError::Serialization(_)));
}

#[test]
fn test_output_is_byte_identical() {
    assert_eq!(two_page_workbook(), two_page_workbook());
}
