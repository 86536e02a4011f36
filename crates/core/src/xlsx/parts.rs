//! Generators for the XML parts of a minimal workbook package.

use super::escape::escape_xml;
use crate::sheet::{CellRef, FillStyle, StyleId};
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const RT_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const RT_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Cells and row styles of one worksheet.
#[derive(Debug, Default)]
pub(crate) struct SheetData {
    /// Ordered by row, then column
    pub cells: BTreeMap<CellRef, String>,
    pub row_styles: BTreeMap<u32, StyleId>,
}

pub(crate) fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<Types xmlns="{NS_CONTENT_TYPES}"><Default Extension="rels" ContentType="{CT_RELS}"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="{CT_WORKBOOK}"/><Override PartName="/xl/styles.xml" ContentType="{CT_STYLES}"/>"#
    );
    for n in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="{CT_WORKSHEET}"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

pub(crate) fn root_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PKG_REL}"><Relationship Id="rId1" Type="{RT_OFFICE_DOCUMENT}" Target="xl/workbook.xml"/></Relationships>"#
    )
}

pub(crate) fn workbook_xml<'a>(sheet_names: impl Iterator<Item = &'a str>) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheets>"#);
    for (i, name) in sheet_names.enumerate() {
        let n = i + 1;
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape_xml(name)
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}

/// Sheets take rId1..rIdN, styles take rId(N+1).
pub(crate) fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{NS_PKG_REL}">"#);
    for n in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{n}" Type="{RT_WORKSHEET}" Target="worksheets/sheet{n}.xml"/>"#
        );
    }
    let _ = write!(
        xml,
        r#"<Relationship Id="rId{}" Type="{RT_STYLES}" Target="styles.xml"/></Relationships>"#,
        sheet_count + 1
    );
    xml
}

/// Fill 0 and 1 are the reserved `none` and `gray125` patterns; cell
/// format 0 is the default. Registered fill `i` becomes fill `i + 2`
/// and cell format `i + 1`.
pub(crate) fn styles_xml(fills: &[FillStyle]) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<styleSheet xmlns="{NS_MAIN}"><fonts count="1"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts>"#
    );
    let _ = write!(
        xml,
        r#"<fills count="{}"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill>"#,
        fills.len() + 2
    );
    for fill in fills {
        let _ = write!(
            xml,
            r#"<fill><patternFill patternType="solid"><fgColor rgb="{}"/><bgColor indexed="64"/></patternFill></fill>"#,
            fill.argb()
        );
    }
    xml.push_str("</fills>");
    xml.push_str(r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);
    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
    let _ = write!(
        xml,
        r#"<cellXfs count="{}"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
        fills.len() + 1
    );
    for i in 0..fills.len() {
        let _ = write!(
            xml,
            r#"<xf numFmtId="0" fontId="0" fillId="{}" borderId="0" xfId="0" applyFill="1"/>"#,
            i + 2
        );
    }
    xml.push_str("</cellXfs>");
    xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#);
    xml
}

/// Worksheet part. Every row holding a cell or a row style gets a `<row>`
/// element; cells in a styled row carry the row's style.
pub(crate) fn worksheet_xml(sheet: &SheetData) -> String {
    let mut xml = String::with_capacity(256 + sheet.cells.len() * 64);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<worksheet xmlns="{NS_MAIN}" xmlns:r="{NS_REL}">"#);

    let mut rows: Vec<u32> = sheet
        .cells
        .keys()
        .map(|cell| cell.row)
        .chain(sheet.row_styles.keys().copied())
        .collect();
    rows.sort_unstable();
    rows.dedup();

    if rows.is_empty() {
        xml.push_str("<sheetData/></worksheet>");
        return xml;
    }

    xml.push_str("<sheetData>");
    for row in rows {
        let style = sheet.row_styles.get(&row).copied();
        match style {
            Some(s) => {
                let _ = write!(xml, r#"<row r="{row}" s="{s}" customFormat="1">"#);
            }
            None => {
                let _ = write!(xml, r#"<row r="{row}">"#);
            }
        }
        let start = CellRef::new(1, row);
        let end = CellRef::new(u32::MAX, row);
        for (cell, value) in sheet.cells.range(start..=end) {
            let style_attr = style.map(|s| format!(r#" s="{s}""#)).unwrap_or_default();
            let _ = write!(
                xml,
                r#"<c r="{cell}"{style_attr} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                escape_xml(value)
            );
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}
