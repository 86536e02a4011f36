use pdfsheet_core::PdfError;
use pdfsheet_core::extract::PageText;
use pdfsheet_core::sheet::{CellRef, FillStyle, RowRange, StyleId, TabularDocument, render_pages};

fn highlight() -> FillStyle {
    FillStyle::solid("#1f497d").unwrap()
}

#[test]
fn test_one_row_per_page() {
    let pages = vec![
        PageText::new(1, "Alpha"),
        PageText::new(2, ""),
        PageText::new(3, "Gamma"),
    ];
    let doc = render_pages(&pages, "Sheet1", highlight()).unwrap();

    assert_eq!(doc.cells().len(), 3);
    assert_eq!(doc.cell("Sheet1", CellRef::new(1, 1)), Some("Alpha"));
    assert_eq!(doc.cell("Sheet1", CellRef::new(1, 2)), Some(""));
    assert_eq!(doc.cell("Sheet1", CellRef::new(1, 3)), Some("Gamma"));
    assert_eq!(doc.cell("Sheet1", CellRef::new(2, 1)), None);
    assert_eq!(doc.cell("Sheet1", CellRef::new(1, 4)), None);
}

#[test]
fn test_every_populated_row_highlighted() {
    let pages = vec![PageText::new(1, "a"), PageText::new(2, "")];
    let doc = render_pages(&pages, "Sheet1", highlight()).unwrap();

    assert_eq!(doc.styles(), &[highlight()]);
    let style = StyleId(0);
    assert_eq!(doc.row_style("Sheet1", 1), Some(style));
    assert_eq!(doc.row_style("Sheet1", 2), Some(style));
    assert_eq!(doc.row_style("Sheet1", 3), None);
    assert_eq!(doc.style(style).map(FillStyle::color), Some("1F497D"));
}

#[test]
fn test_no_pages_yields_empty_document_with_style() {
    let doc = render_pages(&[], "Sheet1", highlight()).unwrap();
    assert!(doc.cells().is_empty());
    assert!(doc.row_styles().is_empty());
    assert_eq!(doc.styles().len(), 1);
}

#[test]
fn test_custom_sheet_name() {
    let doc = render_pages(&[PageText::new(1, "x")], "Report 2024", highlight()).unwrap();
    assert_eq!(doc.cells()[0].sheet, "Report 2024");
    assert_eq!(doc.row_styles()[0].sheet, "Report 2024");
}

#[test]
fn test_invalid_sheet_name_rejected() {
    for name in ["", "a/b", "[x]", "'quoted'", "this name is far too long for a sheet"] {
        let err = render_pages(&[], name, highlight()).unwrap_err();
        assert!(matches!(err, PdfError::InvalidSheetName(_)), "{name:?}");
    }
}

#[test]
fn test_pages_must_start_at_one() {
    let err = render_pages(&[PageText::new(2, "b")], "Sheet1", highlight()).unwrap_err();
    assert!(matches!(err, PdfError::InvalidRow { expected: 1, got: 2 }));
}

#[test]
fn test_rendering_is_deterministic() {
    let pages: Vec<PageText> = (1..=20)
        .map(|p| PageText::new(p, format!("page {p}")))
        .collect();
    let first = render_pages(&pages, "Sheet1", highlight()).unwrap();
    let second = render_pages(&pages, "Sheet1", highlight()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_document_rejects_unknown_style() {
    let mut doc = TabularDocument::new();
    let err = doc
        .apply_row_style("Sheet1", RowRange::single(1), StyleId(0))
        .unwrap_err();
    assert!(matches!(err, PdfError::UnknownStyle(0)));
}

#[test]
fn test_fill_style_validation() {
    assert_eq!(FillStyle::solid("00ff7f").unwrap().argb(), "FF00FF7F");
    assert!(matches!(FillStyle::solid("blue"), Err(PdfError::InvalidColor(_))));
    assert!(FillStyle::solid("#12345").is_err());
    assert!(FillStyle::solid("GGGGGG").is_err());
}
