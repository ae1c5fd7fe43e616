//! End-to-end tests for sheet roundtrip (build -> write -> read -> verify)

use std::io::{Cursor, Read};

use bomrec_core::{CellValue, Sheet};
use bomrec_xlsx::{WriteOptions, XlsxError, XlsxReader, XlsxWriter};
use pretty_assertions::assert_eq;

fn bom_like_sheet() -> Sheet {
    Sheet::from_rows(
        "Risultato",
        vec![
            vec!["Pos".into(), "Codice".into(), "Rev".into()],
            vec![1.into(), "BA001218".into(), "A".into()],
            vec![2.into(), "Special: <>&\"'".into(), CellValue::Empty, true.into()],
        ],
    )
}

fn sheet_xml(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name("xl/worksheets/sheet1.xml").unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_roundtrip_values() {
    let sheet = bom_like_sheet();
    let bytes = XlsxWriter::to_bytes(&sheet, &WriteOptions::default()).unwrap();
    let back = XlsxReader::read_bytes(&bytes).unwrap();

    assert_eq!(back.name(), "Risultato");
    assert_eq!(back.get(0, 1), &CellValue::from("Codice"));
    assert_eq!(back.get(1, 0), &CellValue::Number(1.0));
    assert_eq!(back.get(1, 1), &CellValue::from("BA001218"));
    assert_eq!(back.get(2, 1), &CellValue::from("Special: <>&\"'"));
    assert_eq!(back.get(2, 2), &CellValue::Empty);
    assert_eq!(back.get(2, 3), &CellValue::Boolean(true));
}

#[test]
fn test_preserves_surrounding_whitespace() {
    let sheet = Sheet::from_rows("S", vec![vec!["  BA1 ".into()]]);
    let bytes = XlsxWriter::to_bytes(&sheet, &WriteOptions::default()).unwrap();
    let back = XlsxReader::read_bytes(&bytes).unwrap();
    assert_eq!(back.get(0, 0), &CellValue::from("  BA1 "));
}

#[test]
fn test_truncation_drops_extra_columns() {
    let mut sheet = Sheet::new("S");
    for col in 0..18 {
        sheet.set(0, col, format!("H{}", col));
        sheet.set(1, col, format!("V{}", col));
    }

    let options = WriteOptions::styled().with_max_columns(12);
    let bytes = XlsxWriter::to_bytes(&sheet, &options).unwrap();
    let back = XlsxReader::read_bytes(&bytes).unwrap();

    assert_eq!(back.width(), 12);
    assert_eq!(back.get(1, 11), &CellValue::from("V11"));
    assert_eq!(back.get(1, 12), &CellValue::Empty);
}

#[test]
fn test_styled_header_has_autofilter_and_frozen_pane() {
    let bytes = XlsxWriter::to_bytes(&bom_like_sheet(), &WriteOptions::styled()).unwrap();
    let xml = sheet_xml(&bytes);

    assert!(xml.contains(r#"<autoFilter ref="A1:D3"/>"#));
    assert!(xml.contains(r#"state="frozen""#));
    // Header cells carry the header format, including the blank D1
    assert!(xml.contains(r#"<c r="A1" s="1" t="inlineStr">"#));
    assert!(xml.contains(r#"<c r="D1" s="1"/>"#));
    // Data cells do not
    assert!(xml.contains(r#"<c r="B2" t="inlineStr">"#));
}

#[test]
fn test_plain_output_has_no_autofilter() {
    let bytes = XlsxWriter::to_bytes(&bom_like_sheet(), &WriteOptions::default()).unwrap();
    let xml = sheet_xml(&bytes);
    assert!(!xml.contains("autoFilter"));
    assert!(!xml.contains(" s=\"1\""));
}

#[test]
fn test_write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");

    XlsxWriter::write_file(&bom_like_sheet(), &path, &WriteOptions::styled()).unwrap();
    let back = XlsxReader::read_file(&path).unwrap();
    assert_eq!(back.row_count(), 3);
}

#[test]
fn test_zip_without_content_types_is_invalid() {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut cursor);
        zip.start_file("hello.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut zip, b"hi").unwrap();
        zip.finish().unwrap();
    }

    let err = XlsxReader::read_bytes(cursor.get_ref()).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)));
}
