//! CSV write -> read tests

use bomrec_core::{CellValue, Sheet};
use bomrec_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, LineTerminator};
use pretty_assertions::assert_eq;

#[test]
fn test_write_pads_to_sheet_width_with_crlf() {
    let sheet = Sheet::from_rows(
        "S",
        vec![
            vec!["Codice".into(), "Stato DB".into()],
            vec!["BA1".into()],
        ],
    );

    let mut out = Vec::new();
    CsvWriter::write(&sheet, &mut out, &CsvWriteOptions::default()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Codice,Stato DB\r\nBA1,\r\n");
}

#[test]
fn test_quotes_fields_with_delimiters() {
    let sheet = Sheet::from_rows("S", vec![vec!["a,b".into(), 1.5.into()]]);
    let options = CsvWriteOptions {
        line_terminator: LineTerminator::LF,
        ..Default::default()
    };

    let mut out = Vec::new();
    CsvWriter::write(&sheet, &mut out, &options).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\"a,b\",1.5\n");
}

#[test]
fn test_file_roundtrip_names_sheet_after_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("distinta.csv");
    let sheet = Sheet::from_rows(
        "S",
        vec![
            vec!["Codice".into(), "Rev".into()],
            vec!["BA001218".into(), "01".into()],
        ],
    );

    CsvWriter::write_file(&sheet, &path, &CsvWriteOptions::default()).unwrap();
    let back = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

    assert_eq!(back.name(), "distinta");
    assert_eq!(back.get(1, 1), &CellValue::from("01"));
    assert_eq!(back.row_count(), 2);
}
