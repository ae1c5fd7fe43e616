//! Behavioural tests of the reconciliation engine

use bomrec::layout::bom;
use bomrec::{
    normalize, reconcile, CellValue, ExtensionFamily, MatchStatus, ReconcileOptions, Row, Sheet,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SOURCE: &str = r"Z:\Disegni";
const TARGET: &str = r"C:\Tavole";

fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

fn db_sheet(records: &[[&str; 3]]) -> Sheet {
    let mut sheet = Sheet::new("DB");
    sheet.push_row(row(&["Descrizione", "Codice", "Configurazione", "Revisione"]));
    for &[code, config, rev] in records {
        sheet.push_row(row(&["desc", code, config, rev, "v1", "v2", "v3", "v4", "v5"]));
    }
    sheet
}

fn bom_sheet(parts: &[[&str; 3]]) -> Sheet {
    let mut sheet = Sheet::new("BOM");
    sheet.push_row(row(&["Pos", "Qta", "UM", "Tipo", "Codice", "Config", "Rev"]));
    for &[code, config, rev] in parts {
        sheet.push_row(row(&["_", "_", "_", "_", code, config, rev]));
    }
    sheet
}

fn options() -> ReconcileOptions {
    ReconcileOptions::new(SOURCE, TARGET)
}

#[test]
fn end_to_end_single_row() {
    let db = db_sheet(&[["BA1", "CFG1", "A"]]);
    let bom = bom_sheet(&[["BA1", "CFG1", "A"]]);
    // Code and configuration differ, so the stem is joined with `_`
    let listing = ["BA1_CFG1A.pdf", "BA1CFG1A.pdf"];

    let result = reconcile(&db, &bom, &listing, &options()).unwrap();
    let sheet = result.annotated();

    assert_eq!(sheet.get(1, bom::STATUS), &CellValue::from("OK"));
    assert_eq!(sheet.get(1, bom::NOTE), &CellValue::from(""));
    assert_eq!(sheet.get(1, bom::PDF), &CellValue::from("SI"));
    assert_eq!(sheet.get(1, bom::DWG), &CellValue::from("NO"));
    assert_eq!(sheet.get(1, bom::STEP), &CellValue::from("NO"));
    for (offset, expected) in ["v1", "v2", "v3", "v4", "v5"].iter().enumerate() {
        assert_eq!(sheet.get(1, 7 + offset), &CellValue::from(*expected));
    }

    let outcome = &result.outcomes()[0];
    assert_eq!(outcome.status, MatchStatus::Matched);
    assert!(!outcome.status.is_missing());
    assert_eq!(outcome.base_name, "BA1_CFG1A");
    assert_eq!(outcome.files(ExtensionFamily::Pdf), ["BA1_CFG1A.pdf".to_string()]);
    assert!(!outcome.has_file(ExtensionFamily::Dwg));

    let header: Vec<String> = sheet.rows()[0][12..17].iter().map(|c| c.to_text()).collect();
    assert_eq!(
        header,
        vec!["Stato DB", "Note", "File PDF", "File DWG", "File STEP"]
    );
}

#[test]
fn padded_revision_resolves_pdf() {
    let db = db_sheet(&[]);
    let bom = bom_sheet(&[["BA001218", "RP000005-", "1"]]);
    let listing = ["BA001218_RP000005-01.pdf"];

    let result = reconcile(&db, &bom, &listing, &options()).unwrap();
    assert_eq!(result.annotated().get(1, bom::PDF), &CellValue::from("SI"));
    assert_eq!(result.stats().files_found_details.pdf, 1);
}

#[test]
fn drawings_match_by_prefix() {
    let db = db_sheet(&[]);
    let bom = bom_sheet(&[["BA001218", "RP000005", "-01"]]);
    let listing = [
        "BA001218_RP000005-01 DISTINTA.dwg",
        "BA001218_RP000005-01.dwg",
        "BA001218_RP000005-02.dwg",
    ];

    let result = reconcile(&db, &bom, &listing, &options()).unwrap();
    assert_eq!(result.annotated().get(1, bom::DWG), &CellValue::from("SI"));
    assert_eq!(
        result.outcomes()[0].files(ExtensionFamily::Dwg),
        [
            "BA001218_RP000005-01 DISTINTA.dwg".to_string(),
            "BA001218_RP000005-01.dwg".to_string()
        ]
    );
    assert_eq!(result.stats().files_found_details.dwg, 2);
    assert_eq!(result.script().commands().len(), 2);
}

#[test]
fn step_family_accepts_both_suffixes() {
    let db = db_sheet(&[]);
    let bom = bom_sheet(&[["BA1", "BA1", "A"], ["BA2", "BA2", "A"]]);
    let listing = ["ba1a.STP", "BA2A.step"];

    let result = reconcile(&db, &bom, &listing, &options()).unwrap();
    assert_eq!(result.annotated().get(1, bom::STEP), &CellValue::from("SI"));
    assert_eq!(result.annotated().get(2, bom::STEP), &CellValue::from("SI"));
    assert_eq!(result.stats().files_found_details.stp, 2);

    let commands: Vec<&str> = result.script().commands().iter().collect();
    assert_eq!(
        commands,
        vec![
            r#"if exist "Z:\Disegni\ba1a.STP" copy "Z:\Disegni\ba1a.STP" "C:\Tavole\STEP\ba1a.STP" > nul"#,
            r#"if exist "Z:\Disegni\BA2A.step" copy "Z:\Disegni\BA2A.step" "C:\Tavole\STEP\BA2A.step" > nul"#,
        ]
    );
}

#[test]
fn shared_file_is_counted_once() {
    let db = db_sheet(&[["BA1", "BA1", "A"]]);
    let bom = bom_sheet(&[["BA1", "BA1", "A"], ["ba1 ", "BA1", "A"]]);
    let listing = ["BA1A.pdf", "BA1A.dwg"];

    let result = reconcile(&db, &bom, &listing, &options()).unwrap();
    let stats = result.stats();
    assert_eq!(stats.matches, 2);
    assert_eq!(stats.files_found, 2);
    assert_eq!(stats.files_found_details.pdf, 1);
    assert_eq!(stats.files_found_details.dwg, 1);
    assert_eq!(result.script().commands().len(), 2);
}

#[test]
fn duplicate_db_keys_last_row_wins() {
    let mut db = db_sheet(&[]);
    db.push_row(row(&["first", "BA1", "BA1", "A", "old"]));
    db.push_row(row(&["second", "BA1", "BA1", "A", "new"]));
    let bom = bom_sheet(&[["BA1", "BA1", "A"]]);

    let result = reconcile(&db, &bom, &[] as &[&str], &options()).unwrap();
    assert_eq!(result.annotated().get(1, 7), &CellValue::from("new"));
}

#[test]
fn script_is_identical_across_runs() {
    let db = db_sheet(&[["BA1", "BA1", "A"]]);
    let bom = bom_sheet(&[["BA2", "X", "1"], ["BA1", "BA1", "A"], ["BA2", "X", "1"]]);
    let listing = ["BA1A.pdf", "BA2_X01.pdf", "BA2_X1 TAV.dwg", "BA1A.stp"];

    let first = reconcile(&db, &bom, &listing, &options()).unwrap();
    let second = reconcile(&db, &bom, &listing, &options()).unwrap();
    assert_eq!(first.script().render(), second.script().render());

    // First occurrence order: row by row, PDF then DWG then STEP
    let names: Vec<&str> = first
        .script()
        .commands()
        .iter()
        .map(|c| c.rsplit('\\').next().unwrap_or(c))
        .collect();
    assert_eq!(
        names,
        vec!["BA2_X01.pdf\" > nul", "BA2_X1 TAV.dwg\" > nul", "BA1A.pdf\" > nul", "BA1A.stp\" > nul"]
    );
}

#[test]
fn missing_extract_keeps_only_missing_rows() {
    let db = db_sheet(&[["BA1", "BA1", "A"]]);
    let bom = bom_sheet(&[["BA1", "BA1", "A"], ["BA1", "BA1", "B"], ["ZZ", "ZZ", "A"]]);

    let result = reconcile(&db, &bom, &[] as &[&str], &options()).unwrap();
    let extract = result.missing_records().unwrap();
    assert_eq!(extract.row_count(), 3);
    assert_eq!(extract.get(1, bom::NOTE), &CellValue::from("verify revision"));
    assert_eq!(extract.get(2, bom::CODE), &CellValue::from("ZZ"));
}

#[test]
fn numeric_cells_join_with_text_cells() {
    let mut db = db_sheet(&[]);
    db.push_row(vec![
        "d".into(),
        CellValue::Number(1234.0),
        CellValue::Number(1234.0),
        CellValue::Number(1.0),
    ]);
    let bom = bom_sheet(&[["1234", "1234", "1"]]);

    let result = reconcile(&db, &bom, &[] as &[&str], &options()).unwrap();
    assert_eq!(result.stats().matches, 1);
}

fn code() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["BA1", "ba1", "BA2", " BA3 ", "", "  "]).prop_map(str::to_string)
}

fn revision() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "a", "B", "1", "01"]).prop_map(str::to_string)
}

proptest! {
    #[test]
    fn normalize_ignores_case_and_surrounding_whitespace(
        text in "[A-Za-z0-9_-]{0,12}",
        left in "[ \t]{0,3}",
        right in "[ \t\r\n]{0,3}",
    ) {
        let padded = format!("{}{}{}", left, text.to_lowercase(), right);
        prop_assert_eq!(
            normalize(&CellValue::from(text.as_str())),
            normalize(&CellValue::from(padded))
        );
    }

    #[test]
    fn every_keyed_row_gets_exactly_one_status(
        db_parts in prop::collection::vec((code(), code(), revision()), 0..6),
        bom_parts in prop::collection::vec((code(), code(), revision()), 0..12),
    ) {
        let mut db = db_sheet(&[]);
        for (c, cfg, rev) in &db_parts {
            db.push_row(row(&["d", c.as_str(), cfg.as_str(), rev.as_str()]));
        }
        let mut bom = bom_sheet(&[]);
        for (c, cfg, rev) in &bom_parts {
            bom.push_row(row(&["", "", "", "", c.as_str(), cfg.as_str(), rev.as_str()]));
        }

        let result = reconcile(&db, &bom, &[] as &[&str], &options()).unwrap();
        let stats = result.stats();
        let keyed = bom_parts.iter().filter(|(c, _, _)| !c.trim().is_empty()).count();

        prop_assert_eq!(stats.total_rows, keyed);
        prop_assert_eq!(stats.matches + stats.missing, stats.total_rows);
        prop_assert!(stats.revision_mismatch <= stats.missing);
        prop_assert_eq!(stats.skipped_rows, bom_parts.len() - keyed);
        prop_assert_eq!(result.outcomes().len(), keyed);
    }
}
