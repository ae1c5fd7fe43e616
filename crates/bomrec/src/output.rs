//! Derived outputs: the missing-records extract and output file names

use bomrec_core::Sheet;

use crate::layout::{bom, STATUS_MISSING};

const PROCESSED_PREFIX: &str = "PROCESSED_";
const MISSING_PREFIX: &str = "DA_AGGIUNGERE_";
const SCRIPT_PREFIX: &str = "COPIA_FILE_";

const SHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "csv"];

/// Header plus every row whose status says it must be added to the DB.
/// `None` when no row qualifies.
pub fn missing_records(annotated: &Sheet) -> Option<Sheet> {
    let header = annotated.header()?;

    let rows: Vec<_> = annotated
        .data_rows()
        .filter(|(_, row)| {
            row.get(bom::STATUS)
                .map_or(false, |status| status.as_string() == Some(STATUS_MISSING))
        })
        .map(|(_, row)| row.clone())
        .collect();

    if rows.is_empty() {
        return None;
    }

    let mut extract = Sheet::new(annotated.name());
    extract.push_row(header.clone());
    for row in rows {
        extract.push_row(row);
    }
    Some(extract)
}

/// File names of the three outputs of a run, derived from the BOM file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Annotated BOM
    pub processed: String,
    /// Missing-records extract
    pub missing: String,
    /// Copy script
    pub script: String,
}

impl OutputNames {
    /// Names for a BOM file name. Workbooks that are only read (`.xls`) or
    /// carry macros (`.xlsm`) get `.xlsx` outputs; the script is named after
    /// the stem.
    pub fn for_bom(bom_file_name: &str) -> Self {
        let (stem, extension) = split_sheet_extension(bom_file_name);
        let output = match extension {
            Some(ext) if ext.eq_ignore_ascii_case("xls") || ext.eq_ignore_ascii_case("xlsm") => {
                format!("{}.xlsx", stem)
            }
            _ => bom_file_name.to_string(),
        };

        Self {
            processed: format!("{}{}", PROCESSED_PREFIX, output),
            missing: format!("{}{}", MISSING_PREFIX, output),
            script: format!("{}{}.bat", SCRIPT_PREFIX, stem),
        }
    }
}

/// Split off a trailing spreadsheet extension, matched case-insensitively
fn split_sheet_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && SHEET_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) =>
        {
            (stem, Some(ext))
        }
        _ => (name, None),
    }
}
