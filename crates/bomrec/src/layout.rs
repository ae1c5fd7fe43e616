//! Fixed column contract of the DB and BOM sheets.
//!
//! Column positions are 0-based and are part of the spreadsheet layout the
//! operators work with; they must not move.

/// Columns of the master DB sheet
pub mod db {
    /// Free-text description
    pub const DESCRIPTION: usize = 0;
    /// Item code
    pub const CODE: usize = 1;
    /// Configuration
    pub const CONFIG: usize = 2;
    /// Revision
    pub const REVISION: usize = 3;
    /// Payload columns copied into the BOM on a full match
    pub const PAYLOAD: [usize; 5] = [4, 5, 6, 7, 8];
    /// Rows shorter than this carry no key and are ignored
    pub const MIN_ROW_LEN: usize = 4;
}

/// Columns of the BOM sheet
pub mod bom {
    /// Item code
    pub const CODE: usize = 4;
    /// Configuration
    pub const CONFIG: usize = 5;
    /// Revision
    pub const REVISION: usize = 6;
    /// Targets of the DB payload columns
    pub const PAYLOAD: [usize; 5] = [7, 8, 9, 10, 11];
    /// DB status
    pub const STATUS: usize = 12;
    /// Note
    pub const NOTE: usize = 13;
    /// PDF found flag
    pub const PDF: usize = 14;
    /// DWG found flag
    pub const DWG: usize = 15;
    /// STEP found flag
    pub const STEP: usize = 16;
    /// Description copied from the DB (optional)
    pub const DESCRIPTION: usize = 17;
}

/// Status stamped on rows with a full-key match
pub const STATUS_OK: &str = "OK";
/// Status stamped on rows missing from the DB
pub const STATUS_MISSING: &str = "needs addition to DB";
/// Note stamped when code and configuration exist with another revision
pub const NOTE_CHECK_REVISION: &str = "verify revision";
/// File flag: found
pub const FLAG_FOUND: &str = "SI";
/// File flag: not found
pub const FLAG_NOT_FOUND: &str = "NO";

/// Worksheet name of every written output
pub const RESULT_SHEET: &str = "Risultato";

/// Number of leading columns kept by the 12-column export
pub const EXPORT_COLUMNS: usize = 12;

/// Header labels written over the annotation columns
const HEADER_LABELS: [(usize, &str); 5] = [
    (bom::STATUS, "Stato DB"),
    (bom::NOTE, "Note"),
    (bom::PDF, "File PDF"),
    (bom::DWG, "File DWG"),
    (bom::STEP, "File STEP"),
];

const DESCRIPTION_LABEL: &str = "Descrizione";

/// Resolved BOM layout for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BomLayout {
    /// Whether the description column (17) is part of the output
    pub with_description: bool,
}

impl BomLayout {
    /// Layout with or without the description column
    pub fn new(with_description: bool) -> Self {
        Self { with_description }
    }

    /// Minimum width every BOM row is widened to
    pub fn width(&self) -> usize {
        if self.with_description {
            bom::DESCRIPTION + 1
        } else {
            bom::STEP + 1
        }
    }

    /// Header labels for the annotation columns, in column order
    pub fn header_labels(&self) -> Vec<(usize, &'static str)> {
        let mut labels = HEADER_LABELS.to_vec();
        if self.with_description {
            labels.push((bom::DESCRIPTION, DESCRIPTION_LABEL));
        }
        labels
    }
}
