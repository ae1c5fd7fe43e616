//! BOM vs DB reconciliation

use bomrec_core::{CellValue, Sheet};

use crate::db_index::DbIndex;
use crate::error::{ReconcileError, ReconcileResult};
use crate::filename::PartName;
use crate::inventory::{ExtensionFamily, FileInventory};
use crate::layout::{self, bom, db, BomLayout};
use crate::matcher::FileMatcher;
use crate::normalize::RecordKey;
use crate::output;
use crate::script::CopyScript;
use crate::stats::ReconcileStats;

/// Destination root used when the operator has not chosen one
pub const DEFAULT_TARGET_PATH: &str = r"C:\Tavole";

/// Outcome of the key join for one keyed BOM row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Full key present in the DB
    Matched,
    /// Code and configuration known, revision not
    MissingKnownPartial,
    /// Neither the full nor the partial key is known
    MissingUnknown,
}

impl MatchStatus {
    fn resolve(index: &DbIndex<'_>, key: &RecordKey) -> Self {
        if index.get(key).is_some() {
            MatchStatus::Matched
        } else if index.has_partial(key) {
            MatchStatus::MissingKnownPartial
        } else {
            MatchStatus::MissingUnknown
        }
    }

    /// Text stamped in the status column
    pub fn status_text(&self) -> &'static str {
        match self {
            MatchStatus::Matched => layout::STATUS_OK,
            MatchStatus::MissingKnownPartial | MatchStatus::MissingUnknown => {
                layout::STATUS_MISSING
            }
        }
    }

    /// Text stamped in the note column
    pub fn note_text(&self) -> &'static str {
        match self {
            MatchStatus::MissingKnownPartial => layout::NOTE_CHECK_REVISION,
            MatchStatus::Matched | MatchStatus::MissingUnknown => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        !matches!(self, MatchStatus::Matched)
    }
}

/// Per-row result kept alongside the annotated sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    /// Row index in the BOM sheet (header is row 0)
    pub row: usize,
    pub status: MatchStatus,
    /// Derived base file name, empty when lookups were disabled
    pub base_name: String,
    pdf: Vec<String>,
    dwg: Vec<String>,
    step: Vec<String>,
}

impl RowOutcome {
    /// Real file names found for a family
    pub fn files(&self, family: ExtensionFamily) -> &[String] {
        match family {
            ExtensionFamily::Pdf => &self.pdf,
            ExtensionFamily::Dwg => &self.dwg,
            ExtensionFamily::Step => &self.step,
        }
    }

    pub fn has_file(&self, family: ExtensionFamily) -> bool {
        !self.files(family).is_empty()
    }

    fn files_mut(&mut self, family: ExtensionFamily) -> &mut Vec<String> {
        match family {
            ExtensionFamily::Pdf => &mut self.pdf,
            ExtensionFamily::Dwg => &mut self.dwg,
            ExtensionFamily::Step => &mut self.step,
        }
    }
}

/// Inputs of a run other than the sheets themselves
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Folder the file listing was taken from
    pub source_path: String,
    /// Root of the PDF/DWG/STEP destination folders
    pub target_path: String,
    /// Copy the DB description into an extra BOM column
    pub with_description: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            target_path: DEFAULT_TARGET_PATH.to_string(),
            with_description: false,
        }
    }
}

impl ReconcileOptions {
    pub fn new(source_path: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, enabled: bool) -> Self {
        self.with_description = enabled;
        self
    }
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct Reconciliation {
    annotated: Sheet,
    stats: ReconcileStats,
    script: CopyScript,
    outcomes: Vec<RowOutcome>,
}

impl Reconciliation {
    /// The BOM, widened and stamped
    pub fn annotated(&self) -> &Sheet {
        &self.annotated
    }

    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }

    pub fn script(&self) -> &CopyScript {
        &self.script
    }

    /// One entry per keyed BOM row, in row order
    pub fn outcomes(&self) -> &[RowOutcome] {
        &self.outcomes
    }

    /// Header plus the rows that still need to be added to the DB
    pub fn missing_records(&self) -> Option<Sheet> {
        output::missing_records(&self.annotated)
    }
}

/// Column holding the found flag of a family
fn flag_column(family: ExtensionFamily) -> usize {
    match family {
        ExtensionFamily::Pdf => bom::PDF,
        ExtensionFamily::Dwg => bom::DWG,
        ExtensionFamily::Step => bom::STEP,
    }
}

fn check_inputs<S: AsRef<str>>(
    db: &Sheet,
    bom: &Sheet,
    listing: &[S],
    options: &ReconcileOptions,
) -> ReconcileResult<()> {
    if db.is_empty() {
        return Err(ReconcileError::EmptyDatabase);
    }
    if bom.is_empty() {
        return Err(ReconcileError::EmptyBom);
    }
    if !listing.is_empty() && options.source_path.trim().is_empty() {
        return Err(ReconcileError::MissingSourcePath);
    }
    Ok(())
}

/// Reconcile `bom` against `db`, looking the derived file names up in `listing`.
///
/// The input sheets are not modified; the annotated copy is returned inside
/// the [`Reconciliation`]. Fails only on invalid input, before any index is
/// built.
pub fn reconcile<S: AsRef<str>>(
    db: &Sheet,
    bom: &Sheet,
    listing: &[S],
    options: &ReconcileOptions,
) -> ReconcileResult<Reconciliation> {
    check_inputs(db, bom, listing, options)?;

    let layout = BomLayout::new(options.with_description);
    let index = DbIndex::build(db);
    let inventory = FileInventory::build(listing);
    let mut matcher = FileMatcher::new(&inventory, &options.source_path, &options.target_path);

    let mut annotated = bom.clone();
    annotated.set_name(layout::RESULT_SHEET);
    annotated.widen_all(layout.width());
    for (col, label) in layout.header_labels() {
        annotated.set(0, col, label);
    }

    let mut stats = ReconcileStats::default();
    let mut outcomes = Vec::new();

    for row_idx in 1..annotated.row_count() {
        let key = RecordKey::from_cells(
            annotated.get(row_idx, bom::CODE),
            annotated.get(row_idx, bom::CONFIG),
            annotated.get(row_idx, bom::REVISION),
        );
        if !key.is_keyed() {
            stats.skipped_rows += 1;
            continue;
        }
        stats.total_rows += 1;

        let status = MatchStatus::resolve(&index, &key);
        log::trace!("BOM row {} {}: {:?}", row_idx, key.full(), status);

        match status {
            MatchStatus::Matched => {
                stats.matches += 1;
                if let Some(db_row) = index.get(&key) {
                    for (src, dst) in db::PAYLOAD.iter().zip(bom::PAYLOAD.iter()) {
                        let value = db_row.get(*src).cloned().unwrap_or(CellValue::Empty);
                        annotated.set(row_idx, *dst, value);
                    }
                    if layout.with_description {
                        let description = db_row
                            .get(db::DESCRIPTION)
                            .cloned()
                            .unwrap_or(CellValue::Empty);
                        annotated.set(row_idx, bom::DESCRIPTION, description);
                    }
                }
            }
            MatchStatus::MissingKnownPartial => {
                stats.missing += 1;
                stats.revision_mismatch += 1;
            }
            MatchStatus::MissingUnknown => stats.missing += 1,
        }
        annotated.set(row_idx, bom::STATUS, status.status_text());
        annotated.set(row_idx, bom::NOTE, status.note_text());

        let part = PartName::new(
            &annotated.get(row_idx, bom::CODE).to_text(),
            &annotated.get(row_idx, bom::CONFIG).to_text(),
            &annotated.get(row_idx, bom::REVISION).to_text(),
        );
        let mut outcome = RowOutcome {
            row: row_idx,
            status,
            base_name: part.base(),
            pdf: Vec::new(),
            dwg: Vec::new(),
            step: Vec::new(),
        };

        if outcome.base_name.is_empty() {
            // nothing to search for; the flag cells stay blank
            log::debug!("BOM row {} has no usable file name", row_idx);
            outcomes.push(outcome);
            continue;
        }

        for family in ExtensionFamily::ALL {
            let hits = matcher.resolve(&part, family);
            let flag = if hits.is_empty() {
                layout::FLAG_NOT_FOUND
            } else {
                layout::FLAG_FOUND
            };
            annotated.set(row_idx, flag_column(family), flag);
            *outcome.files_mut(family) = hits;
        }

        outcomes.push(outcome);
    }

    let (found, commands) = matcher.finish();
    stats.files_found = found.total();
    stats.files_found_details = found.counts();

    log::debug!(
        "reconciled {} rows: {} matched, {} missing ({} revision mismatches), {} skipped, {} files found",
        stats.total_rows,
        stats.matches,
        stats.missing,
        stats.revision_mismatch,
        stats.skipped_rows,
        stats.files_found
    );

    Ok(Reconciliation {
        annotated,
        stats,
        script: CopyScript::new(&options.source_path, &options.target_path, commands),
        outcomes,
    })
}
