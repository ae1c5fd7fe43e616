//! Reconciliation statistics

use serde::Serialize;

/// Distinct files found per extension family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FileCounts {
    pub pdf: usize,
    pub dwg: usize,
    /// STEP family (`.stp` and `.step`)
    pub stp: usize,
}

/// Counters of one run.
///
/// `total_rows` counts BOM rows that carry a code, so
/// `matches + missing == total_rows` and `revision_mismatch <= missing`.
/// Files are counted by distinct real name, not by row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileStats {
    pub total_rows: usize,
    /// Data rows with a blank code, left untouched
    pub skipped_rows: usize,
    pub matches: usize,
    pub missing: usize,
    pub revision_mismatch: usize,
    pub files_found: usize,
    pub files_found_details: FileCounts,
}

/// One entry of the per-family summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyCount {
    pub label: &'static str,
    pub count: usize,
}

impl ReconcileStats {
    /// Per-family counts, highest first; ties ordered by label
    pub fn family_summary(&self) -> Vec<FamilyCount> {
        let details = &self.files_found_details;
        let mut summary = vec![
            FamilyCount {
                label: "PDF",
                count: details.pdf,
            },
            FamilyCount {
                label: "DWG",
                count: details.dwg,
            },
            FamilyCount {
                label: "STEP",
                count: details.stp,
            },
        ];
        summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(b.label)));
        summary
    }
}
