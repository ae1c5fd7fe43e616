//! Index of the master DB sheet by full and partial key

use ahash::{AHashMap, AHashSet};
use bomrec_core::{Row, Sheet};

use crate::layout::db;
use crate::normalize::RecordKey;

/// Lookup structure over the DB rows.
///
/// Duplicate full keys are not merged: the last row with a given key wins.
#[derive(Debug, Default)]
pub struct DbIndex<'a> {
    full: AHashMap<String, &'a Row>,
    partial: AHashSet<String>,
}

impl<'a> DbIndex<'a> {
    /// Index every data row of `sheet` that has a key
    pub fn build(sheet: &'a Sheet) -> Self {
        let mut index = DbIndex::default();
        let mut overwritten = 0usize;

        for (row_idx, row) in sheet.data_rows() {
            if row.len() < db::MIN_ROW_LEN {
                continue;
            }

            let key = RecordKey::from_cells(&row[db::CODE], &row[db::CONFIG], &row[db::REVISION]);
            if !key.is_keyed() {
                continue;
            }

            if index.full.insert(key.full(), row).is_some() {
                overwritten += 1;
                log::trace!("DB row {} overwrites earlier key {}", row_idx, key.full());
            }
            index.partial.insert(key.partial());
        }

        if overwritten > 0 {
            log::debug!("{} duplicate DB keys resolved last-write-wins", overwritten);
        }
        log::debug!(
            "indexed {} DB keys ({} code/configuration pairs)",
            index.full.len(),
            index.partial.len()
        );

        index
    }

    /// DB row holding exactly this code/configuration/revision
    pub fn get(&self, key: &RecordKey) -> Option<&'a Row> {
        self.full.get(&key.full()).copied()
    }

    /// Whether any revision of this code/configuration is known
    pub fn has_partial(&self, key: &RecordKey) -> bool {
        self.partial.contains(&key.partial())
    }

    /// Number of distinct full keys
    pub fn len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomrec_core::CellValue;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    #[test]
    fn test_build_skips_header_short_and_blank_rows() {
        let sheet = Sheet::from_rows(
            "DB",
            vec![
                row(&["Desc", "Code", "Config", "Rev"]),
                row(&["d", "BA1", "CFG1", "A", "p1"]),
                row(&["d", "BA2", "CFG2"]),
                row(&["d", "  ", "CFG3", "A"]),
            ],
        );

        let index = DbIndex::build(&sheet);
        assert_eq!(index.len(), 1);

        let key = RecordKey::from_cells(&"ba1".into(), &"cfg1".into(), &"a".into());
        assert!(index.get(&key).is_some());

        let header = RecordKey::from_cells(&"Code".into(), &"Config".into(), &"Rev".into());
        assert!(index.get(&header).is_none());
    }

    #[test]
    fn test_partial_key_known() {
        let sheet = Sheet::from_rows(
            "DB",
            vec![row(&["h"]), row(&["d", "BA1", "CFG1", "B"])],
        );
        let index = DbIndex::build(&sheet);

        let other_rev = RecordKey::from_cells(&"BA1".into(), &"CFG1".into(), &"A".into());
        assert!(index.get(&other_rev).is_none());
        assert!(index.has_partial(&other_rev));
    }

    #[test]
    fn test_duplicate_full_key_last_write_wins() {
        let sheet = Sheet::from_rows(
            "DB",
            vec![
                row(&["h"]),
                row(&["first", "BA1", "CFG1", "A"]),
                row(&["second", "ba1 ", "cfg1", "a"]),
            ],
        );
        let index = DbIndex::build(&sheet);
        let key = RecordKey::from_cells(&"BA1".into(), &"CFG1".into(), &"A".into());

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&key).unwrap()[0], CellValue::from("second"));
    }
}
