//! Holder for the result of the last successful run

use bomrec_core::Sheet;

use crate::engine::{reconcile, ReconcileOptions, Reconciliation};
use crate::error::ReconcileResult;

/// Keeps the last successful [`Reconciliation`].
///
/// A failed run returns its error and leaves the previous result in place.
#[derive(Debug, Default)]
pub struct Session {
    last: Option<Reconciliation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a reconciliation and keep its result on success
    pub fn run<S: AsRef<str>>(
        &mut self,
        db: &Sheet,
        bom: &Sheet,
        listing: &[S],
        options: &ReconcileOptions,
    ) -> ReconcileResult<&Reconciliation> {
        let result = reconcile(db, bom, listing, options)?;
        Ok(self.last.insert(result))
    }

    /// Result of the last successful run
    pub fn last(&self) -> Option<&Reconciliation> {
        self.last.as_ref()
    }

    /// Forget the last result
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use bomrec_core::CellValue;

    fn sheet(rows: Vec<Vec<&str>>) -> Sheet {
        Sheet::from_rows(
            "S",
            rows.into_iter()
                .map(|r| r.into_iter().map(CellValue::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_failed_run_keeps_previous_result() {
        let db = sheet(vec![vec!["h"], vec!["d", "BA1", "BA1", "A"]]);
        let bom = sheet(vec![vec!["h"], vec!["", "", "", "", "BA1", "BA1", "A"]]);
        let none: &[&str] = &[];

        let mut session = Session::new();
        assert!(session.last().is_none());
        session.run(&db, &bom, none, &ReconcileOptions::default()).unwrap();
        assert_eq!(session.last().unwrap().stats().matches, 1);

        let err = session
            .run(&db, &Sheet::new("empty"), none, &ReconcileOptions::default())
            .unwrap_err();
        assert!(matches!(err, ReconcileError::EmptyBom));
        assert_eq!(session.last().unwrap().stats().matches, 1);

        session.clear();
        assert!(session.last().is_none());
    }
}
