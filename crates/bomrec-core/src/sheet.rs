//! Sheet: a rectangular-ish grid of cells with a header row

use crate::cell::CellValue;

/// One row of cells at fixed column positions
pub type Row = Vec<CellValue>;

static EMPTY: CellValue = CellValue::Empty;

/// A single sheet held fully in memory.
///
/// Row 0 is the header. Rows may have different lengths; reads past the end
/// of a row yield [`CellValue::Empty`] and writes widen the row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    name: String,
    rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet from existing rows
    pub fn from_rows<S: Into<String>>(name: S, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the sheet
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Number of rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the sheet has no rows at all
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, header first
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The header row, if any
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Data rows (everything after the header) with their row index
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().skip(1)
    }

    /// Get a row by index
    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// Get a cell; anything outside the stored grid is empty
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Set a cell, appending rows and widening the row as needed
    pub fn set<V: Into<CellValue>>(&mut self, row: usize, col: usize, value: V) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.into();
    }

    /// Pad a row with empty cells up to `min_cols`; longer rows are untouched
    pub fn widen_row(&mut self, row: usize, min_cols: usize) {
        if let Some(cells) = self.rows.get_mut(row) {
            if cells.len() < min_cols {
                cells.resize(min_cols, CellValue::Empty);
            }
        }
    }

    /// Pad every row to at least `min_cols`
    pub fn widen_all(&mut self, min_cols: usize) {
        for row in 0..self.rows.len() {
            self.widen_row(row, min_cols);
        }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Copy of the sheet keeping only the first `max_cols` columns of each row
    pub fn truncated(&self, max_cols: usize) -> Sheet {
        Sheet {
            name: self.name.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().take(max_cols).cloned().collect())
                .collect(),
        }
    }
}
