//! # bomrec-core
//!
//! Core data structures shared by the bomrec crates.
//!
//! - [`CellValue`] - a single cell (text, number, boolean or empty)
//! - [`CellAddress`] - A1-style addressing used by the file formats
//! - [`Sheet`] - a header row followed by data rows, widened on demand
//!
//! ## Example
//!
//! ```rust
//! use bomrec_core::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::new("Risultato");
//! sheet.push_row(vec!["Code".into(), "Rev".into()]);
//!
//! // Writing past the end widens the row instead of failing
//! sheet.set(1, 4, "OK");
//! assert_eq!(sheet.row(1).map(|r| r.len()), Some(5));
//! assert_eq!(sheet.get(1, 4), &CellValue::from("OK"));
//! ```

pub mod cell;
pub mod error;
pub mod sheet;

pub use cell::{CellAddress, CellValue};
pub use error::{Error, Result};
pub use sheet::{Row, Sheet};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
