//! # bomrec-xls
//!
//! Reader for the legacy Excel binary format (.xls, BIFF8 inside a
//! Compound File container).
//!
//! Like the XLSX reader, it returns the first worksheet as plain values:
//! formula cells yield their cached result, error cells their `#` text,
//! and formatting is ignored.

pub mod biff;
pub mod error;
pub mod reader;

pub use error::{XlsError, XlsResult};
pub use reader::XlsReader;
