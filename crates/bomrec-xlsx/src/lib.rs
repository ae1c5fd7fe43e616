//! # bomrec-xlsx
//!
//! XLSX (Office Open XML) reader and writer for bomrec sheets.
//!
//! Only what reconciliation needs is supported: the reader returns the
//! first worksheet as plain values, the writer emits a single worksheet
//! with an optional styled header row and auto-filter.

pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::{WriteOptions, XlsxWriter};
