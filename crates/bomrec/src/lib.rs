//! # bomrec
//!
//! Reconcile a bill of materials against a master DB sheet.
//!
//! Every BOM row is joined to the DB by code, configuration and revision,
//! stamped with its status, and looked up in a listing of the drawing folder.
//! The files found are gathered into a Windows batch script that copies them
//! into `PDF`, `DWG` and `STEP` subfolders of a target directory.
//!
//! ## Example
//!
//! ```rust
//! use bomrec::{reconcile, CellValue, ReconcileOptions, Row, Sheet};
//!
//! let row = |cells: &[&str]| -> Row { cells.iter().map(|c| CellValue::from(*c)).collect() };
//! let db = Sheet::from_rows("DB", vec![row(&["Desc"]), row(&["Staffa", "BA1", "BA1", "A"])]);
//! let bom = Sheet::from_rows("BOM", vec![row(&["Pos"]), row(&["1", "", "", "", "BA1", "BA1", "A"])]);
//!
//! let options = ReconcileOptions::new(r"Z:\Disegni", r"C:\Tavole");
//! let result = reconcile(&db, &bom, &["BA1A.pdf"], &options).unwrap();
//!
//! assert_eq!(result.stats().matches, 1);
//! assert_eq!(result.stats().files_found_details.pdf, 1);
//! assert_eq!(result.script().commands().len(), 1);
//! ```

pub mod db_index;
pub mod engine;
pub mod error;
pub mod filename;
pub mod inventory;
pub mod io;
pub mod layout;
pub mod matcher;
pub mod normalize;
pub mod output;
pub mod script;
pub mod session;
pub mod stats;

pub use db_index::DbIndex;
pub use engine::{
    reconcile, MatchStatus, ReconcileOptions, Reconciliation, RowOutcome, DEFAULT_TARGET_PATH,
};
pub use error::{ReconcileError, ReconcileResult};
pub use filename::{derive_base_name, PartName};
pub use inventory::{Extension, ExtensionFamily, FileInventory};
pub use io::{list_directory, open_sheet, read_file_list, save_script, save_sheet};
pub use layout::BomLayout;
pub use matcher::{find_files, FileMatcher};
pub use normalize::{normalize, RecordKey};
pub use output::{missing_records, OutputNames};
pub use script::{CopyCommandSet, CopyScript};
pub use session::Session;
pub use stats::{FileCounts, ReconcileStats};

// Re-export the sheet model and writer options used in the public API
pub use bomrec_core::{CellValue, Row, Sheet};
pub use bomrec_xlsx::WriteOptions;
