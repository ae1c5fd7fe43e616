//! BIFF8 record type constants used by the reader

// Stream structure
pub const BOF: u16 = 0x0809;
pub const EOF: u16 = 0x000A;
pub const CONTINUE: u16 = 0x003C;

// Workbook globals
pub const BOUNDSHEET: u16 = 0x0085; // Sheet name, type and BOF offset
pub const SST: u16 = 0x00FC; // Shared String Table
pub const FILEPASS: u16 = 0x002F; // Present when the workbook is encrypted

// Cell records
pub const LABELSST: u16 = 0x00FD; // Cell holding an SST index
pub const LABEL: u16 = 0x0204; // Cell with an inline string
pub const NUMBER: u16 = 0x0203; // Cell with an IEEE 754 double
pub const RK: u16 = 0x027E; // Cell with an RK-compressed number
pub const MULRK: u16 = 0x00BD; // Run of RK numbers in one row
pub const BOOLERR: u16 = 0x0205; // Boolean or error cell
pub const FORMULA: u16 = 0x0006; // Formula with its cached result
pub const STRING: u16 = 0x0207; // Cached string result of the preceding FORMULA

// BOF substream types
pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;

/// BOUNDSHEET sheet type of a plain worksheet
pub const SHEET_TYPE_WORKSHEET: u8 = 0x00;

/// BIFF version we support
pub const BIFF8_VERSION: u16 = 0x0600;
