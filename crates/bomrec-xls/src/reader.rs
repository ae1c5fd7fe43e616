//! XLS (BIFF8) reader.
//!
//! Opens the Compound File container, reads the `Workbook` stream and turns
//! the first worksheet's cell records into a [`Sheet`].

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use bomrec_core::{CellValue, Sheet};

use crate::biff::parser::{read_f64, read_rk, read_u16, read_u32, read_u8};
use crate::biff::records;
use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord};
use crate::error::{XlsError, XlsResult};

/// Reads the first worksheet of an XLS workbook into a [`Sheet`] of plain
/// values.
pub struct XlsReader;

/// A sheet entry from a BOUNDSHEET record
#[derive(Debug)]
struct SheetInfo {
    /// Stream offset of the sheet's BOF record
    offset: u32,
    /// 0 = worksheet, 2 = chart, 6 = VBA module
    sheet_type: u8,
    name: String,
}

/// Workbook-level data needed to decode a worksheet
#[derive(Debug, Default)]
struct Globals {
    sst: Vec<String>,
    sheets: Vec<SheetInfo>,
    /// Index of the globals EOF record
    end: usize,
}

impl XlsReader {
    /// Read the first sheet from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Sheet> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read the first sheet from an in-memory buffer
    pub fn read_bytes(bytes: &[u8]) -> XlsResult<Sheet> {
        Self::read(Cursor::new(bytes))
    }

    /// Read the first sheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Sheet> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        // "Book" is the BIFF5 name; it is opened only to report the version
        let stream_path = if cfb.exists("/Workbook") {
            "/Workbook"
        } else if cfb.exists("/Book") {
            "/Book"
        } else {
            return Err(XlsError::InvalidFormat(
                "no Workbook or Book stream found in CFB".into(),
            ));
        };

        let mut stream_data = Vec::new();
        cfb.open_stream(stream_path)?.read_to_end(&mut stream_data)?;

        let all_records = biff::read_all_records(&mut stream_data.as_slice())?;
        let globals = Self::read_globals(&all_records)?;

        let sheet_idx = globals
            .sheets
            .iter()
            .position(|s| s.sheet_type == records::SHEET_TYPE_WORKSHEET)
            .ok_or(XlsError::NoSheets)?;
        let info = &globals.sheets[sheet_idx];

        log::debug!(
            "reading worksheet '{}' ({} shared strings)",
            info.name,
            globals.sst.len()
        );

        let cells = Self::sheet_records(&all_records, &globals, sheet_idx)?;
        let mut sheet = Sheet::new(info.name.clone());
        Self::read_cells(&cells, &mut sheet, &globals.sst)?;
        Ok(sheet)
    }

    /// Parse the workbook globals substream up to its EOF
    fn read_globals(all_records: &[BiffRecord]) -> XlsResult<Globals> {
        let first = all_records
            .first()
            .ok_or_else(|| XlsError::InvalidFormat("empty Workbook stream".into()))?;
        if first.record_type != records::BOF {
            return Err(XlsError::InvalidFormat(
                "Workbook stream does not start with BOF".into(),
            ));
        }
        let (version, dt) = biff::parse_bof(&first.data)?;
        if version != records::BIFF8_VERSION {
            return Err(XlsError::UnsupportedVersion(format!(
                "expected BIFF8 (0x0600), got 0x{version:04X}"
            )));
        }
        if dt != records::BOF_WORKBOOK_GLOBALS {
            return Err(XlsError::InvalidFormat(format!(
                "first substream is 0x{dt:04X}, not workbook globals"
            )));
        }

        let mut globals = Globals::default();
        for (idx, rec) in all_records.iter().enumerate().skip(1) {
            match rec.record_type {
                records::EOF => {
                    globals.end = idx;
                    return Ok(globals);
                }
                records::FILEPASS => return Err(XlsError::Encrypted),
                records::SST => globals.sst = parse_sst(&rec.data, &rec.continues)?,
                records::BOUNDSHEET => globals.sheets.push(Self::parse_boundsheet(&rec.data)?),
                _ => {}
            }
        }

        Err(XlsError::InvalidFormat(
            "workbook globals have no EOF".into(),
        ))
    }

    /// BOUNDSHEET: bof_offset(4) + visibility(1) + sheet_type(1) + short string
    fn parse_boundsheet(data: &[u8]) -> XlsResult<SheetInfo> {
        let mut offset = 0;
        let bof_offset = read_u32(data, &mut offset)?;
        let _visibility = read_u8(data, &mut offset)?;
        let sheet_type = read_u8(data, &mut offset)?;
        let name = read_short_string(data, &mut offset)?;

        Ok(SheetInfo {
            offset: bof_offset,
            sheet_type,
            name,
        })
    }

    /// Records of the substream of sheet `sheet_idx`, without its BOF/EOF.
    ///
    /// The substream is located by the BOF offset from BOUNDSHEET; when that
    /// offset is stale the substreams after the globals are taken in order.
    fn sheet_records<'a>(
        all_records: &'a [BiffRecord],
        globals: &Globals,
        sheet_idx: usize,
    ) -> XlsResult<&'a [BiffRecord]> {
        let info = &globals.sheets[sheet_idx];
        let after_globals = globals.end + 1;
        let located = all_records
            .iter()
            .enumerate()
            .skip(after_globals)
            .find(|(_, r)| {
                r.record_type == records::BOF && r.stream_offset == u64::from(info.offset)
            });
        let start = match located {
            Some((idx, _)) => idx,
            None => {
                log::debug!(
                    "no BOF at offset {} for '{}', using substream #{}",
                    info.offset,
                    info.name,
                    sheet_idx
                );
                Self::substream_starts(&all_records[after_globals..])
                    .nth(sheet_idx)
                    .map(|idx| idx + after_globals)
                    .ok_or_else(|| {
                        XlsError::InvalidFormat(format!("no substream for sheet '{}'", info.name))
                    })?
            }
        };

        let body = &all_records[start + 1..];
        let mut depth = 1usize;
        for (idx, rec) in body.iter().enumerate() {
            match rec.record_type {
                records::BOF => depth += 1,
                records::EOF => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&body[..idx]);
                    }
                }
                _ => {}
            }
        }

        log::warn!("sheet '{}' has no EOF record", info.name);
        Ok(body)
    }

    /// Indexes of top-level BOF records
    fn substream_starts(recs: &[BiffRecord]) -> impl Iterator<Item = usize> + '_ {
        let mut depth = 0usize;
        recs.iter().enumerate().filter_map(move |(idx, rec)| {
            match rec.record_type {
                records::BOF => {
                    depth += 1;
                    if depth == 1 {
                        return Some(idx);
                    }
                }
                records::EOF => depth = depth.saturating_sub(1),
                _ => {}
            }
            None
        })
    }

    /// Store every value-bearing cell record of a worksheet
    fn read_cells(cells: &[BiffRecord], sheet: &mut Sheet, sst: &[String]) -> XlsResult<()> {
        // a FORMULA with a string result is followed by its STRING record
        let mut pending_string: Option<(usize, usize)> = None;

        for rec in cells {
            let data = rec.data.as_slice();
            match rec.record_type {
                records::LABELSST => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    let idx = read_u32(data, &mut off)? as usize;
                    match sst.get(idx) {
                        Some(s) => sheet.set(row, col, s.as_str()),
                        None => log::warn!("SST index {} out of range at {}:{}", idx, row, col),
                    }
                }
                records::LABEL => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    sheet.set(row, col, read_unicode_string(data, &mut off)?);
                }
                records::NUMBER => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    sheet.set(row, col, read_f64(data, &mut off)?);
                }
                records::RK => {
                    let (row, col, mut off) = Self::cell_header(data)?;
                    sheet.set(row, col, read_rk(data, &mut off)?);
                }
                records::MULRK => Self::read_mulrk(data, sheet)?,
                records::BOOLERR => {
                    let (row, col, off) = Self::cell_header(data)?;
                    let value = data.get(off).copied().unwrap_or(0);
                    let is_error = data.get(off + 1).copied().unwrap_or(0) != 0;
                    if is_error {
                        sheet.set(row, col, error_text(value));
                    } else {
                        sheet.set(row, col, value != 0);
                    }
                }
                records::FORMULA => {
                    let (row, col, off) = Self::cell_header(data)?;
                    match Self::formula_result(data, off)? {
                        FormulaResult::Value(value) => sheet.set(row, col, value),
                        FormulaResult::PendingString => {
                            pending_string = Some((row, col));
                            continue;
                        }
                        FormulaResult::Empty => {}
                    }
                }
                records::STRING => {
                    if let Some((row, col)) = pending_string {
                        let mut off = 0;
                        sheet.set(row, col, read_unicode_string(data, &mut off)?);
                    }
                }
                _ => continue,
            }
            pending_string = None;
        }

        Ok(())
    }

    /// row(2) + col(2) + xf(2); returns the offset after the header
    fn cell_header(data: &[u8]) -> XlsResult<(usize, usize, usize)> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as usize;
        let col = read_u16(data, &mut off)? as usize;
        let _xf = read_u16(data, &mut off)?;
        Ok((row, col, off))
    }

    /// MULRK: row(2) + first_col(2) + [xf(2) + rk(4)]* + last_col(2)
    fn read_mulrk(data: &[u8], sheet: &mut Sheet) -> XlsResult<()> {
        if data.len() < 6 {
            return Err(XlsError::Parse("MULRK record too short".into()));
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)? as usize;
        let first_col = read_u16(data, &mut off)? as usize;
        let last_col = u16::from_le_bytes([data[data.len() - 2], data[data.len() - 1]]) as usize;
        let rk_end = data.len() - 2;

        let mut col = first_col;
        while off + 6 <= rk_end && col <= last_col {
            let _xf = read_u16(data, &mut off)?;
            sheet.set(row, col, read_rk(data, &mut off)?);
            col += 1;
        }
        Ok(())
    }

    /// FORMULA after the cell header: result(8) + options(2) + reserved(4) + tokens
    fn formula_result(data: &[u8], off: usize) -> XlsResult<FormulaResult> {
        let result = data
            .get(off..off + 8)
            .ok_or_else(|| XlsError::Parse("FORMULA record too short".into()))?;

        // 0xFFFF in the top bytes marks a non-numeric result
        if result[6] != 0xFF || result[7] != 0xFF {
            let mut off = off;
            return read_f64(data, &mut off).map(|n| FormulaResult::Value(CellValue::Number(n)));
        }

        Ok(match result[0] {
            0x00 => FormulaResult::PendingString,
            0x01 => FormulaResult::Value(CellValue::Boolean(result[2] != 0)),
            0x02 => FormulaResult::Value(error_text(result[2]).into()),
            _ => FormulaResult::Empty,
        })
    }
}

enum FormulaResult {
    Value(CellValue),
    PendingString,
    Empty,
}

/// Display text of a BIFF error code
fn error_text(code: u8) -> &'static str {
    match code {
        0x00 => "#NULL!",
        0x07 => "#DIV/0!",
        0x17 => "#REF!",
        0x1D => "#NAME?",
        0x24 => "#NUM!",
        0x2A => "#N/A",
        _ => "#VALUE!",
    }
}
