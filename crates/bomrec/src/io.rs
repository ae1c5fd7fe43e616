//! File-level facade: open and save sheets by extension, list available files

use std::fs;
use std::path::Path;

use bomrec_core::Sheet;
use bomrec_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use bomrec_xls::XlsReader;
use bomrec_xlsx::{WriteOptions, XlsxReader, XlsxWriter};

use crate::error::{ReconcileError, ReconcileResult};
use crate::script::CopyScript;

/// Spreadsheet formats handled by [`open_sheet`] and [`save_sheet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Xlsx,
    /// Legacy BIFF8 workbook, read only
    Xls,
    Csv,
}

/// Local file header signature of a ZIP archive
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

fn format_of(path: &Path) -> ReconcileResult<Format> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Ok(Format::Xlsx),
        Some("xls") => Ok(Format::Xls),
        Some("csv") => Ok(Format::Csv),
        _ => Err(ReconcileError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read the first sheet of an xlsx/xlsm/xls/csv file.
///
/// A failure to read the file is reported as [`ReconcileError::Read`], a file
/// that was read but could not be decoded as [`ReconcileError::Parse`].
/// An `.xls` that is really a zipped workbook is read as xlsx.
pub fn open_sheet<P: AsRef<Path>>(path: P) -> ReconcileResult<Sheet> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let bytes = fs::read(path).map_err(|e| ReconcileError::read(path, e))?;

    let sheet = match format {
        Format::Xlsx => {
            XlsxReader::read_bytes(&bytes).map_err(|e| ReconcileError::parse(path, e))?
        }
        Format::Xls if bytes.starts_with(ZIP_MAGIC) => {
            log::debug!("{} is a zipped workbook, reading it as xlsx", path.display());
            XlsxReader::read_bytes(&bytes).map_err(|e| ReconcileError::parse(path, e))?
        }
        Format::Xls => XlsReader::read_bytes(&bytes).map_err(|e| ReconcileError::parse(path, e))?,
        Format::Csv => {
            let options = CsvReadOptions {
                delimiter: CsvReader::sniff_delimiter(&bytes),
                ..CsvReadOptions::default()
            };
            let mut sheet = CsvReader::read(bytes.as_slice(), &options)
                .map_err(|e| ReconcileError::parse(path, e))?;
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sheet.set_name(stem);
            }
            sheet
        }
    };

    log::debug!("read {} rows from {}", sheet.row_count(), path.display());
    Ok(sheet)
}

/// Write a sheet as xlsx (honoring `options`) or csv, chosen by extension.
/// `.xls` cannot be written.
pub fn save_sheet<P: AsRef<Path>>(
    sheet: &Sheet,
    path: P,
    options: &WriteOptions,
) -> ReconcileResult<()> {
    let path = path.as_ref();
    match format_of(path)? {
        Format::Xlsx => XlsxWriter::write_file(sheet, path, options)
            .map_err(|e| ReconcileError::write(path, e)),
        Format::Xls => Err(ReconcileError::UnsupportedFormat(path.to_path_buf())),
        Format::Csv => {
            let sheet = match options.max_columns {
                Some(max) => sheet.truncated(max),
                None => sheet.clone(),
            };
            CsvWriter::write_file(&sheet, path, &CsvWriteOptions::default())
                .map_err(|e| ReconcileError::write(path, e))
        }
    }
}

/// Write the rendered copy script
pub fn save_script<P: AsRef<Path>>(script: &CopyScript, path: P) -> ReconcileResult<()> {
    let path = path.as_ref();
    fs::write(path, script.render()).map_err(|e| ReconcileError::write(path, e))
}

/// Names of the regular files directly inside `dir`, sorted
pub fn list_directory<P: AsRef<Path>>(dir: P) -> ReconcileResult<Vec<String>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| ReconcileError::read(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ReconcileError::read(dir, e))?;
        let file_type = entry.file_type().map_err(|e| ReconcileError::read(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::warn!("skipping non UTF-8 file name {:?}", name),
        }
    }

    names.sort();
    log::debug!("listed {} files in {}", names.len(), dir.display());
    Ok(names)
}

/// Read a file listing, one name per line. Blank lines are ignored and any
/// leading directory (`/` or `\` separated) is dropped.
pub fn read_file_list<P: AsRef<Path>>(path: P) -> ReconcileResult<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ReconcileError::read(path, e))?;
    Ok(parse_file_list(&text))
}

fn parse_file_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.rsplit(['/', '\\']).next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
