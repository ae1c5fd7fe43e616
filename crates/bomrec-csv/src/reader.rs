//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use bomrec_core::{CellValue, Sheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a sheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Sheet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut sheet = Self::read(file, options)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            sheet.set_name(stem);
        }
        Ok(sheet)
    }

    /// Read CSV from a reader; the first record becomes row 0 (the header)
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Sheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut sheet = Sheet::new("Sheet1");

        for result in csv_reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| Self::parse_field(field, options.detect_numbers))
                .collect();
            sheet.push_row(row);
        }

        Ok(sheet)
    }

    /// Guess the delimiter from the first line of the input: `;` wins over `,`
    /// only when it occurs more often.
    pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
        let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
        let commas = first_line.iter().filter(|b| **b == b',').count();
        let semicolons = first_line.iter().filter(|b| **b == b';').count();
        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }

    fn parse_field(field: &str, detect_numbers: bool) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }

        if detect_numbers {
            if let Ok(n) = field.trim().parse::<f64>() {
                if n.is_finite() {
                    return CellValue::Number(n);
                }
            }
        }

        CellValue::String(field.to_string())
    }
}
