//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use bomrec_core::{CellAddress, CellValue, Sheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut is_escape = false;
        let mut saw_x = false;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            for _ in 0..4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                if let Some(decoded) =
                    u32::from_str_radix(&hex_chars, 16).ok().and_then(char::from_u32)
                {
                    result.push(decoded);
                    is_escape = true;
                }
            }
        }

        if !is_escape {
            result.push('_');
            if saw_x {
                result.push('x');
            }
            result.push_str(&hex_chars);
        }
    }

    result
}

/// Read a single attribute value as an owned string
fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// Raw state of the `<c>` element currently being parsed
#[derive(Default)]
struct PendingCell {
    reference: Option<String>,
    cell_type: Option<String>,
    value: Option<String>,
}

/// XLSX file reader.
///
/// Reads the first worksheet of a workbook into a [`Sheet`] of plain values.
/// Formula cells yield their cached result; styles are ignored.
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first sheet from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Sheet> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read the first sheet from an in-memory buffer
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<Sheet> {
        Self::read(Cursor::new(bytes))
    }

    /// Read the first sheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Sheet> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let (name, path) = sheet_info
            .iter()
            .find_map(|(name, r_id)| sheet_paths.get(r_id).map(|p| (name.clone(), p.clone())))
            .ok_or(XlsxError::NoSheets)?;

        log::debug!("reading worksheet '{}' from {}", name, path);

        let mut sheet = Sheet::new(name);
        Self::read_worksheet(&mut archive, &path, &mut sheet, &shared_strings)?;
        Ok(sheet)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs carry their own <t> elements that are not part of the value
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in workbook order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet file paths keyed by rId
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to the xl/ folder unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(abs) => abs.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the cells of a worksheet part into `sheet`
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        sheet: &mut Sheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();

        // Position tracking for rows/cells that omit their `r` attribute
        let mut current_row: u32 = 0;
        let mut next_col: u32 = 0;
        let mut seen_row = false;

        let mut cell = PendingCell::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        Self::begin_row(&e, &mut current_row, &mut seen_row);
                        next_col = 0;
                    }
                    b"c" => {
                        in_cell = true;
                        cell = PendingCell {
                            reference: attr_value(&e, b"r"),
                            cell_type: attr_value(&e, b"t"),
                            value: None,
                        };
                    }
                    b"v" if in_cell => in_value = true,
                    b"is" if in_cell => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        let pending = std::mem::take(&mut cell);
                        next_col = Self::process_cell(
                            sheet,
                            pending,
                            current_row,
                            next_col,
                            shared_strings,
                        )?;
                        in_cell = false;
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" if in_inline_str => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        Self::begin_row(&e, &mut current_row, &mut seen_row);
                        next_col = 0;
                    }
                    b"c" => {
                        // Empty cell element (style only); it still occupies a column
                        let reference = attr_value(&e, b"r");
                        next_col = match reference.as_deref().map(CellAddress::parse) {
                            Some(Ok(addr)) => addr.col + 1,
                            _ => next_col + 1,
                        };
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value {
                        if let Ok(text) = e.unescape() {
                            cell.value
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                        }
                    } else if in_inline_text {
                        if let Ok(text) = e.unescape() {
                            cell.value
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                            cell.cell_type = Some("inlineStr".to_string());
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Update the current row index from a `<row>` element
    fn begin_row(e: &BytesStart<'_>, current_row: &mut u32, seen_row: &mut bool) {
        let explicit = attr_value(e, b"r").and_then(|s| s.parse::<u32>().ok());
        *current_row = match explicit {
            Some(r) => r.saturating_sub(1), // 1-based to 0-based
            None if *seen_row => *current_row + 1,
            None => 0,
        };
        *seen_row = true;
    }

    /// Store a parsed cell and return the column following it
    fn process_cell(
        sheet: &mut Sheet,
        cell: PendingCell,
        current_row: u32,
        next_col: u32,
        shared_strings: &[String],
    ) -> XlsxResult<u32> {
        let (row, col) = match cell.reference.as_deref() {
            Some(r) => match CellAddress::parse(r) {
                Ok(addr) => (addr.row, addr.col),
                Err(err) => {
                    log::warn!("skipping cell with invalid reference '{}': {}", r, err);
                    return Ok(next_col + 1);
                }
            },
            None => (current_row, next_col),
        };

        let Some(value) = cell.value else {
            return Ok(col + 1);
        };

        let cell_value = match cell.cell_type.as_deref() {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Inline or formula string - decode Excel escape sequences
            Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(&value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::String(value),
            },

            // Errors, ISO dates and unknown types keep their literal text
            Some(_) => CellValue::String(value),
        };

        sheet.set(row as usize, col as usize, cell_value);
        Ok(col + 1)
    }
}
