//! XLSX writer

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use crate::styles::{XlsxStyleTable, DEFAULT_XF, HEADER_XF};
use bomrec_core::{CellAddress, CellValue, Sheet};

/// Maximum length of a worksheet name
const MAX_SHEET_NAME_LEN: usize = 31;

/// Options controlling how a sheet is written
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Keep only the first N columns of every row
    pub max_columns: Option<usize>,
    /// Bold/filled/bordered header row, frozen pane and auto-filter
    pub styled_header: bool,
}

impl WriteOptions {
    /// Styled header, no truncation
    pub fn styled() -> Self {
        Self {
            max_columns: None,
            styled_header: true,
        }
    }

    /// Truncate every row to `max_columns`
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = Some(max_columns);
        self
    }
}

/// XLSX file writer.
///
/// Produces a workbook holding a single worksheet named after the sheet.
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a sheet to a file path
    pub fn write_file<P: AsRef<Path>>(
        sheet: &Sheet,
        path: P,
        options: &WriteOptions,
    ) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file, options)
    }

    /// Write a sheet into an in-memory buffer
    pub fn to_bytes(sheet: &Sheet, options: &WriteOptions) -> XlsxResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write(sheet, &mut cursor, options)?;
        Ok(cursor.into_inner())
    }

    /// Write a sheet to a writer
    pub fn write<W: Write + Seek>(sheet: &Sheet, writer: W, options: &WriteOptions) -> XlsxResult<()> {
        let truncated;
        let sheet = match options.max_columns {
            Some(max) => {
                truncated = sheet.truncated(max);
                &truncated
            }
            None => sheet,
        };

        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, sheet)?;
        Self::write_workbook_rels(&mut zip)?;
        Self::write_styles_xml(&mut zip)?;
        Self::write_worksheet(&mut zip, sheet, options)?;

        zip.finish()?;
        log::debug!(
            "wrote sheet '{}' ({} rows x {} columns)",
            sheet.name(),
            sheet.row_count(),
            sheet.width()
        );
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Sheet,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        content.push_str(&format!(
            r#"
        <sheet name="{}" sheetId="1" r:id="rId1"/>"#,
            Self::escape_xml(&Self::sheet_name(sheet.name()))
        ));

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(XlsxStyleTable::to_styles_xml().as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Sheet,
        write_options: &WriteOptions,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/worksheets/sheet1.xml", options)?;

        let width = sheet.width();
        let styled = write_options.styled_header && !sheet.is_empty() && width > 0;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if styled {
            // Keep the header visible while scrolling
            content.push_str(
                r#"
    <sheetViews>
        <sheetView workbookViewId="0">
            <pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>
        </sheetView>
    </sheetViews>"#,
            );
        }

        content.push_str("\n    <sheetData>");

        for (row_idx, row) in sheet.rows().iter().enumerate() {
            let is_header = styled && row_idx == 0;
            let xf_id = if is_header { HEADER_XF } else { DEFAULT_XF };
            // The header is styled across the full width even where it is blank
            let cols = if is_header { width } else { row.len() };

            let mut cells = String::new();
            for col in 0..cols {
                let value = row.get(col).unwrap_or(&CellValue::Empty);
                let cell_ref = CellAddress::new(row_idx as u32, col as u32).to_a1_string();
                Self::write_cell(&mut cells, &cell_ref, value, xf_id);
            }

            if cells.is_empty() {
                continue;
            }
            content.push_str(&format!("\n        <row r=\"{}\">", row_idx + 1));
            content.push_str(&cells);
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>");

        if styled {
            let last = CellAddress::new(
                sheet.row_count().saturating_sub(1) as u32,
                (width - 1) as u32,
            );
            content.push_str(&format!("\n    <autoFilter ref=\"A1:{}\"/>", last));
        }

        content.push_str("\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_cell(content: &mut String, cell_ref: &str, value: &CellValue, xf_id: u32) {
        let style_attr = if xf_id != DEFAULT_XF {
            format!(" s=\"{}\"", xf_id)
        } else {
            String::new()
        };

        match value {
            CellValue::Number(n) if n.is_finite() => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\"{}><v>{}</v></c>",
                    cell_ref, style_attr, n
                ));
            }
            CellValue::Number(n) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t>{}</t></is></c>",
                    cell_ref, style_attr, n
                ));
            }
            CellValue::String(s) => {
                let space = if s.trim() != s {
                    " xml:space=\"preserve\""
                } else {
                    ""
                };
                content.push_str(&format!(
                    "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                    cell_ref,
                    style_attr,
                    space,
                    Self::escape_xml(s)
                ));
            }
            CellValue::Boolean(b) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                    cell_ref,
                    style_attr,
                    if *b { 1 } else { 0 }
                ));
            }
            CellValue::Empty => {
                // Preserve style-only cells
                if xf_id != DEFAULT_XF {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{}/>",
                        cell_ref, style_attr
                    ));
                }
            }
        }
    }

    /// Make a sheet name acceptable to Excel
    fn sheet_name(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
            .take(MAX_SHEET_NAME_LEN)
            .collect();
        if cleaned.trim().is_empty() {
            "Sheet1".to_string()
        } else {
            cleaned
        }
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_sanitized() {
        assert_eq!(XlsxWriter::sheet_name("Risultato"), "Risultato");
        assert_eq!(XlsxWriter::sheet_name("a/b:c"), "abc");
        assert_eq!(XlsxWriter::sheet_name("[]"), "Sheet1");
        assert_eq!(XlsxWriter::sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(XlsxWriter::escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    }
}
