//! Fixed style table for written workbooks.
//!
//! Output sheets use at most two cell formats: the default one and the
//! header format (bold, light gray fill, thin borders on every edge).

/// Cell format index of the default style
pub(crate) const DEFAULT_XF: u32 = 0;

/// Cell format index of the header style
pub(crate) const HEADER_XF: u32 = 1;

/// Header fill color (ARGB)
const HEADER_FILL_ARGB: &str = "FFD9D9D9";

/// Style table written to `xl/styles.xml`
pub(crate) struct XlsxStyleTable;

impl XlsxStyleTable {
    /// Serialize the style table
    pub(crate) fn to_styles_xml() -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="2">
        <font><sz val="11"/><name val="Calibri"/><family val="2"/></font>
        <font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font>
    </fonts>"#,
        );

        // Excel requires the first two fills to be: none and gray125
        xml.push_str(&format!(
            r#"
    <fills count="3">
        <fill><patternFill patternType="none"/></fill>
        <fill><patternFill patternType="gray125"/></fill>
        <fill><patternFill patternType="solid"><fgColor rgb="{}"/><bgColor indexed="64"/></patternFill></fill>
    </fills>"#,
            HEADER_FILL_ARGB
        ));

        xml.push_str(
            r#"
    <borders count="2">
        <border><left/><right/><top/><bottom/><diagonal/></border>
        <border>
            <left style="thin"><color auto="1"/></left>
            <right style="thin"><color auto="1"/></right>
            <top style="thin"><color auto="1"/></top>
            <bottom style="thin"><color auto="1"/></bottom>
            <diagonal/>
        </border>
    </borders>
    <cellStyleXfs count="1">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    </cellStyleXfs>
    <cellXfs count="2">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
        <xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1"/>
    </cellXfs>
    <cellStyles count="1">
        <cellStyle name="Normal" xfId="0" builtinId="0"/>
    </cellStyles>
</styleSheet>"#,
        );

        xml
    }
}
