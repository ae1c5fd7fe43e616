//! BIFF8 Unicode strings.
//!
//! A string is `char_count` (1 or 2 bytes) + flags (1 byte), then an
//! optional rich-run count (flag 0x08) and phonetic size (flag 0x04), the
//! characters, and finally the rich runs and phonetic block. Flag 0x01
//! selects UTF-16LE; otherwise each character is one Latin-1 byte.
//!
//! Inside the SST, character data may cross into a CONTINUE body, which then
//! starts with a fresh flags byte that can switch the character width.

use super::parser::{read_u16, read_u32, read_u8};
use crate::error::{XlsError, XlsResult};

const FLAG_WIDE: u8 = 0x01;
const FLAG_PHONETIC: u8 = 0x04;
const FLAG_RICH: u8 = 0x08;

/// Read a string with a 1-byte length prefix (BOUNDSHEET names)
pub fn read_short_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u8(data, offset)? as usize;
    read_unicode_body(data, offset, char_count, &[])
}

/// Read a string with a 2-byte length prefix (LABEL, STRING)
pub fn read_unicode_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    read_continued_string(data, offset, &[])
}

/// Read a 2-byte-length string whose characters may cross any of the
/// `continues` boundaries.
fn read_continued_string(
    data: &[u8],
    offset: &mut usize,
    continues: &[usize],
) -> XlsResult<String> {
    let char_count = read_u16(data, offset)? as usize;
    read_unicode_body(data, offset, char_count, continues)
}

fn read_unicode_body(
    data: &[u8],
    offset: &mut usize,
    char_count: usize,
    continues: &[usize],
) -> XlsResult<String> {
    let flags = read_u8(data, offset)?;
    let run_count = if flags & FLAG_RICH != 0 {
        read_u16(data, offset)? as usize
    } else {
        0
    };
    let phonetic_size = if flags & FLAG_PHONETIC != 0 {
        read_u32(data, offset)? as usize
    } else {
        0
    };

    let mut units: Vec<u16> = Vec::with_capacity(char_count);
    let mut wide = flags & FLAG_WIDE != 0;

    while units.len() < char_count {
        let segment_end = continues
            .iter()
            .copied()
            .find(|&b| b > *offset)
            .unwrap_or(data.len())
            .min(data.len());
        let width = if wide { 2 } else { 1 };
        let available = segment_end.saturating_sub(*offset) / width;
        let take = (char_count - units.len()).min(available);

        if take == 0 {
            return Err(XlsError::Parse(format!(
                "string data too short: {} of {} characters read at offset {}",
                units.len(),
                char_count,
                *offset
            )));
        }

        let bytes = &data[*offset..*offset + take * width];
        if wide {
            units.extend(bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])));
        } else {
            units.extend(bytes.iter().map(|&b| b as u16));
        }
        *offset += take * width;

        if units.len() < char_count {
            // the continuation restates the character width
            wide = read_u8(data, offset)? & FLAG_WIDE != 0;
        }
    }

    *offset += run_count * 4 + phonetic_size;

    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

/// Parse the Shared String Table from an SST body with its CONTINUE bodies
/// merged; `continues` are the merge offsets.
///
/// A damaged tail ends the table early with a warning, the strings read so
/// far are kept.
pub fn parse_sst(data: &[u8], continues: &[usize]) -> XlsResult<Vec<String>> {
    let mut offset = 0;

    let _total_refs = read_u32(data, &mut offset)?;
    let unique_count = read_u32(data, &mut offset)? as usize;

    let mut strings = Vec::with_capacity(unique_count.min(data.len()));
    for i in 0..unique_count {
        match read_continued_string(data, &mut offset, continues) {
            Ok(s) => strings.push(s),
            Err(e) => {
                log::warn!("SST parse error at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}
