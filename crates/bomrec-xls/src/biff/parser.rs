//! Little-endian readers over a record body.
//!
//! Each reader advances `offset` and fails with [`XlsError::Parse`] instead
//! of reading past the end.

use crate::error::{XlsError, XlsResult};

fn take<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> XlsResult<&'a [u8]> {
    let end = *offset + len;
    if end > data.len() {
        return Err(XlsError::Parse(format!(
            "unexpected end of data at offset {}, need {} bytes",
            *offset, len
        )));
    }
    let bytes = &data[*offset..end];
    *offset = end;
    Ok(bytes)
}

#[inline]
pub fn read_u8(data: &[u8], offset: &mut usize) -> XlsResult<u8> {
    take(data, offset, 1).map(|b| b[0])
}

#[inline]
pub fn read_u16(data: &[u8], offset: &mut usize) -> XlsResult<u16> {
    take(data, offset, 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

#[inline]
pub fn read_u32(data: &[u8], offset: &mut usize) -> XlsResult<u32> {
    take(data, offset, 4).map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[inline]
pub fn read_f64(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    let b = take(data, offset, 8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(b);
    Ok(f64::from_le_bytes(bytes))
}

/// Decode an RK-encoded number.
///
/// Bit 0 set means the value is divided by 100. Bit 1 set means bits 2..31
/// hold a signed 30-bit integer; otherwise they are the upper 30 bits of an
/// IEEE 754 double whose lower 34 bits are zero.
#[inline]
pub fn decode_rk(rk: u32) -> f64 {
    let div100 = (rk & 0x01) != 0;
    let is_integer = (rk & 0x02) != 0;

    let value = if is_integer {
        ((rk as i32) >> 2) as f64
    } else {
        f64::from_bits(((rk & 0xFFFF_FFFC) as u64) << 32)
    };

    if div100 {
        value / 100.0
    } else {
        value
    }
}

#[inline]
pub fn read_rk(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    read_u32(data, offset).map(decode_rk)
}
