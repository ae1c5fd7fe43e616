//! BIFF8 record stream.
//!
//! A BIFF8 stream is a sequence of records, each with a 4-byte header
//! (2 bytes record type + 2 bytes body length) followed by the body.
//! CONTINUE records (type 0x003C) extend the body of the preceding record
//! beyond the 8224-byte per-record limit.

pub mod parser;
pub mod records;
pub mod strings;

use std::io::{ErrorKind, Read};

use crate::error::{XlsError, XlsResult};

/// A single BIFF8 record with its CONTINUE bodies merged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiffRecord {
    /// Record type ID (e.g. `records::SST`)
    pub record_type: u16,
    /// Record body, CONTINUE bodies appended
    pub data: Vec<u8>,
    /// Offsets into `data` where each merged CONTINUE body starts
    pub continues: Vec<usize>,
    /// Byte offset of the record header in the stream
    pub stream_offset: u64,
}

/// Read every record of a stream, merging CONTINUE records into their parent.
pub fn read_all_records<R: Read>(stream: &mut R) -> XlsResult<Vec<BiffRecord>> {
    let mut records: Vec<BiffRecord> = Vec::new();
    let mut header = [0u8; 4];
    let mut position = 0u64;

    loop {
        match stream.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(XlsError::Io(e)),
        }

        let record_type = u16::from_le_bytes([header[0], header[1]]);
        let body_len = u16::from_le_bytes([header[2], header[3]]) as usize;

        let mut body = vec![0u8; body_len];
        stream.read_exact(&mut body).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => XlsError::Parse(format!(
                "record 0x{record_type:04X} at offset {position} is truncated"
            )),
            _ => XlsError::Io(e),
        })?;

        let stream_offset = position;
        position += 4 + body_len as u64;

        if record_type == records::CONTINUE {
            match records.last_mut() {
                Some(prev) => {
                    prev.continues.push(prev.data.len());
                    prev.data.extend_from_slice(&body);
                }
                None => log::debug!("dropping orphaned CONTINUE at offset {}", stream_offset),
            }
        } else {
            records.push(BiffRecord {
                record_type,
                data: body,
                continues: Vec::new(),
                stream_offset,
            });
        }
    }

    Ok(records)
}

/// Extract `(version, substream_type)` from a BOF record body
pub fn parse_bof(data: &[u8]) -> XlsResult<(u16, u16)> {
    if data.len() < 4 {
        return Err(XlsError::InvalidFormat("BOF record too short".into()));
    }
    let version = u16::from_le_bytes([data[0], data[1]]);
    let dt = u16::from_le_bytes([data[2], data[3]]);
    Ok((version, dt))
}
