//! Entry Reader
//!
//! Slices one compressed entry out of the entries region. The payload is
//! returned as-is; inflating and parsing it is the caller's business.

use std::io::{Read, Seek};

use bytes::Bytes;

use crate::error::{Result, StoreError};

use super::byte_reader::{u24le, ByteReader};

/// Width of the length prefix in front of each entry
pub const ENTRY_LENGTH_WIDTH: usize = 3;

/// Read the entry at absolute `offset`
///
/// Reads a 3-byte little-endian length, then exactly that many payload
/// bytes. `entries_end` is the exclusive end of the entries region.
pub fn read_entry<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    offset: u64,
    entries_end: u64,
) -> Result<Bytes> {
    let payload_start = offset
        .checked_add(ENTRY_LENGTH_WIDTH as u64)
        .filter(|&start| start <= entries_end)
        .ok_or_else(|| {
            StoreError::InvalidArgument(format!(
                "entry offset {} is outside the {}-byte entries region",
                offset, entries_end
            ))
        })?;

    reader.seek(offset)?;
    let mut prefix = [0u8; ENTRY_LENGTH_WIDTH];
    reader.read_into(&mut prefix)?;
    let len = u24le(&prefix, 0) as u64;

    if payload_start + len > entries_end {
        return Err(StoreError::MalformedStore(format!(
            "entry at {} declares {} bytes, past the end of the entries region at {}",
            offset, len, entries_end
        )));
    }

    let payload = reader.read_exact(len as usize)?;
    Ok(Bytes::from(payload))
}
