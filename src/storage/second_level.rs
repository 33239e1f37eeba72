//! Second-Level Index Codec
//!
//! Decodes the front-coded stream of (key, entry offset) records.
//!
//! ## Record Format
//! ```text
//! ┌────────────┬────────────┬──────────────────────┬─────────────────┐
//! │ Common (1) │ Remain (1) │ Suffix (2 × Remain)  │ EntryOffset (5) │
//! └────────────┴────────────┴──────────────────────┴─────────────────┘
//! ```
//! `Common` counts the leading code units shared with the previous record's
//! key; the suffix is UTF-16LE. Records are sorted ascending by full key.

use std::cmp::Ordering;
use std::io::{Read, Seek};

use crate::error::{Result, StoreError};

use super::byte_reader::{u16le, u40le, ByteReader};

/// Width of the entry offset that closes each record
pub const ENTRY_OFFSET_WIDTH: usize = 5;

/// Width of the two length bytes that open each record
pub const RECORD_HEADER_SIZE: usize = 2;

/// A fully reconstructed second-level record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Full key as UTF-16 code units
    pub key: Vec<u16>,
    /// Absolute offset of the entry in the entries region
    pub entry_offset: u64,
}

/// Decode the record at the reader's cursor
///
/// `previous_key` must hold the previous record's key and is replaced with
/// this record's key. Returns the record's entry offset. `region_end` is the
/// exclusive end of the second-level records; a record crossing it is
/// malformed.
pub fn decode_next<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    previous_key: &mut Vec<u16>,
    region_end: u64,
) -> Result<u64> {
    let start = reader.position();
    if start + RECORD_HEADER_SIZE as u64 > region_end {
        return Err(overrun(start, region_end));
    }

    let common = reader.read_u8()? as usize;
    let remaining = reader.read_u8()? as usize;

    if common > previous_key.len() {
        return Err(StoreError::MalformedStore(format!(
            "record at {} shares {} characters with a {}-character previous key",
            start,
            common,
            previous_key.len()
        )));
    }

    let suffix_bytes = remaining * 2;
    let body_len = suffix_bytes + ENTRY_OFFSET_WIDTH;
    if reader.position() + body_len as u64 > region_end {
        return Err(overrun(start, region_end));
    }

    // Suffix and offset are contiguous: one read for both
    let body = reader.read_exact(body_len)?;

    previous_key.truncate(common);
    previous_key.extend(body[..suffix_bytes].chunks_exact(2).map(|ch| u16le(ch, 0)));

    Ok(u40le(&body, suffix_bytes))
}

fn overrun(start: u64, region_end: u64) -> StoreError {
    StoreError::MalformedStore(format!(
        "record at {} runs past the end of the second level index at {}",
        start, region_end
    ))
}

/// Order two keys by UTF-16 code unit, unsigned
///
/// Code units are compared pairwise; when one key is a prefix of the other,
/// the shorter sorts first.
pub fn compare_keys(key: &[u16], target: &[u16]) -> Ordering {
    for (a, b) in key.iter().zip(target) {
        match a.cmp(b) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    key.len().cmp(&target.len())
}

// =============================================================================
// Scanner
// =============================================================================

/// Sequential scan over second-level records from a bucket boundary
///
/// Owns the rolling previous-key buffer, so scans started from different
/// buckets never share decoding state.
pub struct IndexScanner<'a, R> {
    reader: &'a mut ByteReader<R>,
    /// Key of the most recently decoded record
    previous_key: Vec<u16>,
    /// Exclusive end of the records region
    end: u64,
    /// Records decoded so far
    scanned: usize,
    /// Set after an error so iteration stops
    failed: bool,
}

impl<'a, R: Read + Seek> IndexScanner<'a, R> {
    /// Position a scanner at absolute offset `start`
    ///
    /// The first record read is expected to carry a zero common-prefix
    /// length, since no previous key is buffered.
    pub fn new(reader: &'a mut ByteReader<R>, start: u64, end: u64) -> Result<Self> {
        reader.seek(start)?;
        Ok(Self {
            reader,
            previous_key: Vec::new(),
            end,
            scanned: 0,
            failed: false,
        })
    }

    /// Decode the next record
    ///
    /// Returns its entry offset, or `None` once the records region is
    /// exhausted. The record's key is then available from `key()`.
    pub fn advance(&mut self) -> Result<Option<u64>> {
        if self.failed || self.reader.position() >= self.end {
            return Ok(None);
        }

        match decode_next(&mut *self.reader, &mut self.previous_key, self.end) {
            Ok(offset) => {
                self.scanned += 1;
                tracing::trace!(
                    key = %String::from_utf16_lossy(&self.previous_key),
                    offset,
                    "decoded index record"
                );
                Ok(Some(offset))
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    /// Key of the most recently decoded record
    pub fn key(&self) -> &[u16] {
        &self.previous_key
    }

    /// Number of records decoded so far
    pub fn scanned(&self) -> usize {
        self.scanned
    }
}

impl<'a, R: Read + Seek> Iterator for IndexScanner<'a, R> {
    type Item = Result<IndexRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(entry_offset)) => Some(Ok(IndexRecord {
                key: self.previous_key.clone(),
                entry_offset,
            })),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
