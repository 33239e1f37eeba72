//! First-Level Index
//!
//! Coarse in-memory index: one fixed-width key per bucket of the
//! second-level index. Built once at open and read-only afterwards.

use std::cmp::Ordering;
use std::io::{Read, Seek};

use crate::error::{Result, StoreError};

use super::byte_reader::{i32le, u16le, ByteReader};
use super::layout::StoreLayout;

/// Characters per row key (UTF-16 code units)
pub const KEY_LENGTH: usize = 4;

/// Encoded bytes per row key
pub const KEY_BYTES: usize = KEY_LENGTH * 2;

/// Bytes per row: key + 4-byte offset
pub const ROW_SIZE: usize = KEY_BYTES + 4;

/// A row key, truncated or zero-padded to `KEY_LENGTH` code units
pub type RowKey = [u16; KEY_LENGTH];

/// Sorted row keys mapped to bucket offsets in the second-level index
#[derive(Debug, Clone)]
pub struct FirstLevelIndex {
    keys: Vec<RowKey>,
    /// Byte offsets relative to the second-level start
    offsets: Vec<u32>,
}

impl FirstLevelIndex {
    /// Build an index from rows already in memory
    ///
    /// Rows must be sorted ascending by key.
    pub fn new(keys: Vec<RowKey>, offsets: Vec<u32>) -> Result<Self> {
        if keys.len() != offsets.len() {
            return Err(StoreError::MalformedStore(format!(
                "first level index has {} keys but {} offsets",
                keys.len(),
                offsets.len()
            )));
        }

        if let Some(i) = keys.windows(2).position(|w| w[0] > w[1]) {
            return Err(StoreError::MalformedStore(format!(
                "first level index rows {} and {} are out of order",
                i,
                i + 1
            )));
        }

        Ok(Self { keys, offsets })
    }

    /// Read the rows located by `layout`
    ///
    /// On disk all keys come first, then all offsets; the two blocks are not
    /// interleaved per row.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>, layout: &StoreLayout) -> Result<Self> {
        let count = layout.bucket_count;
        reader.seek(layout.first_level_start())?;

        let key_block = reader.read_exact(count * KEY_BYTES)?;
        let offset_block = reader.read_exact(count * 4)?;

        let keys = key_block
            .chunks_exact(KEY_BYTES)
            .map(|row| {
                let mut key = [0u16; KEY_LENGTH];
                for (j, ch) in key.iter_mut().enumerate() {
                    *ch = u16le(row, j * 2);
                }
                key
            })
            .collect();

        let records_len = layout.records_len();
        let mut offsets = Vec::with_capacity(count);
        for (i, raw) in offset_block.chunks_exact(4).enumerate() {
            let offset = i32le(raw, 0);
            if offset < 0 || offset as u64 > records_len {
                return Err(StoreError::MalformedStore(format!(
                    "first level row {} points to {}, outside the {}-byte second level index",
                    i, offset, records_len
                )));
            }
            offsets.push(offset as u32);
        }

        Self::new(keys, offsets)
    }

    /// Number of rows (buckets)
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Row key at `index`
    pub fn key(&self, index: usize) -> Option<&RowKey> {
        self.keys.get(index)
    }

    /// Bucket offset at `index`
    pub fn offset(&self, index: usize) -> Option<u32> {
        self.offsets.get(index).copied()
    }

    /// Find the bucket to start scanning from for `query`
    ///
    /// Returns the offset of the last row that does not sort after the query
    /// under `compare_fixed_width`. `None` if even the first row sorts after
    /// it; the last row's offset if the query sorts after every row.
    pub fn bucket_offset(&self, query: &[u16]) -> Option<u32> {
        // Rows are sorted, so "row sorts after query" flips from false to
        // true exactly once.
        let after = self
            .keys
            .partition_point(|row| compare_fixed_width(row, query) != Ordering::Greater);

        if after == 0 {
            None
        } else {
            Some(self.offsets[after - 1])
        }
    }
}

/// Compare a row key against a query string
///
/// Only the first `min(KEY_LENGTH, query.len())` code units are compared. On
/// a tie the result is the sign of `KEY_LENGTH - query.len()`: the row sorts
/// after any shorter query, equal to a query of exactly `KEY_LENGTH` units,
/// and before any longer one. The index was encoded against this rule.
pub fn compare_fixed_width(row: &RowKey, query: &[u16]) -> Ordering {
    let n = query.len().min(KEY_LENGTH);

    match row[..n].cmp(&query[..n]) {
        Ordering::Equal => KEY_LENGTH.cmp(&query.len()),
        other => other,
    }
}

/// Truncate or zero-pad code units into a row key
pub fn row_key(units: &[u16]) -> RowKey {
    let mut key = [0u16; KEY_LENGTH];
    for (slot, &ch) in key.iter_mut().zip(units) {
        *slot = ch;
    }
    key
}
