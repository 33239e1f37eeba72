//! Store Layout
//!
//! Decodes the file trailer into region boundaries. Every other reader
//! positions itself from a `StoreLayout`.

use std::io::{Read, Seek};

use crate::error::{Result, StoreError};

use super::byte_reader::{u16le, u32le, ByteReader};
use super::first_level::ROW_SIZE;
use super::{FIRST_LEVEL_SIZE_LEN, MAX_SECOND_LEVEL_SIZE, SECOND_LEVEL_SIZE_LEN};

/// Region boundaries of an opened store
///
/// ```text
/// 0 ─ entries ─ second_level_start ─ records ─ records_end ─ u32 ─
///     first_level_start ─ rows ─ u16 ─ file_len
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLayout {
    /// Total file length in bytes
    pub file_len: u64,
    /// First-level rows plus the trailing 2-byte size field
    pub first_level_size: u16,
    /// Second-level records plus the 4-byte size field that follows them
    pub second_level_size: u32,
    /// Number of first-level rows
    pub bucket_count: usize,
}

impl StoreLayout {
    /// Read and validate the trailer of a store
    ///
    /// Any size field out of range is fatal: the store cannot be used.
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Self> {
        let file_len = reader.len();
        if file_len < FIRST_LEVEL_SIZE_LEN {
            return Err(StoreError::MalformedStore(format!(
                "file is {} bytes, too short for a trailer",
                file_len
            )));
        }

        // Trailing u16: size of the first-level region including itself
        reader.seek(file_len - FIRST_LEVEL_SIZE_LEN)?;
        let field = reader.read_exact(FIRST_LEVEL_SIZE_LEN as usize)?;
        let first_level_size = u16le(&field, 0);

        if (first_level_size as u64) < FIRST_LEVEL_SIZE_LEN {
            return Err(StoreError::MalformedStore(format!(
                "invalid first level index size {}",
                first_level_size
            )));
        }

        let rows_len = first_level_size as usize - FIRST_LEVEL_SIZE_LEN as usize;
        if rows_len % ROW_SIZE != 0 {
            return Err(StoreError::MalformedStore(format!(
                "first level index holds {} bytes, not a multiple of the {}-byte row",
                rows_len, ROW_SIZE
            )));
        }

        if file_len < first_level_size as u64 + SECOND_LEVEL_SIZE_LEN {
            return Err(StoreError::MalformedStore(format!(
                "file is {} bytes, too short for a {}-byte first level index",
                file_len, first_level_size
            )));
        }

        // u32 right before the first-level rows: size of the second-level region
        reader.seek(file_len - first_level_size as u64 - SECOND_LEVEL_SIZE_LEN)?;
        let field = reader.read_exact(SECOND_LEVEL_SIZE_LEN as usize)?;
        let second_level_size = u32le(&field, 0);

        if (second_level_size as u64) < SECOND_LEVEL_SIZE_LEN
            || second_level_size > MAX_SECOND_LEVEL_SIZE
        {
            return Err(StoreError::MalformedStore(format!(
                "invalid second level index size {}",
                second_level_size
            )));
        }

        if second_level_size as u64 > file_len - first_level_size as u64 {
            return Err(StoreError::MalformedStore(format!(
                "second level index size {} exceeds the {} bytes before the first level index",
                second_level_size,
                file_len - first_level_size as u64
            )));
        }

        Ok(Self {
            file_len,
            first_level_size,
            second_level_size,
            bucket_count: rows_len / ROW_SIZE,
        })
    }

    /// End of the entries region (exclusive); also the second-level start
    pub fn entries_end(&self) -> u64 {
        self.second_level_start()
    }

    /// Absolute offset of the first second-level record
    pub fn second_level_start(&self) -> u64 {
        self.file_len - self.first_level_size as u64 - self.second_level_size as u64
    }

    /// End of the second-level records (exclusive), where the u32 size sits
    pub fn records_end(&self) -> u64 {
        self.file_len - self.first_level_size as u64 - SECOND_LEVEL_SIZE_LEN
    }

    /// Length of the second-level records in bytes
    pub fn records_len(&self) -> u64 {
        self.second_level_size as u64 - SECOND_LEVEL_SIZE_LEN
    }

    /// Absolute offset of the first-level rows
    pub fn first_level_start(&self) -> u64 {
        self.file_len - self.first_level_size as u64
    }
}
