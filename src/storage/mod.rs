//! Storage Module
//!
//! Read side of the store file format.
//!
//! ## Responsibilities
//! - Random-access reads and little-endian decoding
//! - Trailer validation and region boundaries
//! - First-level (bucket) index
//! - Front-coded second-level index decoding
//! - Slicing compressed entries
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Entries (variable)                                      │
//! │   [Len: u24][Payload: Len bytes, zlib-compressed]       │
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Second-Level Index (variable, sorted by key)            │
//! │   [Common: u8][Remain: u8][Suffix: UTF-16LE][Off: u40]  │
//! │   ... repeated for each key ...                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ Second-Level Size: u32 (records + this field)           │
//! ├─────────────────────────────────────────────────────────┤
//! │ First-Level Index (12 bytes per row, sorted by key)     │
//! │   [Key: 4 × UTF-16LE] × N, then [Offset: i32] × N       │
//! ├─────────────────────────────────────────────────────────┤
//! │ First-Level Size: u16 (rows + this field)               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

mod byte_reader;
mod entry;
mod first_level;
mod layout;
mod second_level;

pub use byte_reader::{i32le, u16le, u24le, u32le, u40le, ByteReader};
pub use entry::{read_entry, ENTRY_LENGTH_WIDTH};
pub use first_level::{
    compare_fixed_width, row_key, FirstLevelIndex, RowKey, KEY_BYTES, KEY_LENGTH, ROW_SIZE,
};
pub use layout::StoreLayout;
pub use second_level::{
    compare_keys, decode_next, IndexRecord, IndexScanner, ENTRY_OFFSET_WIDTH, RECORD_HEADER_SIZE,
};

// =============================================================================
// Shared Constants
// =============================================================================

/// Width of the trailing first-level size field
pub(crate) const FIRST_LEVEL_SIZE_LEN: u64 = 2;

/// Width of the second-level size field
pub(crate) const SECOND_LEVEL_SIZE_LEN: u64 = 4;

/// Largest accepted second-level size (1 GiB)
pub(crate) const MAX_SECOND_LEVEL_SIZE: u32 = 1 << 30;
