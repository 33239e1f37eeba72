//! Search results

use std::fmt;

use crate::storage::IndexRecord;

/// One prefix-query hit: a display key and where its entry lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Full key as UTF-16 code units
    pub key: Vec<u16>,
    /// Absolute entry offset (fits in 40 bits)
    pub offset: u64,
}

impl SearchResult {
    pub fn new(key: Vec<u16>, offset: u64) -> Self {
        Self { key, offset }
    }

    /// Whether the key begins with `prefix`, code unit for code unit
    ///
    /// A prefix longer than the key never matches.
    pub fn starts_with(&self, prefix: &[u16]) -> bool {
        if prefix.len() > self.key.len() {
            return false;
        }
        self.key[..prefix.len()] == *prefix
    }

    /// Key decoded for display; unpaired surrogates become U+FFFD
    pub fn key_string(&self) -> String {
        String::from_utf16_lossy(&self.key)
    }
}

impl From<IndexRecord> for SearchResult {
    fn from(record: IndexRecord) -> Self {
        Self::new(record.key, record.entry_offset)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.key_string(), self.offset)
    }
}
