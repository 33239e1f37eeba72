//! Query Module
//!
//! Result types handed to callers of the store.
//!
//! Queries operate on UTF-16 code units, the unit the index was encoded in;
//! strings are converted once at the API boundary.

mod result;

pub use result::SearchResult;

/// Encode a query string as UTF-16 code units
pub fn encode_query(query: &str) -> Vec<u16> {
    query.encode_utf16().collect()
}
