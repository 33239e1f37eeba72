//! Error types for wikistore
//!
//! Provides a unified error type for all operations.
//!
//! "Not found" is not an error: a prefix with no bucket yields an empty
//! result list and an unknown name yields `None`.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for wikistore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source ended before a fixed-width field could be read
    #[error("Truncated read at offset {offset}: wanted {wanted} bytes, {available} available")]
    TruncatedRead {
        offset: u64,
        wanted: usize,
        available: u64,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    /// The file does not hold a well-formed store (fatal at open time)
    #[error("Malformed store: {0}")]
    MalformedStore(String),

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    /// An exact lookup hit `max_scan_records` before it could tell whether
    /// the name is present
    #[error("Scan budget exhausted after {max} records")]
    ScanBudgetExceeded { max: usize },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
