//! Configuration for wikistore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Default store file name, looked up relative to the working directory
pub const DEFAULT_STORE_NAME: &str = "wikipedia.wiki";

/// Default cap on the number of prefix-query results
pub const DEFAULT_RESULT_LIMIT: usize = 32;

/// Main configuration for a Store instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the store file. Layout (see `storage`):
    ///   [entries][second-level index][u32][first-level index][u16]
    pub path: PathBuf,

    /// Capacity of the buffered reader used while scanning the index (bytes)
    pub read_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Max results returned by a prefix query
    pub result_limit: usize,

    /// Max second-level records decoded by a single query before giving up.
    /// `None` scans until the comparison terminates the query.
    pub max_scan_records: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_NAME),
            read_buffer_size: 64 * 1024, // 64 KB
            result_limit: DEFAULT_RESULT_LIMIT,
            max_scan_records: None,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the store file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the index scan buffer size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Set the prefix-query result cap
    pub fn result_limit(mut self, limit: usize) -> Self {
        self.config.result_limit = limit;
        self
    }

    /// Bound the number of records a single query may decode
    pub fn max_scan_records(mut self, max: usize) -> Self {
        self.config.max_scan_records = Some(max);
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
