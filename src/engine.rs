//! Engine Module
//!
//! The query engine that coordinates all storage components.
//!
//! ## Responsibilities
//! - Open the store file and validate its trailer
//! - Load the first-level index into memory
//! - Answer prefix queries and exact lookups against the second-level index
//! - Fetch compressed entry bytes by offset

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::query::{encode_query, SearchResult};
use crate::storage::{
    compare_keys, read_entry, ByteReader, FirstLevelIndex, IndexScanner, StoreLayout,
};

/// Reserved key of the page shown when a link target is missing
pub const NOT_FOUND_PAGE: &str = "HTTP_404";

/// Where a forward scan for a key stopped
enum SeekOutcome {
    /// At the first record not sorting before the key
    At(u64),
    /// Ran off the end of the index
    End,
    /// Hit `max_scan_records` first
    BudgetSpent,
}

/// An opened, read-only dictionary store
///
/// ## Concurrency Model: one cursor, serialized operations
///
/// - The layout and first-level index are immutable after `open` and are read
///   without locking.
/// - The file handle has a single cursor. It sits behind a `Mutex` that each
///   public operation holds for its whole seek → scan → read sequence, so
///   concurrent callers never interleave reads.
/// - Each scan owns its previous-key buffer.
///
/// Callers wanting parallel I/O open one `Store` per thread.
pub struct Store<R = File> {
    /// Store configuration
    config: StoreConfig,

    /// Region boundaries decoded from the trailer
    layout: StoreLayout,

    /// In-memory bucket index
    first_level: FirstLevelIndex,

    /// Shared read cursor (exclusive access needed)
    reader: Mutex<ByteReader<R>>,
}

impl Store<File> {
    /// Open the store file named by `config.path`
    ///
    /// Fails if the file cannot be opened or its index is malformed; such a
    /// store is unusable.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let file = File::open(&config.path)?;
        Self::from_source(file, config)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified store path
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = StoreConfig::builder().path(path).build();
        Self::open(config)
    }
}

impl<R: Read + Seek> Store<R> {
    /// Open a store over any random-access byte source
    ///
    /// On open:
    /// 1. Validate the configuration
    /// 2. Read and validate the trailer
    /// 3. Load the first-level index
    pub fn from_source(source: R, config: StoreConfig) -> Result<Self> {
        if config.result_limit == 0 {
            return Err(StoreError::InvalidArgument(
                "result limit must be at least 1".to_string(),
            ));
        }

        let mut reader = ByteReader::with_capacity(config.read_buffer_size, source)?;
        let layout = StoreLayout::read(&mut reader)?;
        let first_level = FirstLevelIndex::read(&mut reader, &layout)?;

        tracing::info!(
            path = %config.path.display(),
            file_len = layout.file_len,
            entries_len = layout.entries_end(),
            second_level_len = layout.records_len(),
            buckets = layout.bucket_count,
            "Store opened"
        );

        Ok(Self {
            config,
            layout,
            first_level,
            reader: Mutex::new(reader),
        })
    }

    /// Prefix search
    ///
    /// Returns up to `result_limit` records whose keys start with `prefix`,
    /// in ascending key order. An empty list means nothing matched.
    pub fn query(&self, prefix: &str) -> Result<Vec<SearchResult>> {
        if prefix.is_empty() {
            return Err(StoreError::InvalidArgument(
                "tried to query for an empty string".to_string(),
            ));
        }

        let prefix = encode_query(prefix);
        let Some(bucket) = self.first_level.bucket_offset(&prefix) else {
            tracing::debug!(prefix = %String::from_utf16_lossy(&prefix), "no bucket for prefix");
            return Ok(Vec::new());
        };

        let mut reader = self.reader.lock();
        let mut scanner = self.scanner_at(&mut *reader, bucket)?;

        // A spent budget truncates a prefix query rather than failing it
        let SeekOutcome::At(offset) = self.seek_to(&mut scanner, &prefix)? else {
            return Ok(Vec::new());
        };

        let first = SearchResult::new(scanner.key().to_vec(), offset);
        if !first.starts_with(&prefix) {
            return Ok(Vec::new());
        }

        let limit = self.config.result_limit;
        let mut results = vec![first];
        while results.len() < limit && !self.budget_spent(&scanner) {
            let Some(record) = scanner.next().transpose()? else {
                break;
            };

            let candidate = SearchResult::from(record);
            if !candidate.starts_with(&prefix) {
                break;
            }
            results.push(candidate);
        }

        tracing::debug!(
            prefix = %String::from_utf16_lossy(&prefix),
            bucket,
            scanned = scanner.scanned(),
            results = results.len(),
            "prefix query"
        );

        Ok(results)
    }

    /// Exact key lookup
    ///
    /// Returns the entry offset stored for `name`, or `None` if the index
    /// holds no such key. Fails with `ScanBudgetExceeded` if the scan budget
    /// runs out before the key is passed.
    pub fn lookup_offset(&self, name: &str) -> Result<Option<u64>> {
        let name = Self::encode_name(name)?;
        let mut reader = self.reader.lock();
        self.lookup_locked(&mut *reader, &name)
    }

    /// Resolve a link target to an entry offset
    ///
    /// Falls back to the `NOT_FOUND_PAGE` entry when `name` is missing.
    pub fn resolve_link(&self, name: &str) -> Result<Option<u64>> {
        let name = Self::encode_name(name)?;
        let mut reader = self.reader.lock();
        self.resolve_locked(&mut *reader, &name)
    }

    /// Fetch the compressed bytes of the entry at `offset`
    pub fn fetch_entry_bytes(&self, offset: u64) -> Result<Bytes> {
        let mut reader = self.reader.lock();
        read_entry(&mut *reader, offset, self.layout.entries_end())
    }

    /// Resolve `name` like a link and fetch its entry in one step
    pub fn fetch_by_name(&self, name: &str) -> Result<Option<Bytes>> {
        let name = Self::encode_name(name)?;
        let mut reader = self.reader.lock();

        match self.resolve_locked(&mut *reader, &name)? {
            Some(offset) => {
                let entry = read_entry(&mut *reader, offset, self.layout.entries_end())?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Region boundaries of this store
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// The in-memory bucket index
    pub fn first_level(&self) -> &FirstLevelIndex {
        &self.first_level
    }

    /// Number of first-level buckets
    pub fn bucket_count(&self) -> usize {
        self.first_level.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn encode_name(name: &str) -> Result<Vec<u16>> {
        if name.is_empty() {
            return Err(StoreError::InvalidArgument(
                "tried to look up an empty name".to_string(),
            ));
        }
        Ok(encode_query(name))
    }

    /// Start a scan at a bucket offset relative to the second-level start
    fn scanner_at<'a>(
        &self,
        reader: &'a mut ByteReader<R>,
        bucket: u32,
    ) -> Result<IndexScanner<'a, R>> {
        let start = self.layout.second_level_start() + bucket as u64;
        IndexScanner::new(reader, start, self.layout.records_end())
    }

    /// Advance to the first record not sorting before `target`
    ///
    /// On `At`, that record's key is left in the scanner.
    fn seek_to(&self, scanner: &mut IndexScanner<'_, R>, target: &[u16]) -> Result<SeekOutcome> {
        while let Some(offset) = scanner.advance()? {
            if compare_keys(scanner.key(), target).is_ge() {
                return Ok(SeekOutcome::At(offset));
            }
            if self.budget_spent(scanner) {
                return Ok(SeekOutcome::BudgetSpent);
            }
        }
        Ok(SeekOutcome::End)
    }

    /// Whether the scan has hit `max_scan_records`
    fn budget_spent(&self, scanner: &IndexScanner<'_, R>) -> bool {
        match self.config.max_scan_records {
            Some(max) if scanner.scanned() >= max => {
                tracing::warn!(max, "scan budget exhausted");
                true
            }
            _ => false,
        }
    }

    fn lookup_locked(&self, reader: &mut ByteReader<R>, name: &[u16]) -> Result<Option<u64>> {
        let Some(bucket) = self.first_level.bucket_offset(name) else {
            return Ok(None);
        };

        let mut scanner = self.scanner_at(reader, bucket)?;
        let found = match self.seek_to(&mut scanner, name)? {
            SeekOutcome::At(offset) if scanner.key() == name => Some(offset),
            SeekOutcome::At(_) | SeekOutcome::End => None,
            SeekOutcome::BudgetSpent => {
                // Unresolved is not absent: no fallback to the not-found page
                return Err(StoreError::ScanBudgetExceeded {
                    max: scanner.scanned(),
                });
            }
        };

        tracing::debug!(
            name = %String::from_utf16_lossy(name),
            bucket,
            scanned = scanner.scanned(),
            found = found.is_some(),
            "exact lookup"
        );

        Ok(found)
    }

    fn resolve_locked(&self, reader: &mut ByteReader<R>, name: &[u16]) -> Result<Option<u64>> {
        if let Some(offset) = self.lookup_locked(reader, name)? {
            return Ok(Some(offset));
        }

        tracing::debug!(
            name = %String::from_utf16_lossy(name),
            "link target missing, falling back to {}",
            NOT_FOUND_PAGE
        );
        self.lookup_locked(reader, &encode_query(NOT_FOUND_PAGE))
    }
}
