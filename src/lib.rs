//! # wikistore
//!
//! A read-only, randomly-accessible dictionary store:
//! - One flat file holding millions of compressed entries
//! - A two-tier index for prefix search and exact key lookup
//! - Only the small first-level index is held in memory
//! - Entries come back as opaque compressed bytes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Store (engine)                          │
//! │          query / lookup_offset / fetch_entry_bytes           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 First-Level Index (RAM)                      │
//! │           4-char row keys → bucket offsets                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!              ┌─────────────────┐          ┌─────────────────┐
//!              │  Second-Level   │ offsets  │  Entry Reader   │
//!              │ (front-coded,   ├─────────►│ (u24 length +   │
//!              │  scanned)       │          │  payload)       │
//!              └────────┬────────┘          └────────┬────────┘
//!                       │                            │
//!                       └─────────► ByteReader ◄─────┘
//!                              (one cursor, Mutex)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use wikistore::Store;
//!
//! let store = Store::open_path(Path::new("wikipedia.wiki"))?;
//! for hit in store.query("ウィキ")? {
//!     println!("{}", hit);
//! }
//! if let Some(offset) = store.lookup_offset("ウィキペディア")? {
//!     let compressed = store.fetch_entry_bytes(offset)?;
//!     println!("{} compressed bytes", compressed.len());
//! }
//! # Ok::<(), wikistore::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod query;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::StoreConfig;
pub use engine::{Store, NOT_FOUND_PAGE};
pub use query::SearchResult;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of wikistore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
