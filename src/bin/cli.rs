//! wikistore CLI
//!
//! Command-line interface for searching a store and printing its entries.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flate2::read::ZlibDecoder;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use wikistore::config::{DEFAULT_RESULT_LIMIT, DEFAULT_STORE_NAME};
use wikistore::{SearchResult, Store, StoreConfig};

/// wikistore CLI
#[derive(Parser, Debug)]
#[command(name = "wikistore-cli")]
#[command(about = "Search and read a wikistore dictionary file")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = DEFAULT_STORE_NAME)]
    store: PathBuf,

    /// Maximum number of search results
    #[arg(short, long, default_value_t = DEFAULT_RESULT_LIMIT)]
    limit: usize,

    /// Print search and lookup output as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List keys starting with a prefix
    Search {
        /// The prefix to search for
        prefix: String,
    },

    /// Print the entry offset of an exact key
    Lookup {
        /// The key to look up
        name: String,
    },

    /// Print the entry at an offset
    Entry {
        /// Absolute entry offset
        offset: u64,

        /// Write the compressed bytes instead of inflating them
        #[arg(long)]
        raw: bool,
    },

    /// Print the entry for a key, falling back to the not-found page
    Show {
        /// The key to show
        name: String,

        /// Write the compressed bytes instead of inflating them
        #[arg(long)]
        raw: bool,
    },

    /// Print the store layout
    Info,
}

/// JSON shape of a search hit
#[derive(Serialize)]
struct Hit {
    key: String,
    offset: u64,
}

impl From<&SearchResult> for Hit {
    fn from(result: &SearchResult) -> Self {
        Self {
            key: result.key_string(),
            offset: result.offset,
        }
    }
}

fn main() {
    // Initialize tracing/logging (stderr, so entry output stays clean)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,wikistore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Execute the command; `Ok(false)` means the key was not found
fn run(args: Args) -> wikistore::Result<bool> {
    let config = StoreConfig::builder()
        .path(&args.store)
        .result_limit(args.limit)
        .build();
    let store = Store::open(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Search { prefix } => {
            let results = store.query(&prefix)?;
            if args.json {
                let hits: Vec<Hit> = results.iter().map(Hit::from).collect();
                serde_json::to_writer_pretty(&mut out, &hits).map_err(io::Error::from)?;
                writeln!(out)?;
            } else {
                for result in &results {
                    writeln!(out, "{}\t{}", result.key_string(), result.offset)?;
                }
            }
            Ok(true)
        }
        Commands::Lookup { name } => match store.lookup_offset(&name)? {
            Some(offset) => {
                if args.json {
                    let hit = Hit { key: name, offset };
                    serde_json::to_writer_pretty(&mut out, &hit).map_err(io::Error::from)?;
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}", offset)?;
                }
                Ok(true)
            }
            None => {
                tracing::warn!("{} not found", name);
                Ok(false)
            }
        },
        Commands::Entry { offset, raw } => {
            let entry = store.fetch_entry_bytes(offset)?;
            write_entry(&mut out, &entry, raw)?;
            Ok(true)
        }
        Commands::Show { name, raw } => match store.fetch_by_name(&name)? {
            Some(entry) => {
                write_entry(&mut out, &entry, raw)?;
                Ok(true)
            }
            None => {
                tracing::warn!("{} not found and the store has no not-found page", name);
                Ok(false)
            }
        },
        Commands::Info => {
            let layout = store.layout();
            writeln!(out, "File length:          {} bytes", layout.file_len)?;
            writeln!(out, "Entries:              0..{}", layout.entries_end())?;
            writeln!(
                out,
                "Second level index:   {}..{} ({} bytes)",
                layout.second_level_start(),
                layout.records_end(),
                layout.records_len()
            )?;
            writeln!(
                out,
                "First level index:    {}..{} ({} buckets)",
                layout.first_level_start(),
                layout.file_len,
                layout.bucket_count
            )?;
            Ok(true)
        }
    }
}

/// Entries are zlib-compressed documents
fn write_entry(out: &mut impl Write, entry: &[u8], raw: bool) -> io::Result<()> {
    if raw {
        return out.write_all(entry);
    }

    let mut document = Vec::new();
    ZlibDecoder::new(entry).read_to_end(&mut document)?;
    out.write_all(&document)?;
    out.flush()
}
