//! MarketSnap — batch utilities for assembling dated CSV snapshots of
//! market data.
//!
//! Four independent pieces, composed only by the caller:
//! - Repository listing resolution: validate a listing-page URL, scrape
//!   its file anchors, rewrite to raw download URLs, and extract the most
//!   recent filename-encoded date
//! - Multi-symbol history fetching through an injected [`provider::HistoryClient`]
//! - Dated CSV export named by the table's date range
//! - Symbol metadata indexing over a directory of CSV files
//!
//! Everything is synchronous, blocking, and single-shot; each operation
//! takes its inputs as parameters and returns a fresh result. There is no
//! shared state, no retry policy, and no long-running process.

pub mod export;
pub mod fetch;
pub mod index;
pub mod listing;
pub mod provider;
pub mod watchlist;
pub mod yahoo;

pub use export::{export_history_snapshot, export_table, ExportError};
pub use fetch::{fetch_series, FetchOptions};
pub use index::{build_symbol_index, load_symbol_index, symbol_index, IndexError, SymbolIndex};
pub use listing::{resolve_repo_files, ListingError, RepoListing};
pub use provider::{DataError, FetchProgress, HistoryClient, StdoutProgress};
pub use watchlist::Watchlist;
pub use yahoo::YahooClient;
