//! History client trait and structured error types.
//!
//! The HistoryClient trait abstracts over market-data sources (Yahoo
//! Finance, fixtures, mocks) so the fetch loop can swap implementations
//! and tests never touch the network.

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

/// Structured error type for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} for {symbol}")]
    Status { status: u16, symbol: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("no symbols to fetch")]
    EmptySymbols,

    #[error("frame error: {0}")]
    Frame(String),
}

impl From<PolarsError> for DataError {
    fn from(e: PolarsError) -> Self {
        DataError::Frame(e.to_string())
    }
}

/// Trait for history clients (Yahoo Finance, fixtures, mocks).
///
/// One capability: fetch daily history for a single symbol, optionally
/// bounded on either side. `None` means "as far as the provider goes" on
/// that side. Orchestration sits above this trait — clients know nothing
/// about symbol lists, pacing, or export.
pub trait HistoryClient: Send + Sync {
    /// Human-readable name of this client.
    fn name(&self) -> &str;

    /// Fetch daily history for one symbol as a table whose first column
    /// is `Date`. The remaining columns are provider-specific.
    fn history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DataFrame, DataError>;
}

/// Progress callback for multi-symbol fetches.
pub trait FetchProgress: Send {
    /// Called before each symbol is fetched. `index` is zero-based.
    fn on_symbol(&self, symbol: &str, index: usize, total: usize);
}

/// Progress reporter that prints one `{n}/{total} {symbol}` line per symbol.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_symbol(&self, symbol: &str, index: usize, total: usize) {
        println!("{}/{} {symbol}", index + 1, total);
    }
}
