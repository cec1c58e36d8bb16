//! Multi-symbol fetch loop — pulls each symbol through the injected
//! client and concatenates the results into one table.

use chrono::NaiveDate;
use polars::functions::concat_df_diagonal;
use polars::prelude::*;
use std::thread;
use std::time::Duration;

use crate::provider::{DataError, FetchProgress, HistoryClient};

/// Options for a multi-symbol fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Fixed pause between per-symbol requests. A courtesy delay to the
    /// provider, not adaptive backoff.
    pub pause: Duration,
}

/// Fetch history for every symbol and concatenate into one table.
///
/// Symbols are fetched strictly in input order and a `Symbol` column is
/// inserted as the second column of each per-symbol frame before
/// concatenation, so the output rows group by symbol in input order.
/// Columns absent from some frames are null-filled in the result. The
/// first failing symbol aborts the whole fetch — no partial result.
pub fn fetch_series(
    client: &dyn HistoryClient,
    symbols: &[&str],
    opts: &FetchOptions,
    progress: Option<&dyn FetchProgress>,
) -> Result<DataFrame, DataError> {
    if symbols.is_empty() {
        return Err(DataError::EmptySymbols);
    }

    let total = symbols.len();
    let mut frames = Vec::with_capacity(total);

    for (i, symbol) in symbols.iter().enumerate() {
        if let Some(p) = progress {
            p.on_symbol(symbol, i, total);
        }

        let mut df = client.history(symbol, opts.start, opts.end)?;
        let tags = vec![symbol.to_string(); df.height()];
        df.insert_column(1, Column::new("Symbol".into(), tags))?;
        frames.push(df);

        if !opts.pause.is_zero() {
            thread::sleep(opts.pause);
        }
    }

    Ok(concat_df_diagonal(&frames)?)
}
