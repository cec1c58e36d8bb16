//! Dated CSV export.
//!
//! Filenames carry the date range of the exported table:
//! `{prefix}_{min:%Y%m%d}_{max:%Y%m%d}.csv`, with min/max computed from
//! the `Date` column at export time. The only recovered failure in the
//! crate lives here: an unusable export path falls back to the current
//! working directory.

use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed prefix for the daily history snapshot variant.
pub const HISTORY_PREFIX: &str = "etf_hist-daily";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no new data to export")]
    NoNewData,

    #[error("Date column has no values")]
    EmptyDates,

    #[error("frame error: {0}")]
    Frame(String),

    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PolarsError> for ExportError {
    fn from(e: PolarsError) -> Self {
        ExportError::Frame(e.to_string())
    }
}

/// Min and max of the table's `Date` column.
pub fn date_range(df: &DataFrame) -> Result<(NaiveDate, NaiveDate), ExportError> {
    let dates = df.column("Date")?.date()?;
    let min = dates.min().ok_or(ExportError::EmptyDates)?;
    let max = dates.max().ok_or(ExportError::EmptyDates)?;

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    Ok((
        epoch + chrono::Duration::days(min as i64),
        epoch + chrono::Duration::days(max as i64),
    ))
}

/// Build the dated filename for a table.
pub fn snapshot_filename(df: &DataFrame, prefix: &str) -> Result<String, ExportError> {
    let (min, max) = date_range(df)?;
    Ok(format!(
        "{prefix}_{}_{}.csv",
        min.format("%Y%m%d"),
        max.format("%Y%m%d")
    ))
}

/// Export a table as `{prefix}_{min}_{max}.csv` and return the path
/// written.
///
/// With an export path, a failed write there falls back to the current
/// working directory with a diagnostic; without one the current
/// directory is used outright. A single-day range is allowed and yields
/// a single-day filename.
pub fn export_table(
    df: &DataFrame,
    prefix: &str,
    export_path: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let filename = snapshot_filename(df, prefix)?;
    let path = write_with_fallback(df, &filename, export_path)?;
    println!("{filename}");
    Ok(path)
}

/// Export the daily history snapshot under its fixed prefix.
///
/// A single-day range means nothing beyond one day was fetched, so the
/// export is refused with `NoNewData`.
pub fn export_history_snapshot(
    df: &DataFrame,
    export_path: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let (min, max) = date_range(df)?;
    if min == max {
        return Err(ExportError::NoNewData);
    }
    export_table(df, HISTORY_PREFIX, export_path)
}

fn write_with_fallback(
    df: &DataFrame,
    filename: &str,
    export_path: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    if let Some(dir) = export_path {
        let target = dir.join(filename);
        match write_csv(df, &target) {
            Ok(()) => return Ok(target),
            Err(e) => {
                eprintln!(
                    "invalid export path {}: {e}, exporting to current directory",
                    dir.display()
                );
            }
        }
    }

    let target = PathBuf::from(filename);
    write_csv(df, &target)?;
    Ok(target)
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<(), ExportError> {
    let file = fs::File::create(path)?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df.clone())?;
    Ok(())
}
