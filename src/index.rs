//! Symbol metadata index.
//!
//! Builds a nested source → symbol → column mapping from a directory of
//! CSV files, optionally persisted to `symbols.json` in that directory
//! and reloadable verbatim on later runs.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column → value mapping for one symbol row.
pub type SymbolRecord = BTreeMap<String, Value>;

/// Source file (stem) → symbol → record.
pub type SymbolIndex = BTreeMap<String, BTreeMap<String, SymbolRecord>>;

/// Name of the serialized index inside the source directory.
pub const INDEX_FILENAME: &str = "symbols.json";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("invalid path_to_files: path is empty")]
    InvalidPath,

    #[error("no such file or directory {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no symbol column in {}", .0.display())]
    MissingSymbolColumn(PathBuf),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build or reload the symbol index for a directory of CSV files.
///
/// `create_new` rebuilds the index from the CSV files (optionally
/// persisting it to `symbols.json`); otherwise a previously serialized
/// index is loaded verbatim. The index is never partially updated.
pub fn symbol_index(
    create_new: bool,
    dir: &Path,
    export_json: bool,
) -> Result<SymbolIndex, IndexError> {
    if create_new {
        build_symbol_index(dir, export_json)
    } else {
        load_symbol_index(dir)
    }
}

/// Build the index from every `*.csv` directly inside `dir`.
///
/// The source key is the filename without extension. Each file must carry
/// a `symbol` column; every other column maps to that row's value. When a
/// symbol repeats within one file, the first row wins.
pub fn build_symbol_index(dir: &Path, export_json: bool) -> Result<SymbolIndex, IndexError> {
    if dir.as_os_str().is_empty() {
        return Err(IndexError::InvalidPath);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    paths.sort();

    let mut index = SymbolIndex::new();
    for path in &paths {
        let source = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        index.insert(source, read_symbol_records(path)?);
    }

    if export_json {
        let json = serde_json::to_string_pretty(&index)?;
        fs::write(dir.join(INDEX_FILENAME), json)?;
    }

    Ok(index)
}

/// Load a previously serialized index from `{dir}/symbols.json`.
///
/// The parsed mapping is returned as-is — no schema validation beyond
/// JSON shape.
pub fn load_symbol_index(dir: &Path) -> Result<SymbolIndex, IndexError> {
    if dir.as_os_str().is_empty() {
        return Err(IndexError::InvalidPath);
    }

    let path = dir.join(INDEX_FILENAME);
    if !path.exists() {
        return Err(IndexError::FileNotFound(path));
    }

    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read one CSV file into symbol → record form.
fn read_symbol_records(path: &Path) -> Result<BTreeMap<String, SymbolRecord>, IndexError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let symbol_idx = headers
        .iter()
        .position(|h| h == "symbol")
        .ok_or_else(|| IndexError::MissingSymbolColumn(path.to_path_buf()))?;

    let mut records: BTreeMap<String, SymbolRecord> = BTreeMap::new();
    for row in reader.records() {
        let row = row?;
        let symbol = row.get(symbol_idx).unwrap_or_default().to_string();
        records.entry(symbol).or_insert_with(|| {
            headers
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != symbol_idx)
                .map(|(i, h)| (h.to_string(), infer_scalar(row.get(i).unwrap_or_default())))
                .collect()
        });
    }

    Ok(records)
}

/// Infer a JSON scalar from a CSV cell: integer, then float, else string.
fn infer_scalar(cell: &str) -> Value {
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::from(cell)
}
