//! Watchlist configuration — grouped ticker lists.
//!
//! Stored as a TOML file mapping group names to member tickers; the
//! flattened symbol list feeds the series fetcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The complete watchlist configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub groups: BTreeMap<String, Vec<String>>,
}

impl Watchlist {
    /// Load a watchlist from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read watchlist file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a watchlist from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse watchlist TOML: {e}"))
    }

    /// Serialize the watchlist to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize watchlist: {e}"))
    }

    /// Get all symbols across all groups.
    pub fn all_symbols(&self) -> Vec<&str> {
        self.groups
            .values()
            .flat_map(|symbols| symbols.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Get symbols for a specific group.
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(|v| v.as_slice())
    }

    /// Total number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.groups.values().map(|v| v.len()).sum()
    }

    /// Create a default broad-market ETF watchlist.
    pub fn default_etfs() -> Self {
        let mut groups = BTreeMap::new();

        groups.insert(
            "Equity".into(),
            vec!["VTI", "VOO", "VUG", "VTV", "VB", "VYM", "VIG"]
                .into_iter()
                .map(String::from)
                .collect(),
        );

        groups.insert(
            "Bond".into(),
            vec!["BND", "BIV", "BSV"]
                .into_iter()
                .map(String::from)
                .collect(),
        );

        groups.insert(
            "International".into(),
            vec!["VXUS", "VEA", "VWO"]
                .into_iter()
                .map(String::from)
                .collect(),
        );

        Self { groups }
    }
}
