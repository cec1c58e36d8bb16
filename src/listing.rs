//! Repository listing resolver.
//!
//! Given the URL of an HTML listing page enumerating data files, extracts
//! the anchor texts matching a filename extension, rewrites the page URL
//! to its raw-content base, and computes the most recent `YYYYMMDD` date
//! encoded in the matched filenames.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;

lazy_static! {
    /// Listing-page URL grammar: an http/https/ftp/ftps scheme, then a
    /// dotted hostname with a valid top-level label, `localhost`, or a
    /// dotted-quad IPv4 address, an optional `:port`, and an optional
    /// path/query. Case-insensitive.
    static ref REPO_URL: Regex = Regex::new(
        r"(?i)^(?:http|ftp)s?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$"
    )
    .expect("repo URL grammar is valid");
}

/// Structured error types for listing resolution.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no files with {ext} in {url}")]
    NoMatchingFiles { ext: String, url: String },

    #[error("no parseable YYYYMMDD date token in {0}")]
    DateParse(String),
}

/// Result of resolving a repository listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoListing {
    /// Direct-download URLs, in document order of the listing page.
    pub data_urls: Vec<String>,
    /// Most recent date encoded in the matched filenames. Formats as ISO
    /// `YYYY-MM-DD` via `Display`.
    pub max_date: NaiveDate,
}

/// Resolve a repository listing page into download URLs and the most
/// recent file date.
///
/// Performs exactly one HTTP GET. Transport failures (timeout, DNS,
/// refused connection) propagate without retry.
pub fn resolve_repo_files(repo_url: &str, ext: &str) -> Result<RepoListing, ListingError> {
    if !is_valid_repo_url(repo_url) {
        return Err(ListingError::InvalidUrl(repo_url.to_string()));
    }

    let raw_base = raw_base_url(repo_url);

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .expect("failed to build HTTP client");

    let resp = client.get(repo_url).send()?;
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(ListingError::Status {
            status: status.as_u16(),
            url: repo_url.to_string(),
        });
    }
    let body = resp.text()?;

    let files = matching_anchors(&body, ext);
    if files.is_empty() {
        return Err(ListingError::NoMatchingFiles {
            ext: ext.to_string(),
            url: repo_url.to_string(),
        });
    }

    let data_urls = files.iter().map(|f| join_url(&raw_base, f)).collect();
    let max_date = max_file_date(&files)?;

    Ok(RepoListing {
        data_urls,
        max_date,
    })
}

/// Check a URL against the listing-page URL grammar.
pub fn is_valid_repo_url(url: &str) -> bool {
    REPO_URL.is_match(url)
}

/// Rewrite a GitHub listing URL to its raw-content base.
///
/// A literal substring transform: swap the github.com prefix for
/// raw.githubusercontent.com and drop every `tree/` occurrence. URLs on
/// other hosts pass through unchanged.
pub fn raw_base_url(repo_url: &str) -> String {
    repo_url
        .replace("https://github.com/", "https://raw.githubusercontent.com/")
        .replace("tree/", "")
}

/// Extract the text of every anchor whose text contains `ext`.
///
/// The needle is lowercased before comparison but anchor text is not, so
/// matching stays case-sensitive on the filename side.
pub fn matching_anchors(html: &str, ext: &str) -> Vec<String> {
    let needle = ext.to_lowercase();
    let document = Html::parse_document(html);
    let anchor = Selector::parse("a").expect("anchor selector is valid");

    document
        .select(&anchor)
        .map(|a| a.text().collect::<String>())
        .filter(|text| text.contains(&needle))
        .collect()
}

/// Numeric maximum of the date tokens across filenames.
///
/// Comparison is numeric, not lexicographic: tokens `9` and `10` yield
/// `10`. Any filename without an integer token is a `DateParse` error,
/// as is an empty input.
pub fn max_date_token(names: &[String]) -> Result<i64, ListingError> {
    let mut max: Option<i64> = None;
    for name in names {
        let token = date_token(name).ok_or_else(|| ListingError::DateParse(name.clone()))?;
        let value: i64 = token
            .parse()
            .map_err(|_| ListingError::DateParse(name.clone()))?;
        max = Some(max.map_or(value, |m| m.max(value)));
    }
    max.ok_or_else(|| ListingError::DateParse(String::new()))
}

/// The numerically maximal date token across filenames, parsed as a
/// `YYYYMMDD` date.
pub fn max_file_date(names: &[String]) -> Result<NaiveDate, ListingError> {
    let max = max_date_token(names)?;
    NaiveDate::parse_from_str(&max.to_string(), "%Y%m%d")
        .map_err(|_| ListingError::DateParse(max.to_string()))
}

/// Date token of a listing filename: the last `_`-delimited piece,
/// stripped of its final `.extension` segment.
fn date_token(name: &str) -> Option<&str> {
    let tail = name.rsplit('_').next().unwrap_or(name);
    let parts: Vec<&str> = tail.split('.').collect();
    if parts.len() < 2 {
        None
    } else {
        Some(parts[parts.len() - 2])
    }
}

/// Path-wise join of a base URL and a filename.
fn join_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── URL grammar ──────────────────────────────────────────────────

    #[test]
    fn grammar_accepts_well_formed_urls() {
        for url in [
            "https://github.com/user/repo/tree/main/data",
            "http://example.com",
            "ftp://example.com/files",
            "ftps://example.com/files",
            "http://localhost:8000/data",
            "http://127.0.0.1:5000/repo",
            "HTTPS://EXAMPLE.COM/PATH?q=1",
            "https://sub.example.co.uk/a/b",
        ] {
            assert!(is_valid_repo_url(url), "should accept {url}");
        }
    }

    #[test]
    fn grammar_rejects_malformed_urls() {
        for url in [
            "github.com/user/repo",
            "htp://example.com",
            "https://",
            "https://nodots",
            "https://example.x",
            "https://example.com/pa th",
            "",
        ] {
            assert!(!is_valid_repo_url(url), "should reject {url}");
        }
    }

    // ── Raw URL rewrite ──────────────────────────────────────────────

    #[test]
    fn rewrites_github_listing_to_raw_base() {
        assert_eq!(
            raw_base_url("https://github.com/user/repo/tree/main/data"),
            "https://raw.githubusercontent.com/user/repo/main/data"
        );
    }

    #[test]
    fn non_github_urls_pass_through() {
        assert_eq!(
            raw_base_url("https://example.com/files"),
            "https://example.com/files"
        );
    }

    // ── Anchor extraction ────────────────────────────────────────────

    const LISTING: &str = r##"
        <html><body>
        <a href="#">a_20230101.csv</a>
        <a href="#">a_20230215.csv</a>
        <a href="#">a_20221231.csv</a>
        <a href="#">readme.md</a>
        <span>b_20230301.csv</span>
        </body></html>
    "##;

    #[test]
    fn anchors_extracted_in_document_order() {
        let files = matching_anchors(LISTING, ".csv");
        assert_eq!(
            files,
            ["a_20230101.csv", "a_20230215.csv", "a_20221231.csv"]
        );
    }

    #[test]
    fn needle_is_lowercased_but_filenames_are_not() {
        let html = r#"<a>a_20230101.csv</a><a>b_20230102.CSV</a>"#;
        // An upper-case needle still matches lower-case filenames...
        assert_eq!(matching_anchors(html, ".CSV"), ["a_20230101.csv"]);
        // ...but upper-case filenames never match.
        assert_eq!(matching_anchors(html, ".csv"), ["a_20230101.csv"]);
    }

    #[test]
    fn non_anchor_text_is_ignored() {
        let files = matching_anchors(LISTING, ".csv");
        assert!(!files.iter().any(|f| f.contains("b_20230301")));
    }

    // ── Date extraction ──────────────────────────────────────────────

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn max_date_is_numeric_not_lexicographic() {
        let max = max_date_token(&names(&["x_9.csv", "x_10.csv"])).unwrap();
        assert_eq!(max, 10);
    }

    #[test]
    fn max_file_date_picks_latest() {
        let date = max_file_date(&names(&[
            "a_20230101.csv",
            "a_20230215.csv",
            "a_20221231.csv",
        ]))
        .unwrap();
        assert_eq!(date.to_string(), "2023-02-15");
    }

    #[test]
    fn missing_token_is_a_date_parse_error() {
        let err = max_file_date(&names(&["a_20230101.csv", "nodate"])).unwrap_err();
        assert!(matches!(err, ListingError::DateParse(_)));
    }

    #[test]
    fn non_numeric_token_is_a_date_parse_error() {
        let err = max_file_date(&names(&["a_final.csv"])).unwrap_err();
        assert!(matches!(err, ListingError::DateParse(_)));
    }

    #[test]
    fn out_of_range_token_is_a_date_parse_error() {
        let err = max_file_date(&names(&["a_20231345.csv"])).unwrap_err();
        assert!(matches!(err, ListingError::DateParse(_)));
    }

    // ── URL join ─────────────────────────────────────────────────────

    #[test]
    fn join_is_path_wise() {
        assert_eq!(
            join_url("https://raw.example.com/repo/", "a.csv"),
            "https://raw.example.com/repo/a.csv"
        );
        assert_eq!(
            join_url("https://raw.example.com/repo", "a.csv"),
            "https://raw.example.com/repo/a.csv"
        );
    }
}
