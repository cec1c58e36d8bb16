//! End-to-end listing resolution against a stubbed HTTP server.

use marketsnap::listing::{resolve_repo_files, ListingError};

const LISTING_BODY: &str = r##"
    <html><body>
    <a href="#">prices_20230101.csv</a>
    <a href="#">prices_20230215.csv</a>
    <a href="#">prices_20221231.csv</a>
    <a href="#">README.md</a>
    </body></html>
"##;

#[test]
fn resolves_listing_page_end_to_end() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/repo/data")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(LISTING_BODY)
        .create();

    let url = format!("{}/repo/data", server.url());
    let listing = resolve_repo_files(&url, ".csv").unwrap();

    mock.assert();
    assert_eq!(listing.max_date.to_string(), "2023-02-15");
    assert_eq!(
        listing.data_urls,
        [
            format!("{url}/prices_20230101.csv"),
            format!("{url}/prices_20230215.csv"),
            format!("{url}/prices_20221231.csv"),
        ]
    );
}

#[test]
fn non_200_status_is_reported_with_url() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/repo/missing")
        .with_status(404)
        .create();

    let url = format!("{}/repo/missing", server.url());
    let err = resolve_repo_files(&url, ".csv").unwrap_err();

    match err {
        ListingError::Status { status, url: u } => {
            assert_eq!(status, 404);
            assert_eq!(u, url);
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[test]
fn listing_without_matches_is_rejected() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/repo/empty")
        .with_status(200)
        .with_body("<html><body><a>README.md</a></body></html>")
        .create();

    let url = format!("{}/repo/empty", server.url());
    let err = resolve_repo_files(&url, ".csv").unwrap_err();
    assert!(matches!(err, ListingError::NoMatchingFiles { .. }));
}

#[test]
fn malformed_url_is_rejected_before_any_request() {
    let err = resolve_repo_files("github.com/user/repo", ".csv").unwrap_err();
    assert!(matches!(err, ListingError::InvalidUrl(_)));
}
