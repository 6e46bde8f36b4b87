//! Integration tests for the pagination phase
//!
//! These tests use wiremock to serve a paginated search endpoint and drive
//! the page fetching phase end-to-end.

use doc_harvest::config::{parse_config, Config};
use doc_harvest::crawler::fetch_pages;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock search endpoint
fn create_test_config(base_url: &str, total_items: u64, dir: &Path) -> Config {
    let toml = format!(
        r#"
[search]
base-url = "{base_url}/sds-search"

[[search.query]]
name = "countryCode"
value = "United States"

[pagination]
total-items = {total_items}
page-size = 10
concurrency-limit = 3

[fetcher]
user-agent = "doc-harvest-test/1.0"
per-request-timeout = 5

[output]
output-path = '{output}'
download-dir = '{downloads}'
ledger-path = '{ledger}'
"#,
        output = dir.join("pages.html").display(),
        downloads = dir.join("docs").display(),
        ledger = dir.join("ledger.txt").display(),
    );
    parse_config(&toml).expect("Failed to parse test config")
}

/// Mounts one result page at the given offset
async fn mount_page(server: &MockServer, offset: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path("/sds-search"))
        .and(query_param("countryCode", "United States"))
        .and(query_param("first", offset.to_string()))
        .and(header("user-agent", "doc-harvest-test/1.0"))
        .respond_with(
            ResponseTemplate::new(status).set_body_string(format!("<section data-first=\"{}\"/>", offset)),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn page_marker(offset: u64) -> String {
    format!("<section data-first=\"{}\"/>", offset)
}

#[tokio::test]
async fn test_fetches_every_page_once() {
    let server = MockServer::start().await;
    for offset in (0..50).step_by(10) {
        mount_page(&server, offset, 200).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 45, dir.path());

    let stats = fetch_pages(&config, false).await.unwrap();

    assert_eq!(stats.attempted, 5);
    assert_eq!(stats.succeeded, 5);
    assert_eq!(stats.failed, 0);

    let content = std::fs::read_to_string(dir.path().join("pages.html")).unwrap();
    for offset in (0..50).step_by(10) {
        assert_eq!(content.matches(&page_marker(offset)).count(), 1);
    }
}

#[tokio::test]
async fn test_failed_pages_are_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 200).await;
    mount_page(&server, 10, 500).await;
    mount_page(&server, 20, 404).await;
    mount_page(&server, 30, 200).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 40, dir.path());

    let stats = fetch_pages(&config, false).await.unwrap();

    assert_eq!(stats.attempted, 4);
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 2);

    let content = std::fs::read_to_string(dir.path().join("pages.html")).unwrap();
    assert!(content.contains(&page_marker(0)));
    assert!(content.contains(&page_marker(30)));
    assert!(!content.contains(&page_marker(10)));
    assert!(!content.contains(&page_marker(20)));
}

#[tokio::test]
async fn test_rerun_appends_unless_fresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sds-search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>page</p>"))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 10, dir.path());
    let output = dir.path().join("pages.html");

    fetch_pages(&config, false).await.unwrap();
    fetch_pages(&config, false).await.unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "<p>page</p><p>page</p>");

    fetch_pages(&config, true).await.unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "<p>page</p>");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", 20, dir.path());

    let stats = fetch_pages(&config, false).await.unwrap();

    assert_eq!(stats.attempted, 2);
    assert_eq!(stats.failed, 2);
    assert_eq!(std::fs::read_to_string(dir.path().join("pages.html")).unwrap(), "");
}
