//! Integration tests for the download phase
//!
//! These tests use wiremock to serve result pages and documents and check
//! that repeated runs download each document once and keep the ledger
//! free of duplicates.

use doc_harvest::config::{parse_config, Config};
use doc_harvest::crawler::{download_documents, harvest};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(base_url: &str, dir: &Path, extract_strategy: &str) -> Config {
    let toml = format!(
        r#"
[search]
base-url = "{base_url}/sds-search"

[pagination]
total-items = 20
page-size = 10
concurrency-limit = 2

[fetcher]
per-request-timeout = 5

[extract]
strategy = "{extract_strategy}"

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

fn download_anchor(base_url: &str, file: &str) -> String {
    format!(
        r#"<a class="sds-downloadBtn btn" href="{}/files/{}">Download</a>"#,
        base_url, file
    )
}

/// Mounts two result pages linking to three documents
///
/// Pages land in completion order, so both case variants of the duplicated
/// link sit on the same page.
async fn mount_search(server: &MockServer) {
    let base = server.uri();
    let first = format!(
        "<ul><li>{}</li><li>{}</li></ul>",
        download_anchor(&base, "Report-A.pdf"),
        download_anchor(&base, "REPORT-A.pdf")
    );
    let second = format!(
        "<ul><li>{}</li><li>{}</li><li><a href=\"{}/files/unmarked.pdf\">x</a></li></ul>",
        download_anchor(&base, "report-b.pdf"),
        download_anchor(&base, "missing.pdf"),
        base
    );

    Mock::given(method("GET"))
        .and(path("/sds-search"))
        .and(query_param("first", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(first))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sds-search"))
        .and(query_param("first", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(second))
        .mount(server)
        .await;
}

async fn mount_document(server: &MockServer, file: &str, body: &'static [u8], expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{}", file)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(expected)
        .mount(server)
        .await;
}

/// Ledger lines, sorted
fn ledger_lines(dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = std::fs::read_to_string(dir.join("ledger.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

#[tokio::test]
async fn test_harvest_end_to_end() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_document(&server, "Report-A.pdf", b"%PDF a", 1).await;
    mount_document(&server, "report-b.pdf", b"%PDF b", 1).await;
    mount_document(&server, "REPORT-A.pdf", b"%PDF A", 0).await;
    mount_document(&server, "unmarked.pdf", b"%PDF u", 0).await;
    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), "structural");

    let (pages, downloads) = harvest(&config, false).await.unwrap();

    assert_eq!(pages.succeeded, 2);
    assert_eq!(downloads.links_found, 4);
    assert_eq!(downloads.unique_links, 3);
    assert_eq!(downloads.downloaded, 2);
    assert_eq!(downloads.failed, 1);
    assert_eq!(downloads.ledger_appended, 3);

    let docs = dir.path().join("docs");
    assert_eq!(std::fs::read(docs.join("report-a.pdf")).unwrap(), b"%PDF a");
    assert_eq!(std::fs::read(docs.join("report-b.pdf")).unwrap(), b"%PDF b");
    assert!(!docs.join("missing.pdf").exists());

    let base = server.uri().to_lowercase();
    assert_eq!(
        ledger_lines(dir.path()),
        vec![
            format!("{}/files/missing.pdf", base),
            format!("{}/files/report-a.pdf", base),
            format!("{}/files/report-b.pdf", base),
        ]
    );
}

#[tokio::test]
async fn test_rerun_downloads_nothing_new() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_document(&server, "Report-A.pdf", b"%PDF a", 1).await;
    mount_document(&server, "report-b.pdf", b"%PDF b", 1).await;
    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), "structural");

    harvest(&config, false).await.unwrap();
    let ledger_after_first = ledger_lines(dir.path());

    let second = download_documents(&config).await.unwrap();

    assert_eq!(second.downloaded, 0);
    assert_eq!(second.already_present, 2);
    assert_eq!(second.failed, 1);
    assert_eq!(second.ledger_appended, 0);
    assert_eq!(second.ledger_known, 3);
    assert_eq!(ledger_lines(dir.path()), ledger_after_first);
}

#[tokio::test]
async fn test_deleted_document_is_fetched_again() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_document(&server, "Report-A.pdf", b"%PDF a", 2).await;
    mount_document(&server, "report-b.pdf", b"%PDF b", 1).await;
    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), "structural");

    harvest(&config, false).await.unwrap();
    std::fs::remove_file(dir.path().join("docs").join("report-a.pdf")).unwrap();

    let second = download_documents(&config).await.unwrap();

    assert_eq!(second.downloaded, 1);
    assert_eq!(second.ledger_appended, 0);
    assert!(dir.path().join("docs").join("report-a.pdf").exists());
    assert_eq!(ledger_lines(dir.path()).len(), 3);
}

#[tokio::test]
async fn test_pattern_extraction_ignores_marker() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_document(&server, "Report-A.pdf", b"%PDF a", 1).await;
    mount_document(&server, "report-b.pdf", b"%PDF b", 1).await;
    mount_document(&server, "unmarked.pdf", b"%PDF u", 1).await;
    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), "pattern");

    let (_, downloads) = harvest(&config, false).await.unwrap();

    assert_eq!(downloads.unique_links, 4);
    assert_eq!(downloads.downloaded, 3);
    assert!(dir.path().join("docs").join("unmarked.pdf").exists());
}

#[tokio::test]
async fn test_missing_content_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", dir.path(), "structural");

    assert!(download_documents(&config).await.is_err());
    assert!(!dir.path().join("ledger.txt").exists());
}

#[tokio::test]
async fn test_slow_document_is_not_cut_by_page_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/large.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF large".to_vec())
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path(), "structural");
    config.fetcher.per_request_timeout = 1;
    std::fs::write(
        dir.path().join("pages.html"),
        download_anchor(&server.uri(), "large.pdf"),
    )
    .unwrap();

    let stats = download_documents(&config).await.unwrap();

    assert_eq!(stats.downloaded, 1);
    assert_eq!(
        std::fs::read(dir.path().join("docs").join("large.pdf")).unwrap(),
        b"%PDF large"
    );
}
