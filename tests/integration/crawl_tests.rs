//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the target website and run the
//! full crawl cycle end-to-end against the real HTTP capabilities. PDF text
//! extraction is stubbed so the tests do not depend on poppler.

use async_trait::async_trait;
use finharvest::config::Config;
use finharvest::crawler::{crawl, Capabilities, CrawlSession};
use finharvest::fetch::{HttpDownloader, HttpRenderer, PdfTextExtractor};
use finharvest::output::{read_harvest_header, render_summary, DOCUMENTS_DIR};
use finharvest::{ExtractionError, ResourceKind};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Extractor that returns fixed text for any PDF
struct StubExtractor;

#[async_trait]
impl PdfTextExtractor for StubExtractor {
    async fn extract(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Ok(vec![
            "Annual levy summary".to_string(),
            "Total levy $1,200,000".to_string(),
        ])
    }
}

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &TempDir, max_depth: u32) -> Config {
    let mut config = Config::with_output_folder(dir.path().to_string_lossy());
    config.crawl.max_depth = max_depth;
    config.crawl.max_pages = 20;
    config.crawl.politeness_delay_ms = 0; // No pacing in tests
    config.fetch.page_retry_delay_ms = 1;
    config.fetch.backoff_unit_ms = 1;
    config
}

fn capabilities(config: &Config) -> Capabilities {
    Capabilities {
        renderer: Arc::new(HttpRenderer::new(&config.fetch).expect("client")),
        downloader: Arc::new(HttpDownloader::new(&config.fetch).expect("client")),
        extractor: Arc::new(StubExtractor),
    }
}

fn html_page(title: &str, body: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>\n", href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p>\n{}</body></html>",
        title, body, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, html: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_of_small_site() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page(
            "County Portal",
            "Welcome to the county",
            &[
                "/about-us",
                "/tax-rates",
                "/docs/levy.pdf",
                "/parks",
                "/broken",
                "https://other.example/tax",
            ],
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/tax-rates",
        html_page(
            "Tax Rates",
            "Property tax rate of 1.25% applies to all parcels",
            &["/", "/tax-rates/history"],
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/parks",
        html_page("Parks", "Trails and playgrounds", &[]),
        1,
    )
    .await;

    // Generic pages are filtered out of the link tiers
    mount_page(&mock_server, "/about-us", html_page("About", "x", &[]), 0).await;

    // Beyond the depth bound
    mount_page(
        &mock_server,
        "/tax-rates/history",
        html_page("History", "rate of 2% in 1990", &[]),
        0,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/docs/levy.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 fake".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Web pages get two attempts
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&dir, 1);
    let session = CrawlSession::new(&mock_server.uri(), &config, capabilities(&config))
        .expect("session should start");
    let summary = session.run().await;

    assert_eq!(summary.visited_count, 5);
    assert!(summary.skipped.is_empty());

    // Documents are followed before financial links
    assert_eq!(summary.financial_pages.len(), 2);
    let levy = &summary.financial_pages[0];
    assert_eq!(levy.kind, ResourceKind::Pdf);
    assert_eq!(levy.title, "PDF Document - levy.pdf");
    assert!(levy.patterns.contains(&"$1,200,000".to_string()));

    let rates = &summary.financial_pages[1];
    assert_eq!(rates.kind, ResourceKind::WebPage);
    assert_eq!(rates.title, "Tax Rates");
    assert_eq!(rates.depth, 1);
    assert!(rates.patterns.contains(&"1.25%".to_string()));

    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].url.ends_with("/broken"));
    assert!(summary.failed[0].error.starts_with("Max retries exceeded"));

    // Records on disk
    let rates_file = dir.path().join("tax-rates.txt");
    let header = read_harvest_header(&rates_file).expect("rates record");
    assert!(header.is_financial());
    assert_eq!(header.kind, "WEBPAGE");
    assert!(header.content.contains("Property tax rate of 1.25%"));

    let levy_file = dir.path().join(DOCUMENTS_DIR).join("docs_levy.pdf.txt");
    let header = read_harvest_header(&levy_file).expect("levy record");
    assert_eq!(header.kind, "PDF");
    assert!(header.content.contains("--- PAGE 2 ---"));

    // Non-financial pages leave no record
    assert!(!dir.path().join("parks.txt").exists());

    let report = render_summary(&summary);
    assert!(report.contains("Financial Web Pages (1):"));
    assert!(report.contains("Financial Documents (1):"));
    assert!(report.contains("File: documents/docs_levy.pdf.txt"));
}

#[tokio::test]
async fn test_generic_start_url_never_fetched() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/contact",
        html_page("Contact", "fee of $10", &[]),
        0,
    )
    .await;

    let config = create_test_config(&dir, 3);
    let start = format!("{}/contact", mock_server.uri());
    let session = CrawlSession::new(&start, &config, capabilities(&config)).unwrap();
    let summary = session.run().await;

    assert_eq!(summary.skipped, vec![start]);
    assert_eq!(summary.visited_count, 0);
    assert!(summary.failed.is_empty());
    assert!(summary.financial_pages.is_empty());
}

#[tokio::test]
async fn test_pages_linking_to_each_other_fetched_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Start", "Start page", &["/fees", "/permits?page=2", "/fees#top"]),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/fees",
        html_page("Fees", "Permit fee of $45", &["/", "/permits"]),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/permits",
        html_page("Permits", "Apply for permits", &["/fees", "/"]),
        1,
    )
    .await;

    let config = create_test_config(&dir, 5);
    let session = CrawlSession::new(&mock_server.uri(), &config, capabilities(&config)).unwrap();
    let summary = session.run().await;

    assert_eq!(summary.visited_count, 3);
    assert_eq!(summary.financial_pages.len(), 1);
    assert!(dir.path().join("fees.txt").exists());
}

#[tokio::test]
async fn test_crawl_entry_point_with_http_capabilities() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Budget", "The fee schedule for 2024 is attached", &[]),
        1,
    )
    .await;

    let config = create_test_config(&dir, 2);
    let summary = crawl(&mock_server.uri(), &config).await.unwrap();

    assert_eq!(summary.visited_count, 1);
    assert_eq!(summary.financial_pages.len(), 1);
    assert_eq!(summary.financial_pages[0].patterns, vec!["fee schedule"]);

    // The root page is named after the host
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "txt"))
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]
        .file_name()
        .to_string_lossy()
        .starts_with("127_0_0_1"));
}

#[tokio::test]
async fn test_invalid_start_url_rejected() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, 1);

    let result = CrawlSession::new("ftp://x.gov/", &config, capabilities(&config));
    assert!(result.is_err());
}
