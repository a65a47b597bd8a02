//! reqwest-backed renderer and downloader

use crate::config::FetchConfig;
use crate::fetch::{parse_page, DocumentDownloader, DownloadedDocument, PageRenderer, RenderedPage};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

const DOCUMENT_ACCEPT: &str = "application/pdf,application/octet-stream,*/*";

/// Builds an HTTP client with the harvester's user agent
///
/// # Arguments
///
/// * `user_agent` - Value of the `User-Agent` header
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::ConnectionError(e.to_string())
    }
}

/// Page renderer that GETs the URL and parses the HTML with scraper
///
/// No JavaScript is executed; what the server sends is what gets classified.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.page_timeout_secs),
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RenderError(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await.map_err(classify_request_error)?;
        Ok(parse_page(&body))
    }
}

/// Document downloader returning the raw response body
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.document_timeout_secs),
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentDownloader for HttpDownloader {
    async fn download(&self, url: &str) -> Result<DownloadedDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, DOCUMENT_ACCEPT)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let bytes = response.bytes().await.map_err(classify_request_error)?;

        Ok(DownloadedDocument {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> FetchConfig {
        FetchConfig {
            page_timeout_secs: 5,
            document_timeout_secs: 5,
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("TestHarvester/1.0", Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_render_parses_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fees"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>Fees</title></head><body><p>fee of $25</p><a href=\"/tax\">Tax</a></body></html>",
                "text/html",
            ))
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new(&test_config()).unwrap();
        let page = renderer
            .render(&format!("{}/fees", server.uri()))
            .await
            .unwrap();

        assert_eq!(page.title, "Fees");
        assert_eq!(page.content, "fee of $25");
        assert_eq!(page.links.len(), 1);
    }

    #[tokio::test]
    async fn test_render_server_error_is_render_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new(&test_config()).unwrap();
        let err = renderer
            .render(&format!("{}/rates", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::RenderError("HTTP 503".to_string()));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_download_returns_bytes_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates.pdf"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 test".to_vec(), "application/pdf"),
            )
            .mount(&server)
            .await;

        let downloader = HttpDownloader::new(&test_config()).unwrap();
        let document = downloader
            .download(&format!("{}/rates.pdf", server.uri()))
            .await
            .unwrap();

        assert_eq!(document.content_type, "application/pdf");
        assert_eq!(document.bytes, b"%PDF-1.4 test".to_vec());
    }

    #[tokio::test]
    async fn test_download_not_found_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let downloader = HttpDownloader::new(&test_config()).unwrap();
        let err = downloader
            .download(&format!("{}/missing.pdf", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::HttpStatus { code: 404 });
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_refused_is_connection_error() {
        let renderer = HttpRenderer::new(&test_config()).unwrap();
        let err = renderer.render("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, FetchError::ConnectionError(_)));
    }
}
