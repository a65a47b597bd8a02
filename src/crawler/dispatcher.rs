//! Fetch dispatcher
//!
//! Routes a URL to one of three retrieval paths and applies the matching
//! retry policy:
//!
//! | Kind | Capability | Attempts | Delay between attempts |
//! |------|------------|----------|------------------------|
//! | Web page | renderer | 2 | fixed 3s |
//! | PDF | downloader + extractor | 3 | 1, 2, 4, ... units |
//! | Other document | downloader | 1 | none |
//!
//! A PDF that downloads but cannot be read still succeeds: its content is
//! replaced by a note so a file is left for manual review.

use crate::config::FetchConfig;
use crate::crawler::retry::RetryPolicy;
use crate::fetch::{
    file_name_of, truncate_chars, DocumentDownloader, DownloadedDocument, PageRenderer,
    PageResult, PdfExtraction, PdfTextExtractor,
};
use crate::url::{classify_resource, ResourceKind};
use crate::{ExtractionError, FetchError};
use std::sync::Arc;

/// Bytes of an office document shown in its metadata block
pub const DOCUMENT_PREVIEW_BYTES: usize = 500;

/// A fetch that ended in the `Failed` state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub kind: ResourceKind,
    pub error: FetchError,
    pub attempts: u32,
}

impl FetchFailure {
    pub fn new(url: &str, kind: ResourceKind, error: FetchError, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            kind,
            error,
            attempts,
        }
    }

    /// Human-readable reason recorded in the failed-pages list
    pub fn message(&self) -> String {
        let detail = self.error.to_string();
        match (self.kind, &self.error) {
            (ResourceKind::Pdf, FetchError::Timeout) => {
                "Timeout after multiple attempts".to_string()
            }
            (ResourceKind::Pdf, FetchError::ConnectionError(e)) => {
                format!("Connection failed: {}", truncate_chars(e, 100))
            }
            (ResourceKind::Pdf, _) => truncate_chars(&detail, 200).to_string(),
            (ResourceKind::WebPage, e) if e.is_transient() => {
                format!("Max retries exceeded: {}", truncate_chars(&detail, 100))
            }
            _ => truncate_chars(&detail, 100).to_string(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for FetchFailure {}

/// Chooses the retrieval path for each URL and runs it
pub struct Dispatcher {
    renderer: Arc<dyn PageRenderer>,
    downloader: Arc<dyn DocumentDownloader>,
    extractor: Arc<dyn PdfTextExtractor>,
    page_policy: RetryPolicy,
    pdf_policy: RetryPolicy,
    document_policy: RetryPolicy,
}

impl Dispatcher {
    /// Creates a dispatcher with retry budgets taken from `config`
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        downloader: Arc<dyn DocumentDownloader>,
        extractor: Arc<dyn PdfTextExtractor>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            renderer,
            downloader,
            extractor,
            page_policy: RetryPolicy::fixed(config.page_attempts, config.page_retry_delay()),
            pdf_policy: RetryPolicy::exponential(config.pdf_attempts, config.backoff_unit()),
            document_policy: RetryPolicy::once(),
        }
    }

    /// Fetches `url` along the path its kind calls for
    ///
    /// # Returns
    ///
    /// * `Ok(PageResult)` - The fetch reached `Success`
    /// * `Err(FetchFailure)` - The fetch reached `Failed`
    pub async fn dispatch(&self, url: &str) -> Result<PageResult, FetchFailure> {
        self.dispatch_as(url, classify_resource(url)).await
    }

    /// Fetches `url` along the path for `kind`, whatever the URL looks like
    pub async fn dispatch_as(
        &self,
        url: &str,
        kind: ResourceKind,
    ) -> Result<PageResult, FetchFailure> {
        match kind {
            ResourceKind::WebPage => self.fetch_web_page(url).await,
            ResourceKind::Pdf => self.fetch_pdf(url).await,
            ResourceKind::Document => self.fetch_document(url).await,
        }
    }

    async fn fetch_web_page(&self, url: &str) -> Result<PageResult, FetchFailure> {
        let outcome = self.page_policy.run(|_| self.renderer.render(url)).await;
        let attempts = outcome.attempts;

        let page = outcome
            .result
            .map_err(|error| FetchFailure::new(url, ResourceKind::WebPage, error, attempts))?;
        if page.content.trim().is_empty() {
            return Err(FetchFailure::new(
                url,
                ResourceKind::WebPage,
                FetchError::EmptyContent,
                attempts,
            ));
        }

        Ok(PageResult::WebPage {
            url: url.to_string(),
            title: page.title,
            content: page.content,
            links: page.links,
        })
    }

    async fn fetch_pdf(&self, url: &str) -> Result<PageResult, FetchFailure> {
        tracing::info!("Processing PDF: {}", url);

        let outcome = self.pdf_policy.run(|_| self.downloader.download(url)).await;
        let attempts = outcome.attempts;

        let document = outcome
            .result
            .map_err(|error| FetchFailure::new(url, ResourceKind::Pdf, error, attempts))?;
        if !document.content_type.contains("pdf") && !url.to_lowercase().ends_with(".pdf") {
            return Err(FetchFailure::new(
                url,
                ResourceKind::Pdf,
                FetchError::InvalidContentType(document.content_type),
                attempts,
            ));
        }

        tracing::info!("PDF downloaded: {} bytes", document.bytes.len());
        Ok(self.read_pdf(url, document).await)
    }

    /// Turns downloaded PDF bytes into a result, degrading instead of failing
    async fn read_pdf(&self, url: &str, document: DownloadedDocument) -> PageResult {
        let name = file_name_of(url);
        let file_size = document.bytes.len();

        match self.extractor.extract(&document.bytes).await {
            Ok(pages) if pages.iter().any(|text| !text.trim().is_empty()) => {
                let content = tag_pages(&pages);
                tracing::info!(
                    "Extracted {} characters from {} PDF pages",
                    content.len(),
                    pages.len()
                );
                PageResult::Pdf {
                    url: url.to_string(),
                    title: format!("PDF Document - {}", name),
                    content,
                    file_size,
                    extraction: PdfExtraction::Text { pages: pages.len() },
                }
            }
            Ok(pages) => {
                tracing::warn!("No text could be extracted from {}", url);
                no_text_result(url, &document, Some(pages.len()))
            }
            Err(ExtractionError::NoExtractableText) => {
                tracing::warn!("No text could be extracted from {}", url);
                no_text_result(url, &document, None)
            }
            Err(e) => {
                tracing::warn!("PDF processing failed for {}: {}", url, e);
                let error = e.to_string();
                PageResult::Pdf {
                    url: url.to_string(),
                    title: format!("PDF Document (Processing Error) - {}", name),
                    content: processing_error_note(url, file_size, &error),
                    file_size,
                    extraction: PdfExtraction::Failed { error },
                }
            }
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<PageResult, FetchFailure> {
        tracing::info!("Processing document: {}", url);

        let outcome = self
            .document_policy
            .run(|_| self.downloader.download(url))
            .await;
        let attempts = outcome.attempts;

        let document = outcome
            .result
            .map_err(|error| FetchFailure::new(url, ResourceKind::Document, error, attempts))?;

        let file_size = document.bytes.len();
        let preview_len = file_size.min(DOCUMENT_PREVIEW_BYTES);
        let preview = String::from_utf8_lossy(&document.bytes[..preview_len]);

        let content = format!(
            "\nDocument URL: {url}\n\
             Content Type: {ct}\n\
             File Size: {file_size} bytes\n\
             Downloaded: {ts}\n\n\
             Note: This is a {ct} document. Enhanced processing for this file type could be implemented.\n\
             Raw content preview (first {DOCUMENT_PREVIEW_BYTES} chars):\n\
             {preview}\n",
            ct = document.content_type,
            ts = timestamp(),
        );

        Ok(PageResult::Document {
            url: url.to_string(),
            title: format!("Document - {}", file_name_of(url)),
            content,
            content_type: document.content_type,
            file_size,
        })
    }
}

/// Joins per-page text, tagging each non-empty page with its 1-based number
fn tag_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| format!("\n--- PAGE {} ---\n{}\n", i + 1, text))
        .collect()
}

fn no_text_result(url: &str, document: &DownloadedDocument, pages: Option<usize>) -> PageResult {
    let file_size = document.bytes.len();
    let page_count = pages.map_or_else(|| "Unknown".to_string(), |p| p.to_string());

    let content = format!(
        "PDF Document Information:\n\
         URL: {url}\n\
         File Size: {file_size} bytes\n\
         Pages: {page_count}\n\
         Content Type: {ct}\n\
         Download Date: {ts}\n\n\
         Note: This PDF exists but no text could be extracted. It may contain images, scanned text, or be password protected.\n\
         This could still be a valuable financial document that should be reviewed manually.\n",
        ct = document.content_type,
        ts = timestamp(),
    );

    PageResult::Pdf {
        url: url.to_string(),
        title: format!("PDF Document (No Text) - {}", file_name_of(url)),
        content,
        file_size,
        extraction: PdfExtraction::NoText {
            pages: pages.unwrap_or(0),
        },
    }
}

fn processing_error_note(url: &str, file_size: usize, error: &str) -> String {
    format!(
        "PDF Processing Error:\n\
         URL: {url}\n\
         File Size: {file_size} bytes\n\
         Error: {error}\n\
         Download Date: {ts}\n\n\
         Note: PDF was downloaded but could not be processed. This might be:\n\
         - A corrupted PDF file\n\
         - A password-protected PDF\n\
         - A PDF with complex formatting\n\
         - A scanned document without OCR text\n\n\
         Manual review may be required for this financial document.\n",
        ts = timestamp(),
    )
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
