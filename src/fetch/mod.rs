//! Retrieval capabilities
//!
//! The crawl engine never talks to the network or to extraction tools
//! directly. It goes through three capabilities:
//!
//! - [`PageRenderer`]: fetch a URL and return its title, text and links
//! - [`DocumentDownloader`]: fetch a URL as raw bytes plus content type
//! - [`PdfTextExtractor`]: turn PDF bytes into per-page text
//!
//! The default implementations are reqwest/scraper based ([`HttpRenderer`],
//! [`HttpDownloader`]) and poppler based ([`PopplerExtractor`]). Tests swap
//! in stubs.

mod html;
mod http;
mod pdf;

pub use crate::url::ResourceKind;
pub use html::parse_page;
pub use http::{build_http_client, HttpDownloader, HttpRenderer};
pub use pdf::PopplerExtractor;

use crate::{ExtractionError, FetchError};
use async_trait::async_trait;

/// Title used when a page has no usable `<title>`
pub const DEFAULT_TITLE: &str = "No Title";

/// An outbound link as it appears on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Raw `href` attribute value
    pub href: String,
    /// Visible anchor text
    pub text: String,
}

impl PageLink {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A rendered web page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub content: String,
    pub links: Vec<PageLink>,
}

/// Raw bytes of a downloaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDocument {
    /// `Content-Type` header value, empty when the server sent none
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fetches a URL and renders it to text plus links
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage, FetchError>;
}

/// Downloads a URL as raw bytes
#[async_trait]
pub trait DocumentDownloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<DownloadedDocument, FetchError>;
}

/// Extracts per-page text from PDF bytes
#[async_trait]
pub trait PdfTextExtractor: Send + Sync {
    /// Returns one entry per page, in page order
    async fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// How the text of a successfully downloaded PDF was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfExtraction {
    /// At least one page produced text
    Text { pages: usize },
    /// Extraction ran but found nothing (scanned or image-only PDF)
    NoText { pages: usize },
    /// Extraction failed; the message is kept for the error note
    Failed { error: String },
}

/// A successfully fetched resource
///
/// Failures are not represented here; the dispatcher returns them as
/// `Err(FetchFailure)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    WebPage {
        url: String,
        title: String,
        content: String,
        links: Vec<PageLink>,
    },
    Pdf {
        url: String,
        title: String,
        content: String,
        file_size: usize,
        extraction: PdfExtraction,
    },
    Document {
        url: String,
        title: String,
        content: String,
        content_type: String,
        file_size: usize,
    },
}

impl PageResult {
    pub fn url(&self) -> &str {
        match self {
            Self::WebPage { url, .. } | Self::Pdf { url, .. } | Self::Document { url, .. } => url,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::WebPage { title, .. }
            | Self::Pdf { title, .. }
            | Self::Document { title, .. } => title,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::WebPage { content, .. }
            | Self::Pdf { content, .. }
            | Self::Document { content, .. } => content,
        }
    }

    /// Outbound links; documents have none
    pub fn links(&self) -> &[PageLink] {
        match self {
            Self::WebPage { links, .. } => links,
            Self::Pdf { .. } | Self::Document { .. } => &[],
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::WebPage { .. } => ResourceKind::WebPage,
            Self::Pdf { .. } => ResourceKind::Pdf,
            Self::Document { .. } => ResourceKind::Document,
        }
    }
}

/// Truncates `text` to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Last path segment of a URL, used to title documents
pub fn file_name_of(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    if name.is_empty() {
        url
    } else {
        name
    }
}
