//! URL handling module for finharvest
//!
//! This module provides URL stripping, crawl scope checks, and the URL
//! classifiers that decide whether a URL is skipped, fetched as a web page,
//! or downloaded as a document.

mod domain;
mod normalize;

use crate::content::PatternRegistry;

// Re-export main functions
pub use domain::{extract_domain, CrawlScope};
pub use normalize::{strip_url, validate_start_url};

/// Extension substrings that mark a URL as a downloadable document
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt",
];

/// Retrieval path for a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Rendered HTML page
    WebPage,
    /// PDF document - downloaded and text-extracted
    Pdf,
    /// Other office document - downloaded and summarized
    Document,
}

impl ResourceKind {
    /// Returns true for kinds written under the `documents/` subdirectory
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Pdf | Self::Document)
    }

    /// Label used in the `TYPE:` header of persisted files
    pub fn label(&self) -> &'static str {
        match self {
            Self::WebPage => "WEBPAGE",
            Self::Pdf => "PDF",
            Self::Document => "DOCUMENT",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returns true if the URL looks like boilerplate that should never be fetched
///
/// A URL is generic when any generic-page keyword from the registry appears
/// anywhere in the lower-cased URL. The hostname is included in the match.
///
/// # Examples
///
/// ```
/// use finharvest::content::PatternRegistry;
/// use finharvest::url::is_generic_page;
///
/// let registry = PatternRegistry::new();
/// assert!(is_generic_page("https://x.gov/about-us", &registry));
/// assert!(!is_generic_page("https://x.gov/tax/rates", &registry));
/// ```
pub fn is_generic_page(url: &str, registry: &PatternRegistry) -> bool {
    let lowered = url.to_lowercase();
    registry
        .generic_keywords()
        .iter()
        .any(|keyword| lowered.contains(keyword.as_str()))
}

/// Returns true if the URL contains a document extension anywhere
pub fn is_document_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    DOCUMENT_EXTENSIONS.iter().any(|ext| lowered.contains(ext))
}

/// Returns true if the URL ends with `.pdf` or mentions `pdf` anywhere
///
/// Deliberately broad so endpoints that serve PDFs without the extension
/// (e.g. `/download?format=pdf`) are still recognized.
pub fn is_pdf_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    lowered.ends_with(".pdf") || lowered.contains("pdf")
}

/// Chooses the retrieval path for a URL
///
/// # Arguments
///
/// * `url` - The URL about to be fetched
///
/// # Returns
///
/// * `ResourceKind::Pdf` - document URL that also looks like a PDF
/// * `ResourceKind::Document` - any other document URL
/// * `ResourceKind::WebPage` - everything else
pub fn classify_resource(url: &str) -> ResourceKind {
    if !is_document_url(url) {
        ResourceKind::WebPage
    } else if is_pdf_url(url) {
        ResourceKind::Pdf
    } else {
        ResourceKind::Document
    }
}
