//! Finharvest: a financial-content harvester
//!
//! This crate crawls a single website breadth-first, skips boilerplate pages,
//! tells web pages apart from downloadable documents, and persists every page
//! whose text carries financial data (tax rates, fees, costs) for later review.

pub mod config;
pub mod content;
pub mod crawler;
pub mod fetch;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Finharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed harvest record: {0}")]
    Record(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Errors raised while retrieving a page or document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Render failed: {0}")]
    RenderError(String),

    #[error("Not a valid PDF document (content type: {0})")]
    InvalidContentType(String),

    #[error("HTTP status {code}")]
    HttpStatus { code: u16 },

    #[error("No content returned")]
    EmptyContent,
}

impl FetchError {
    /// Returns true for failures worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ConnectionError(_) | Self::RenderError(_)
        )
    }
}

/// Errors raised while turning document bytes into text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    #[error("Document is password protected")]
    PasswordProtected,

    #[error("No extractable text")]
    NoExtractableText,

    #[error("Extraction tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("IO error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while writing harvested pages to disk
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for Finharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use content::{contains_financial_data, FinancialMatch, PatternRegistry};
pub use crawler::{CrawlSession, CrawlSummary, FinancialPage};
pub use fetch::{PageResult, ResourceKind};
pub use state::FetchState;
pub use crate::url::{is_document_url, is_generic_page, is_pdf_url, strip_url};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(FetchError::Timeout.is_transient());
        assert!(FetchError::ConnectionError("refused".to_string()).is_transient());
        assert!(FetchError::RenderError("crashed".to_string()).is_transient());

        assert!(!FetchError::InvalidContentType("text/html".to_string()).is_transient());
        assert!(!FetchError::HttpStatus { code: 404 }.is_transient());
        assert!(!FetchError::EmptyContent.is_transient());
    }

    #[test]
    fn test_timeout_message_names_timeout() {
        assert!(FetchError::Timeout.to_string().contains("Timeout"));
    }
}
