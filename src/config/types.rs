use crate::crawler::DEFAULT_MAX_OTHER_LINKS;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/120.0 Safari/537.36 finharvest/",
    env!("CARGO_PKG_VERSION")
);

/// Main configuration structure for finharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Default configuration writing into `folder`
    pub fn with_output_folder(folder: impl Into<String>) -> Self {
        Self {
            crawl: CrawlConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig {
                folder: folder.into(),
            },
        }
    }
}

/// Traversal budgets and pacing
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Maximum link depth from the start URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of pages fetched in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between successive fetches (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// How many non-financial, non-document links a page may contribute
    #[serde(rename = "max-other-links", default = "default_max_other_links")]
    pub max_other_links: usize,
}

impl CrawlConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            politeness_delay_ms: default_politeness_delay_ms(),
            max_other_links: default_max_other_links(),
        }
    }
}

/// Timeouts, retry budgets and client identity
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    #[serde(rename = "document-timeout-secs", default = "default_document_timeout_secs")]
    pub document_timeout_secs: u64,

    /// Attempts per web page, first try included
    #[serde(rename = "page-attempts", default = "default_page_attempts")]
    pub page_attempts: u32,

    /// Fixed pause between web page attempts (milliseconds)
    #[serde(rename = "page-retry-delay-ms", default = "default_page_retry_delay_ms")]
    pub page_retry_delay_ms: u64,

    /// Attempts per PDF download, first try included
    #[serde(rename = "pdf-attempts", default = "default_pdf_attempts")]
    pub pdf_attempts: u32,

    /// Base unit of the PDF backoff schedule (milliseconds)
    #[serde(rename = "backoff-unit-ms", default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl FetchConfig {
    pub fn page_retry_delay(&self) -> Duration {
        Duration::from_millis(self.page_retry_delay_ms)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: default_page_timeout_secs(),
            document_timeout_secs: default_document_timeout_secs(),
            page_attempts: default_page_attempts(),
            page_retry_delay_ms: default_page_retry_delay_ms(),
            pdf_attempts: default_pdf_attempts(),
            backoff_unit_ms: default_backoff_unit_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Folder for financial web pages; documents go to `<folder>/documents`
    pub folder: String,
}

impl OutputConfig {
    pub fn folder_path(&self) -> PathBuf {
        PathBuf::from(&self.folder)
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_pages() -> u32 {
    50
}

fn default_politeness_delay_ms() -> u64 {
    3000
}

fn default_max_other_links() -> usize {
    DEFAULT_MAX_OTHER_LINKS
}

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_document_timeout_secs() -> u64 {
    60
}

fn default_page_attempts() -> u32 {
    2
}

fn default_page_retry_delay_ms() -> u64 {
    3000
}

fn default_pdf_attempts() -> u32 {
    3
}

fn default_backoff_unit_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
