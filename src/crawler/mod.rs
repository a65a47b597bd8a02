//! Crawler module for the harvest loop
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier and visited set
//! - Fetch dispatch with per-kind retry policies
//! - Link resolution and prioritization
//! - Overall crawl coordination

mod coordinator;
mod dispatcher;
mod frontier;
mod links;
mod retry;

pub use coordinator::{
    Capabilities, CrawlSession, CrawlSummary, FailedPage, FinancialPage, PageAnalysis,
};
pub use dispatcher::{Dispatcher, FetchFailure, DOCUMENT_PREVIEW_BYTES};
pub use frontier::{Frontier, FrontierEntry};
pub use links::{prioritize_links, resolve_link, PrioritizedLinks, DEFAULT_MAX_OTHER_LINKS};
pub use retry::{Backoff, RetryOutcome, RetryPolicy};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete harvest of the site at `start_url`
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP capabilities from the fetch settings
/// 2. Create the output folder
/// 3. Crawl breadth-first until the frontier empties or the page budget is spent
///
/// # Arguments
///
/// * `start_url` - Seed URL; its host bounds the crawl
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The crawl ran to completion
/// * `Err(HarvestError)` - The crawl could not be started
pub async fn crawl(start_url: &str, config: &Config) -> Result<CrawlSummary, HarvestError> {
    let capabilities = Capabilities::http(&config.fetch)?;
    let session = CrawlSession::new(start_url, config, capabilities)?;
    Ok(session.run().await)
}
