//! Crawl session - main harvest orchestration
//!
//! A `CrawlSession` owns everything one run needs: the frontier, the page
//! budget, the fetch dispatcher, the persister and the result lists. It is
//! built per invocation and consumed by `run`, so no state outlives a run.
//!
//! The loop is strictly sequential. It suspends only while a fetch is in
//! flight and during the politeness delay between pages.

use crate::config::{Config, CrawlConfig, FetchConfig};
use crate::content::{contains_financial_data, FinancialMatch, PatternCategories, PatternRegistry};
use crate::crawler::dispatcher::{Dispatcher, FetchFailure};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::links::{prioritize_links, PrioritizedLinks};
use crate::fetch::{
    DocumentDownloader, HttpDownloader, HttpRenderer, PageRenderer, PageResult, PdfTextExtractor,
    PopplerExtractor,
};
use crate::output::Persister;
use crate::url::{is_generic_page, is_pdf_url, validate_start_url, CrawlScope, ResourceKind};
use crate::HarvestError;
use std::path::PathBuf;
use std::sync::Arc;

/// External capabilities a session fetches through
#[derive(Clone)]
pub struct Capabilities {
    pub renderer: Arc<dyn PageRenderer>,
    pub downloader: Arc<dyn DocumentDownloader>,
    pub extractor: Arc<dyn PdfTextExtractor>,
}

impl Capabilities {
    /// HTTP renderer and downloader plus the poppler PDF extractor
    pub fn http(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            renderer: Arc::new(HttpRenderer::new(config)?),
            downloader: Arc::new(HttpDownloader::new(config)?),
            extractor: Arc::new(PopplerExtractor::new()),
        })
    }
}

/// A page whose content matched at least one financial pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialPage {
    pub url: String,
    pub title: String,
    /// `None` when the record could not be written
    pub file_path: Option<PathBuf>,
    /// Never empty, at most ten entries
    pub patterns: Vec<String>,
    pub depth: u32,
    pub kind: ResourceKind,
}

/// A URL whose fetch ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Outcome of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub start_url: String,
    /// Pages that were claimed and dispatched
    pub visited_count: usize,
    pub financial_pages: Vec<FinancialPage>,
    /// Generic pages, in the order they were skipped
    pub skipped: Vec<String>,
    pub failed: Vec<FailedPage>,
}

impl CrawlSummary {
    /// Financial pages that came from PDFs
    pub fn pdf_count(&self) -> usize {
        self.financial_pages
            .iter()
            .filter(|p| p.kind == ResourceKind::Pdf)
            .count()
    }
}

/// Result of analyzing a single page outside the crawl loop
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub page: PageResult,
    pub financial: FinancialMatch,
    pub categories: PatternCategories,
    pub file_path: Option<PathBuf>,
}

impl PageAnalysis {
    pub fn is_financial(&self) -> bool {
        self.financial.is_relevant()
    }
}

/// One harvest run against one site
pub struct CrawlSession {
    config: CrawlConfig,
    start_url: String,
    scope: CrawlScope,
    registry: PatternRegistry,
    dispatcher: Dispatcher,
    persister: Option<Persister>,
    frontier: Frontier,
    pages_processed: u32,
    financial_pages: Vec<FinancialPage>,
    skipped: Vec<String>,
    failed: Vec<FailedPage>,
}

impl CrawlSession {
    /// Creates a session that writes records under `config.output.folder`
    ///
    /// # Arguments
    ///
    /// * `start_url` - Seed URL; its host bounds the crawl
    /// * `config` - Budgets, fetch settings and output folder
    /// * `capabilities` - Renderer, downloader and PDF extractor
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Ready to run
    /// * `Err(HarvestError)` - Invalid start URL, or the output folder could
    ///   not be created
    pub fn new(
        start_url: &str,
        config: &Config,
        capabilities: Capabilities,
    ) -> Result<Self, HarvestError> {
        let persister = Persister::new(config.output.folder_path())?;
        Self::build(start_url, config, capabilities, Some(persister))
    }

    /// Creates a session that never writes to disk
    pub fn without_output(
        start_url: &str,
        config: &Config,
        capabilities: Capabilities,
    ) -> Result<Self, HarvestError> {
        Self::build(start_url, config, capabilities, None)
    }

    fn build(
        start_url: &str,
        config: &Config,
        capabilities: Capabilities,
        persister: Option<Persister>,
    ) -> Result<Self, HarvestError> {
        let start = validate_start_url(start_url)?;
        let scope = CrawlScope::from_start_url(start.as_str())?;
        let dispatcher = Dispatcher::new(
            capabilities.renderer,
            capabilities.downloader,
            capabilities.extractor,
            &config.fetch,
        );

        Ok(Self {
            config: config.crawl.clone(),
            start_url: start.to_string(),
            scope,
            registry: PatternRegistry::new(),
            dispatcher,
            persister,
            frontier: Frontier::new(config.crawl.max_depth),
            pages_processed: 0,
            financial_pages: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        })
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    /// Runs the crawl until the frontier empties or the page budget is spent
    pub async fn run(mut self) -> CrawlSummary {
        tracing::info!(
            "Starting financial harvest of {} (max depth {}, max pages {})",
            self.start_url,
            self.config.max_depth,
            self.config.max_pages
        );

        let start = self.start_url.clone();
        self.frontier.push(&start, 0);

        while self.pages_processed < self.config.max_pages {
            let Some(entry) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if self.frontier.is_visited(&entry.url) || entry.depth > self.config.max_depth {
                continue;
            }

            if is_generic_page(&entry.url, &self.registry) {
                tracing::info!("Skipping generic page: {}", entry.url);
                self.skipped.push(entry.url);
                continue;
            }

            if !self.frontier.mark_visited(&entry.url) {
                continue;
            }
            self.pages_processed += 1;

            tracing::info!(
                "Processing ({}/{}) depth {}: {}",
                self.pages_processed,
                self.config.max_pages,
                entry.depth,
                entry.url
            );

            self.process_entry(&entry).await;

            if self.should_pause() {
                tokio::time::sleep(self.config.politeness_delay()).await;
            }
        }

        if self.pages_processed >= self.config.max_pages {
            tracing::info!("Page budget of {} reached", self.config.max_pages);
        }

        self.into_summary()
    }

    async fn process_entry(&mut self, entry: &FrontierEntry) {
        let page = match self.dispatcher.dispatch(&entry.url).await {
            Ok(page) => page,
            Err(failure) => {
                tracing::warn!("Failed to fetch {}: {}", entry.url, failure);
                self.failed.push(FailedPage {
                    url: entry.url.clone(),
                    error: failure.message(),
                });
                return;
            }
        };

        let found = contains_financial_data(page.content(), &self.registry);
        if found.is_relevant() {
            tracing::info!(
                "Financial content on {} ({} patterns)",
                entry.url,
                found.len()
            );
            let file_path = self
                .persister
                .as_ref()
                .and_then(|p| p.save_financial(&page, &found.patterns));

            self.financial_pages.push(FinancialPage {
                url: page.url().to_string(),
                title: page.title().to_string(),
                file_path,
                patterns: found.reported().to_vec(),
                depth: entry.depth,
                kind: page.kind(),
            });
        } else {
            tracing::debug!("No financial content on {}", entry.url);
        }

        if entry.depth < self.config.max_depth && !page.links().is_empty() {
            let frontier = &self.frontier;
            let prioritized = prioritize_links(
                page.links(),
                &self.scope,
                &self.registry,
                |url| frontier.is_visited(url),
                self.config.max_other_links,
            );

            let mut queued = 0;
            for url in prioritized.into_ordered() {
                if self.frontier.push(&url, entry.depth + 1) {
                    queued += 1;
                }
            }
            tracing::debug!(
                "Queued {} links from {} ({} waiting)",
                queued,
                entry.url,
                self.frontier.len()
            );
        }
    }

    fn should_pause(&self) -> bool {
        !self.config.politeness_delay().is_zero()
            && !self.frontier.is_empty()
            && self.pages_processed < self.config.max_pages
    }

    fn into_summary(self) -> CrawlSummary {
        tracing::info!(
            "Harvest finished: {} visited, {} financial, {} skipped, {} failed",
            self.frontier.visited_count(),
            self.financial_pages.len(),
            self.skipped.len(),
            self.failed.len()
        );

        CrawlSummary {
            start_url: self.start_url,
            visited_count: self.frontier.visited_count(),
            financial_pages: self.financial_pages,
            skipped: self.skipped,
            failed: self.failed,
        }
    }

    /// Fetches and classifies one URL without following its links
    ///
    /// The record is written when the page is financial and the session has
    /// an output folder.
    pub async fn analyze_page(&self, url: &str) -> Result<PageAnalysis, FetchFailure> {
        let page = self.dispatcher.dispatch(url).await?;
        Ok(self.classify(page))
    }

    /// Fetches one document URL, forcing the document path
    ///
    /// PDF-looking URLs take the PDF path, anything else the office
    /// document path, even when the URL carries no document extension.
    pub async fn process_document(&self, url: &str) -> Result<PageAnalysis, FetchFailure> {
        let kind = if is_pdf_url(url) {
            ResourceKind::Pdf
        } else {
            ResourceKind::Document
        };
        let page = self.dispatcher.dispatch_as(url, kind).await?;
        Ok(self.classify(page))
    }

    /// Fetches one page and returns its outbound links by tier
    pub async fn list_links(&self, url: &str) -> Result<PrioritizedLinks, FetchFailure> {
        let page = self.dispatcher.dispatch(url).await?;
        Ok(prioritize_links(
            page.links(),
            &self.scope,
            &self.registry,
            |candidate| self.frontier.is_visited(candidate),
            self.config.max_other_links,
        ))
    }

    fn classify(&self, page: PageResult) -> PageAnalysis {
        let financial = contains_financial_data(page.content(), &self.registry);
        let categories = PatternCategories::from_patterns(&financial.patterns);
        let file_path = if financial.is_relevant() {
            self.persister
                .as_ref()
                .and_then(|p| p.save_financial(&page, &financial.patterns))
        } else {
            None
        };

        PageAnalysis {
            page,
            financial,
            categories,
            file_path,
        }
    }
}
