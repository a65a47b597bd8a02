//! Finharvest main entry point
//!
//! This is the command-line interface for the financial-content harvester.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use finharvest::config::{load_config_with_hash, parse_start_url, validate, Config};
use finharvest::crawler::{Capabilities, CrawlSession, PageAnalysis};
use finharvest::fetch::truncate_chars;
use finharvest::output::{print_summary, DOCUMENTS_DIR};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Finharvest: a financial-content harvester
///
/// Finharvest crawls one website breadth-first, skips boilerplate pages,
/// and saves every page or document whose text carries financial data
/// (tax rates, fees, costs) as a plain-text record for review.
#[derive(Parser, Debug)]
#[command(name = "finharvest")]
#[command(version)]
#[command(about = "A financial-content harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest a whole site starting from one URL
    Crawl {
        /// Seed URL; only links on its host are followed
        start_url: String,

        /// Maximum link depth from the start URL
        #[arg(long)]
        max_depth: Option<u32>,

        /// Maximum number of pages to fetch
        #[arg(long)]
        max_pages: Option<u32>,

        /// Folder the records are written to
        #[arg(short, long)]
        output: Option<String>,

        /// Pause between pages in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Print the effective configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Analyze a single page for financial content
    Analyze {
        url: String,

        /// Save the record here when the page is financial
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List a page's outbound links by priority tier
    Links { url: String },

    /// Process a single PDF or office document
    Document {
        url: String,

        /// Save the record here when the document is financial
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Characters of content shown by `analyze`
const ANALYZE_PREVIEW_CHARS: usize = 1000;

/// Characters of content shown by `document`
const DOCUMENT_PREVIEW_CHARS: usize = 2000;

/// Patterns shown by `analyze`
const ANALYZE_PATTERNS: usize = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl {
            start_url,
            max_depth,
            max_pages,
            output,
            delay_ms,
            dry_run,
        } => {
            let mut config = resolve_config(cli.config.as_deref(), output)?;
            if let Some(depth) = max_depth {
                config.crawl.max_depth = depth;
            }
            if let Some(pages) = max_pages {
                config.crawl.max_pages = pages;
            }
            if let Some(delay) = delay_ms {
                config.crawl.politeness_delay_ms = delay;
            }
            validate(&config)?;
            parse_start_url(&start_url)?;

            if dry_run {
                handle_dry_run(&start_url, &config);
            } else {
                handle_crawl(&start_url, &config).await?;
            }
        }
        Command::Analyze { url, output } => {
            let config = resolve_optional_config(cli.config.as_deref(), output)?;
            handle_analyze(&url, &config).await?;
        }
        Command::Links { url } => {
            let config = resolve_optional_config(cli.config.as_deref(), None)?;
            handle_links(&url, &config).await?;
        }
        Command::Document { url, output } => {
            let config = resolve_optional_config(cli.config.as_deref(), output)?;
            handle_document(&url, &config).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("finharvest=info,warn"),
            1 => EnvFilter::new("finharvest=debug,info"),
            2 => EnvFilter::new("finharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, then applies `--output`
///
/// Without a file `--output` is required.
fn resolve_config(path: Option<&Path>, output: Option<String>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => match &output {
            Some(folder) => Config::with_output_folder(folder.clone()),
            None => bail!("--output is required when no config file is given"),
        },
    };

    if let Some(folder) = output {
        config.output.folder = folder;
    }
    Ok(config)
}

/// Like `resolve_config`, but an output folder is optional
///
/// An empty folder means records are not written.
fn resolve_optional_config(
    path: Option<&Path>,
    output: Option<String>,
) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => Config::with_output_folder(String::new()),
    };

    if let Some(folder) = output {
        config.output.folder = folder;
    }
    Ok(config)
}

fn load_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Builds a session that writes only when an output folder is set
fn session_for(url: &str, config: &Config) -> anyhow::Result<CrawlSession> {
    let capabilities =
        Capabilities::http(&config.fetch).context("Failed to build HTTP client")?;
    let session = if config.output.folder.trim().is_empty() {
        CrawlSession::without_output(url, config, capabilities)?
    } else {
        CrawlSession::new(url, config, capabilities)?
    };
    Ok(session)
}

/// Handles `crawl --dry-run`: shows what would be crawled
fn handle_dry_run(start_url: &str, config: &Config) {
    println!("=== Finharvest Dry Run ===\n");

    println!("Start URL: {}", start_url);

    println!("\nCrawl:");
    println!("  Max depth: {}", config.crawl.max_depth);
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Politeness delay: {}ms", config.crawl.politeness_delay_ms);
    println!("  Other links per page: {}", config.crawl.max_other_links);

    println!("\nFetch:");
    println!("  Page timeout: {}s", config.fetch.page_timeout_secs);
    println!("  Document timeout: {}s", config.fetch.document_timeout_secs);
    println!(
        "  Page attempts: {} ({}ms apart)",
        config.fetch.page_attempts, config.fetch.page_retry_delay_ms
    );
    println!(
        "  PDF attempts: {} (backoff unit {}ms)",
        config.fetch.pdf_attempts, config.fetch.backoff_unit_ms
    );
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nOutput:");
    println!("  Folder: {}", config.output.folder);
    println!(
        "  Documents: {}",
        config.output.folder_path().join(DOCUMENTS_DIR).display()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(start_url: &str, config: &Config) -> anyhow::Result<()> {
    tracing::info!("Output folder: {}", config.output.folder);

    let capabilities =
        Capabilities::http(&config.fetch).context("Failed to build HTTP client")?;
    let session = CrawlSession::new(start_url, config, capabilities)
        .with_context(|| format!("Cannot start harvest of {}", start_url))?;

    let summary = session.run().await;
    print_summary(&summary);
    Ok(())
}

/// Handles `analyze`: one page, no recursion
async fn handle_analyze(url: &str, config: &Config) -> anyhow::Result<()> {
    let session = session_for(url, config)?;
    let analysis = session.analyze_page(url).await?;

    println!("=== Page Analysis ===\n");
    println!("URL: {}", analysis.page.url());
    println!("Title: {}", analysis.page.title());
    println!("Type: {}", analysis.page.kind());
    println!("Links found: {}", analysis.page.links().len());
    print_findings(&analysis, ANALYZE_PATTERNS);
    print_preview(&analysis, ANALYZE_PREVIEW_CHARS);
    Ok(())
}

/// Handles `links`: one page's outbound links by tier
async fn handle_links(url: &str, config: &Config) -> anyhow::Result<()> {
    let capabilities =
        Capabilities::http(&config.fetch).context("Failed to build HTTP client")?;
    let session = CrawlSession::without_output(url, config, capabilities)?;
    let links = session.list_links(url).await?;

    println!("=== Links on {} ({}) ===\n", url, links.total());
    for (label, tier) in [
        ("Documents", &links.documents),
        ("Financial", &links.financial),
        ("Other", &links.other),
    ] {
        println!("{} ({}):", label, tier.len());
        for link in tier {
            println!("  - {}", link);
        }
        println!();
    }
    Ok(())
}

/// Handles `document`: one PDF or office document
async fn handle_document(url: &str, config: &Config) -> anyhow::Result<()> {
    let session = session_for(url, config)?;
    let analysis = session.process_document(url).await?;

    println!("=== Document ===\n");
    println!("URL: {}", analysis.page.url());
    println!("Title: {}", analysis.page.title());
    println!("Type: {}", analysis.page.kind());
    print_findings(&analysis, analysis.financial.len());
    print_preview(&analysis, DOCUMENT_PREVIEW_CHARS);
    Ok(())
}

fn print_findings(analysis: &PageAnalysis, shown: usize) {
    if !analysis.is_financial() {
        println!("Financial content: none found");
        return;
    }

    println!("Financial patterns found: {}", analysis.financial.len());
    for pattern in analysis.financial.patterns.iter().take(shown) {
        println!("  - {}", pattern);
    }

    let categories = &analysis.categories;
    println!(
        "Categories: {} percentages, {} dollar amounts, {} tax terms, {} dates",
        categories.percentages.len(),
        categories.dollar_amounts.len(),
        categories.tax_terms.len(),
        categories.dates.len()
    );

    match &analysis.file_path {
        Some(path) => println!("Saved to: {}", path.display()),
        None => println!("Saved to: (not saved)"),
    }
}

fn print_preview(analysis: &PageAnalysis, max_chars: usize) {
    let content = analysis.page.content();
    println!("\nContent preview:\n{}", truncate_chars(content, max_chars));
    if content.chars().count() > max_chars {
        println!("...");
    }
}
