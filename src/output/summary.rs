//! Run summary report
//!
//! Renders the end-of-crawl report printed to stdout: totals, the saved
//! financial pages (web pages and documents listed apart), skipped and
//! failed URLs.

use crate::content::PatternCategories;
use crate::crawler::{CrawlSummary, FinancialPage};
use crate::fetch::truncate_chars;
use crate::url::ResourceKind;
use std::fmt::Write;

/// Skipped URLs listed before the rest are elided
const LISTED_SKIPPED: usize = 10;

/// Patterns shown per saved page
const PATTERNS_PER_PAGE: usize = 5;

/// Renders the run summary as plain text
pub fn render_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_summary(&mut out, summary);
    out
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", render_summary(summary));
}

fn write_summary(out: &mut String, summary: &CrawlSummary) -> std::fmt::Result {
    writeln!(out, "=== Financial Harvest Summary ===\n")?;

    writeln!(out, "Statistics:")?;
    writeln!(out, "  Total pages processed: {}", summary.visited_count)?;
    writeln!(out, "  Financial pages found: {}", summary.financial_pages.len())?;
    writeln!(out, "  PDF documents processed: {}", summary.pdf_count())?;
    writeln!(out, "  Generic pages skipped: {}", summary.skipped.len())?;
    writeln!(out, "  Failed pages: {}", summary.failed.len())?;
    writeln!(out)?;

    let web_pages: Vec<_> = summary
        .financial_pages
        .iter()
        .filter(|p| !p.kind.is_document())
        .collect();
    let documents: Vec<_> = summary
        .financial_pages
        .iter()
        .filter(|p| p.kind.is_document())
        .collect();

    if !summary.financial_pages.is_empty() {
        let all_patterns: Vec<&str> = summary
            .financial_pages
            .iter()
            .flat_map(|p| p.patterns.iter().map(String::as_str))
            .collect();
        let categories = PatternCategories::from_patterns(&all_patterns);
        writeln!(
            out,
            "Pattern categories: {} percentages, {} dollar amounts, {} tax terms, {} dates\n",
            categories.percentages.len(),
            categories.dollar_amounts.len(),
            categories.tax_terms.len(),
            categories.dates.len()
        )?;
    }

    if !web_pages.is_empty() {
        writeln!(out, "Financial Web Pages ({}):", web_pages.len())?;
        write_pages(out, &web_pages, "")?;
    }

    if !documents.is_empty() {
        writeln!(out, "Financial Documents ({}):", documents.len())?;
        write_pages(out, &documents, "documents/")?;
    }

    if !summary.skipped.is_empty() {
        writeln!(out, "Generic Pages Skipped ({}):", summary.skipped.len())?;
        for url in summary.skipped.iter().take(LISTED_SKIPPED) {
            writeln!(out, "  - {}", url)?;
        }
        if summary.skipped.len() > LISTED_SKIPPED {
            writeln!(out, "  - ... and {} more", summary.skipped.len() - LISTED_SKIPPED)?;
        }
        writeln!(out)?;
    }

    if !summary.failed.is_empty() {
        writeln!(out, "Failed Pages ({}):", summary.failed.len())?;
        for failed in &summary.failed {
            writeln!(out, "  - {}: {}", failed.url, failed.error)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_pages(out: &mut String, pages: &[&FinancialPage], prefix: &str) -> std::fmt::Result {
    for (i, page) in pages.iter().enumerate() {
        writeln!(out, "{:2}. {}", i + 1, truncate_chars(&page.title, 50))?;
        writeln!(out, "    URL: {}", page.url)?;
        match &page.file_path {
            Some(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                writeln!(out, "    File: {}{}", prefix, name)?;
            }
            None => writeln!(out, "    File: (not saved)")?,
        }
        let shown: Vec<&str> = page
            .patterns
            .iter()
            .take(PATTERNS_PER_PAGE)
            .map(String::as_str)
            .collect();
        writeln!(out, "    Patterns: {}", shown.join(", "))?;
        if page.kind == ResourceKind::Pdf {
            writeln!(out, "    Type: PDF")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FailedPage;
    use std::path::PathBuf;

    fn summary() -> CrawlSummary {
        CrawlSummary {
            start_url: "https://x.gov/".to_string(),
            visited_count: 4,
            financial_pages: vec![
                FinancialPage {
                    url: "https://x.gov/tax".to_string(),
                    title: "A very long title that keeps going well past fifty characters".to_string(),
                    file_path: Some(PathBuf::from("/tmp/out/tax.txt")),
                    patterns: (1..=7).map(|i| format!("{}%", i)).collect(),
                    depth: 1,
                    kind: ResourceKind::WebPage,
                },
                FinancialPage {
                    url: "https://x.gov/fees.pdf".to_string(),
                    title: "PDF Document - fees.pdf".to_string(),
                    file_path: None,
                    patterns: vec!["$10".to_string()],
                    depth: 2,
                    kind: ResourceKind::Pdf,
                },
            ],
            skipped: (0..12).map(|i| format!("https://x.gov/about{}", i)).collect(),
            failed: vec![FailedPage {
                url: "https://x.gov/broken".to_string(),
                error: "Max retries exceeded: Timeout".to_string(),
            }],
        }
    }

    #[test]
    fn test_summary_totals() {
        let text = render_summary(&summary());
        assert!(text.contains("Total pages processed: 4"));
        assert!(text.contains("Financial pages found: 2"));
        assert!(text.contains("PDF documents processed: 1"));
        assert!(text.contains("Generic pages skipped: 12"));
        assert!(text.contains("Failed pages: 1"));
    }

    #[test]
    fn test_summary_lists_pages_by_kind() {
        let text = render_summary(&summary());
        assert!(text.contains("Financial Web Pages (1):"));
        assert!(text.contains("Financial Documents (1):"));
        assert!(text.contains(" 1. A very long title that keeps going well past fifty\n"));
        assert!(text.contains("File: tax.txt"));
        assert!(text.contains("File: (not saved)"));
        assert!(text.contains("Patterns: 1%, 2%, 3%, 4%, 5%\n"));
    }

    #[test]
    fn test_summary_elides_skipped() {
        let text = render_summary(&summary());
        assert!(text.contains("https://x.gov/about9"));
        assert!(!text.contains("https://x.gov/about10"));
        assert!(text.contains("... and 2 more"));
    }

    #[test]
    fn test_summary_lists_failures_with_reason() {
        let text = render_summary(&summary());
        assert!(text.contains("https://x.gov/broken: Max retries exceeded: Timeout"));
    }
}
