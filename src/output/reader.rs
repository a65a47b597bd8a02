//! Harvest file reader
//!
//! Parses records written by the persister back into typed form, for tools
//! that review or report on a harvest after the fact.

use crate::output::persist::SEPARATOR_WIDTH;
use crate::HarvestError;
use chrono::NaiveDateTime;
use std::path::Path;

/// Header and body of one harvest record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestHeader {
    pub url: String,
    pub title: String,
    /// `WEBPAGE`, `PDF` or `DOCUMENT`
    pub kind: String,
    pub scraped: Option<NaiveDateTime>,
    /// Present on financial records only
    pub pattern_count: Option<usize>,
    /// Listed patterns (at most ten), empty on plain records
    pub patterns: Vec<String>,
    pub content: String,
}

impl HarvestHeader {
    pub fn is_financial(&self) -> bool {
        self.pattern_count.is_some()
    }
}

/// Reads and parses the harvest record at `path`
pub fn read_harvest_header(path: &Path) -> Result<HarvestHeader, HarvestError> {
    let text = std::fs::read_to_string(path)?;
    parse_harvest_record(&text)
}

/// Parses a harvest record from its text
pub fn parse_harvest_record(text: &str) -> Result<HarvestHeader, HarvestError> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let split_marker = format!("\n{}\n", separator);

    let (head, rest) = text
        .split_once(&split_marker)
        .ok_or_else(|| HarvestError::Record("missing header separator".to_string()))?;

    let mut url = None;
    let mut title = String::new();
    let mut kind = String::new();
    let mut scraped = None;
    let mut pattern_count = None;

    for line in head.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key {
            "URL" => url = Some(value.to_string()),
            "TITLE" => title = value.to_string(),
            "TYPE" => kind = value.to_string(),
            "SCRAPED" => {
                scraped = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok()
            }
            "FINANCIAL PATTERNS FOUND" => pattern_count = value.parse::<usize>().ok(),
            _ => {}
        }
    }

    let url = url.ok_or_else(|| HarvestError::Record("missing URL line".to_string()))?;

    let (patterns, body) = match rest.strip_prefix("DETECTED PATTERNS:\n") {
        Some(listing) => {
            let content_marker = format!("\n{}\nCONTENT:\n\n", separator);
            let (listed, body) = listing
                .split_once(&content_marker)
                .ok_or_else(|| HarvestError::Record("missing CONTENT section".to_string()))?;
            (split_patterns(listed), body)
        }
        None => (Vec::new(), rest.strip_prefix('\n').unwrap_or(rest)),
    };

    Ok(HarvestHeader {
        url,
        title,
        kind,
        scraped,
        pattern_count,
        patterns,
        content: body.strip_suffix('\n').unwrap_or(body).to_string(),
    })
}

fn split_patterns(listed: &str) -> Vec<String> {
    listed
        .trim()
        .split(", ")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
