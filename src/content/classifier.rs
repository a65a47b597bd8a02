//! Financial content classifier
//!
//! Scans fetched text against every content expression in the registry and
//! keeps a bounded, ordered list of what matched.

use crate::content::PatternRegistry;

/// Maximum matches any single expression contributes to a result
pub const MAX_MATCHES_PER_PATTERN: usize = 3;

/// Maximum patterns carried on a persisted financial page
pub const MAX_REPORTED_PATTERNS: usize = 10;

/// Outcome of scanning one text for financial data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialMatch {
    /// Matched substrings, grouped by expression in registry order
    pub patterns: Vec<String>,
}

impl FinancialMatch {
    /// True when at least one expression matched
    pub fn is_relevant(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Number of matched substrings
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when nothing matched
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The first `MAX_REPORTED_PATTERNS` matches
    pub fn reported(&self) -> &[String] {
        let end = self.patterns.len().min(MAX_REPORTED_PATTERNS);
        &self.patterns[..end]
    }
}

/// Scans `text` for financial data
///
/// Each expression is applied independently over the full text and
/// contributes at most `MAX_MATCHES_PER_PATTERN` matches, so one repetitive
/// table cannot crowd out the rest.
///
/// # Example
///
/// ```
/// use finharvest::content::{contains_financial_data, PatternRegistry};
///
/// let registry = PatternRegistry::new();
/// let found = contains_financial_data("license fee $500 due annually", &registry);
/// assert!(found.is_relevant());
/// ```
pub fn contains_financial_data(text: &str, registry: &PatternRegistry) -> FinancialMatch {
    if text.is_empty() {
        return FinancialMatch::default();
    }

    let mut patterns = Vec::new();
    for regex in registry.content_patterns() {
        patterns.extend(
            regex
                .find_iter(text)
                .take(MAX_MATCHES_PER_PATTERN)
                .map(|m| m.as_str().to_string()),
        );
    }

    FinancialMatch { patterns }
}
