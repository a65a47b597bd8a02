//! Content module for financial relevance detection
//!
//! This module holds the static pattern registry (generic-page keywords,
//! financial link keywords, financial content expressions) and the
//! classifier that scans fetched text against it.

mod categories;
mod classifier;
mod patterns;

pub use categories::PatternCategories;
pub use classifier::{
    contains_financial_data, FinancialMatch, MAX_MATCHES_PER_PATTERN, MAX_REPORTED_PATTERNS,
};
pub use patterns::{
    PatternRegistry, FINANCIAL_CONTENT_PATTERNS, FINANCIAL_LINK_KEYWORDS, GENERIC_PAGE_KEYWORDS,
};
