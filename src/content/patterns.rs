use regex::{Regex, RegexBuilder};

/// URL substrings that mark boilerplate pages to skip
pub const GENERIC_PAGE_KEYWORDS: &[&str] = &[
    "about",
    "contact",
    "privacy",
    "terms",
    "sitemap",
    "search",
    "accessibility",
    "translate",
    "home",
    "index",
    "faq",
    "help",
    "support",
    "blog",
    "careers",
    "jobs",
    "staff",
    "directory",
    "media",
    "press",
    "calendar",
    "events",
    "gallery",
    "photo",
    "video",
    "social",
    "facebook",
    "twitter",
    "instagram",
    "linkedin",
    "youtube",
];

/// URL or anchor-text substrings that mark a link as worth following first
pub const FINANCIAL_LINK_KEYWORDS: &[&str] = &[
    "tax",
    "fee",
    "rate",
    "cost",
    "price",
    "budget",
    "financial",
    "finance",
    "revenue",
    "assessment",
    "penalty",
    "payment",
    "billing",
    "invoice",
    "permit",
    "license",
    "registration",
    "business",
    "property",
    "sales",
    "income",
    "audit",
    "treasury",
    "accounting",
    "fiscal",
    "economic",
];

/// Expressions that detect financial content, numeric and phrase based
pub const FINANCIAL_CONTENT_PATTERNS: &[&str] = &[
    r"\b\d+\.?\d*\s*%",
    r"\b\d+\.\d+\s*percent",
    r"\brate\s*of\s*\d+",
    r"\btax\s*rate\s*\d+",
    r"\binterest\s*rate\s*\d+",
    r"\b\d+\s*basis\s*points",
    r"\$\d+(?:,\d{3})*(?:\.\d{2})?",
    r"\$\d+\s*million",
    r"\$\d+\s*billion",
    r"\bcost\s*of\s*\$?\d+",
    r"\bfee\s*of\s*\$?\d+",
    r"\bcharge\s*\$?\d+",
    r"\bprice\s*\$?\d+",
    r"\bamount\s*\$?\d+",
    r"\bpayment\s*\$?\d+",
    r"\btax\s*\$?\d+",
    r"\bduty\s*\$?\d+",
    r"\bpenalty\s*\$?\d+",
    r"\bfine\s*\$?\d+",
    r"\btaxable\s*income",
    r"\btax\s*liability",
    r"\btax\s*assessment",
    r"\bfee\s*schedule",
    r"\brate\s*schedule",
    r"\bprice\s*list",
    r"\bcost\s*structure",
    r"\blicense\s*fee\s*\$?\d+",
    r"\bregistration\s*fee\s*\$?\d+",
    r"\bprocessing\s*fee\s*\$?\d+",
    r"\bdetermined\s*by",
];

/// Static keyword and expression tables consumed by the classifiers
///
/// Built once per crawl session and shared by reference; nothing in it
/// changes after construction.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    generic_keywords: Vec<String>,
    financial_link_keywords: Vec<String>,
    content_patterns: Vec<Regex>,
}

impl PatternRegistry {
    /// Builds the registry from the built-in tables
    pub fn new() -> Self {
        let content_patterns = FINANCIAL_CONTENT_PATTERNS
            .iter()
            .filter_map(|pattern| compile_case_insensitive(pattern))
            .collect();

        Self {
            generic_keywords: GENERIC_PAGE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            financial_link_keywords: FINANCIAL_LINK_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            content_patterns,
        }
    }

    /// Keywords that mark a URL as generic boilerplate
    pub fn generic_keywords(&self) -> &[String] {
        &self.generic_keywords
    }

    /// Keywords that mark a link as financially relevant
    pub fn financial_link_keywords(&self) -> &[String] {
        &self.financial_link_keywords
    }

    /// Compiled case-insensitive content expressions, in table order
    pub fn content_patterns(&self) -> &[Regex] {
        &self.content_patterns
    }

    /// Returns true if `text` contains any financial link keyword (case-insensitive)
    pub fn mentions_financial_keyword(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.financial_link_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_case_insensitive(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::error!("Skipping invalid content pattern {}: {}", pattern, e);
            None
        }
    }
}
