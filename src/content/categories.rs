/// Terms that put a detected pattern in the tax bucket
const TAX_TERMS: &[&str] = &[
    "tax",
    "exemption",
    "rate",
    "relief",
    "assessment",
    "liability",
    "registration",
];

/// Detected patterns sorted into the buckets reviewers care about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCategories {
    pub percentages: Vec<String>,
    pub dollar_amounts: Vec<String>,
    pub tax_terms: Vec<String>,
    pub dates: Vec<String>,
}

impl PatternCategories {
    /// Buckets each pattern by its first matching rule
    ///
    /// Rules are checked in order: percentage, dollar amount, tax term, date.
    /// Patterns matching none of them are dropped.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut categories = Self::default();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }

            let lowered = pattern.to_lowercase();
            if pattern.ends_with('%') {
                categories.percentages.push(pattern.to_string());
            } else if pattern.starts_with('$') {
                categories.dollar_amounts.push(pattern.to_string());
            } else if TAX_TERMS.iter().any(|term| lowered.contains(term)) {
                categories.tax_terms.push(pattern.to_string());
            } else if (pattern.contains('/') || pattern.contains('-'))
                && pattern.chars().any(|c| c.is_ascii_digit())
            {
                categories.dates.push(pattern.to_string());
            }
        }

        categories
    }

    /// Total number of categorized patterns
    pub fn total(&self) -> usize {
        self.percentages.len() + self.dollar_amounts.len() + self.tax_terms.len() + self.dates.len()
    }
}
