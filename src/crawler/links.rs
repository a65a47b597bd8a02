//! Link extraction and prioritization
//!
//! Raw links from a page are resolved against the crawl scope, stripped,
//! filtered, and split into three tiers. Documents are followed first,
//! then links that look financial, then a handful of everything else.

use crate::content::PatternRegistry;
use crate::fetch::PageLink;
use crate::url::{is_document_url, is_generic_page, strip_url, CrawlScope};
use std::collections::HashSet;
use url::Url;

/// Default cap on the "other" tier
pub const DEFAULT_MAX_OTHER_LINKS: usize = 5;

/// Candidate links split by priority tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrioritizedLinks {
    pub documents: Vec<String>,
    pub financial: Vec<String>,
    /// Already truncated to the configured cap
    pub other: Vec<String>,
}

impl PrioritizedLinks {
    /// Documents, then financial, then other, without duplicates
    pub fn into_ordered(self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.documents
            .into_iter()
            .chain(self.financial)
            .chain(self.other)
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.documents.len() + self.financial.len() + self.other.len()
    }
}

/// Resolves a raw `href` to an absolute URL inside `scope`
///
/// # Resolution Rules
///
/// | href | Result |
/// |------|--------|
/// | `#...`, `mailto:...`, `tel:...`, `javascript:...` | dropped |
/// | `/path` | `{origin}/path` |
/// | `http(s)://...` on the crawled host | `{origin}{path}` |
/// | `http(s)://...` elsewhere | dropped |
/// | anything else | `{origin}/{href}` |
///
/// Relative links join against the site root, not the current page.
/// Absolute links are rebuilt on the crawl origin, so host case, scheme and
/// default-port spellings of one page share a single key.
pub fn resolve_link(href: &str, scope: &CrawlScope) -> Option<String> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    if href.starts_with("//") {
        let absolute = Url::parse(&format!("https:{}", href)).ok()?;
        return scope.contains(&absolute).then(|| href_with_origin(scope, &absolute));
    }

    if href.starts_with('/') {
        return Some(format!("{}{}", scope.origin(), href));
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        let absolute = Url::parse(href).ok()?;
        return scope.contains(&absolute).then(|| href_with_origin(scope, &absolute));
    }

    Some(format!("{}/{}", scope.origin(), href))
}

fn href_with_origin(scope: &CrawlScope, absolute: &Url) -> String {
    let mut resolved = format!("{}{}", scope.origin(), absolute.path());
    if let Some(query) = absolute.query() {
        resolved.push('?');
        resolved.push_str(query);
    }
    resolved
}

/// Extracts new candidate links from a page and sorts them into tiers
///
/// # Arguments
///
/// * `links` - Raw links in page order
/// * `scope` - Crawl scope used to resolve and filter links
/// * `registry` - Keyword tables for the generic and financial checks
/// * `is_visited` - Visited-set lookup for stripped URLs
/// * `max_other` - Cap on the "other" tier
pub fn prioritize_links<F>(
    links: &[PageLink],
    scope: &CrawlScope,
    registry: &PatternRegistry,
    is_visited: F,
    max_other: usize,
) -> PrioritizedLinks
where
    F: Fn(&str) -> bool,
{
    let mut prioritized = PrioritizedLinks::default();
    let mut other = Vec::new();

    for link in links {
        let Some(absolute) = resolve_link(&link.href, scope) else {
            continue;
        };
        let clean = strip_url(&absolute);

        if is_visited(&clean) || is_generic_page(&clean, registry) {
            continue;
        }

        if is_document_url(&clean) {
            prioritized.documents.push(clean);
        } else if registry.mentions_financial_keyword(&clean)
            || registry.mentions_financial_keyword(&link.text)
        {
            prioritized.financial.push(clean);
        } else {
            other.push(clean);
        }
    }

    other.truncate(max_other);
    prioritized.other = other;

    tracing::debug!(
        "Prioritized links: {} documents, {} financial, {} other",
        prioritized.documents.len(),
        prioritized.financial.len(),
        prioritized.other.len()
    );

    prioritized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> CrawlScope {
        CrawlScope::from_start_url("https://x.gov/").unwrap()
    }

    fn never_visited(_: &str) -> bool {
        false
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve_link("/tax/rates", &scope()),
            Some("https://x.gov/tax/rates".to_string())
        );
    }

    #[test]
    fn test_resolve_bare_relative_joins_root() {
        assert_eq!(
            resolve_link("fees.html", &scope()),
            Some("https://x.gov/fees.html".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_same_domain() {
        assert_eq!(
            resolve_link("https://x.gov/budget", &scope()),
            Some("https://x.gov/budget".to_string())
        );
    }

    #[test]
    fn test_resolve_spellings_of_one_page_agree() {
        for href in [
            "/fees",
            "https://X.GOV/fees",
            "http://x.gov/fees",
            "https://x.gov:443/fees",
            "https://x.gov/fees#table",
        ] {
            assert_eq!(
                resolve_link(href, &scope()),
                Some("https://x.gov/fees".to_string()),
                "{}",
                href
            );
        }
    }

    #[test]
    fn test_resolve_drops_other_domains() {
        assert_eq!(resolve_link("https://other.gov/budget", &scope()), None);
        assert_eq!(resolve_link("//cdn.other.gov/a.pdf", &scope()), None);
    }

    #[test]
    fn test_resolve_protocol_relative_same_domain() {
        assert_eq!(
            resolve_link("//x.gov/rates.pdf", &scope()),
            Some("https://x.gov/rates.pdf".to_string())
        );
    }

    #[test]
    fn test_resolve_drops_special_links() {
        assert_eq!(resolve_link("#top", &scope()), None);
        assert_eq!(resolve_link("mailto:clerk@x.gov", &scope()), None);
        assert_eq!(resolve_link("tel:5551234", &scope()), None);
        assert_eq!(resolve_link("javascript:void(0)", &scope()), None);
    }

    #[test]
    fn test_tiering_two_three_twenty() {
        let mut links = vec![
            PageLink::new("/files/rates.pdf", "Rates"),
            PageLink::new("/files/budget.xlsx", "Budget"),
            PageLink::new("/tax", "Tax"),
            PageLink::new("/permits", "Permits"),
            PageLink::new("/parks", "Fee information"),
        ];
        for i in 0..20 {
            links.push(PageLink::new(format!("/page{}", i), format!("Page {}", i)));
        }

        let prioritized = prioritize_links(&links, &scope(), &PatternRegistry::new(), never_visited, 5);
        let ordered = prioritized.into_ordered();

        assert_eq!(ordered.len(), 10);
        assert_eq!(
            &ordered[..5],
            &[
                "https://x.gov/files/rates.pdf",
                "https://x.gov/files/budget.xlsx",
                "https://x.gov/tax",
                "https://x.gov/permits",
                "https://x.gov/parks",
            ]
        );
        assert_eq!(ordered[5], "https://x.gov/page0");
        assert_eq!(ordered[9], "https://x.gov/page4");
    }

    #[test]
    fn test_generic_and_visited_links_dropped() {
        let links = vec![
            PageLink::new("/about-us", "About"),
            PageLink::new("/tax/rates", "Rates"),
            PageLink::new("/tax/forms", "Forms"),
        ];

        let prioritized = prioritize_links(
            &links,
            &scope(),
            &PatternRegistry::new(),
            |url| url == "https://x.gov/tax/rates",
            5,
        );

        assert_eq!(prioritized.financial, vec!["https://x.gov/tax/forms"]);
        assert_eq!(prioritized.total(), 1);
    }

    #[test]
    fn test_duplicates_removed_preserving_order() {
        let links = vec![
            PageLink::new("/tax?year=2023", "Tax"),
            PageLink::new("/tax#rates", "Tax"),
            PageLink::new("/library", "Library"),
            PageLink::new("/library", "Library"),
        ];

        let ordered =
            prioritize_links(&links, &scope(), &PatternRegistry::new(), never_visited, 5)
                .into_ordered();

        assert_eq!(ordered, vec!["https://x.gov/tax", "https://x.gov/library"]);
    }
}
