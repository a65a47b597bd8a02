//! HTML rendering for the default page renderer
//!
//! Turns a fetched HTML document into:
//! - The page title (from the `<title>` tag)
//! - The visible text of `<body>`, one line per text block
//! - Every `<a href>` link in document order, with its anchor text

use crate::fetch::{PageLink, RenderedPage, DEFAULT_TITLE};
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses an HTML document into a rendered page
///
/// # Example
///
/// ```
/// use finharvest::fetch::parse_page;
///
/// let html = r#"<html><head><title>Fees</title></head>
///     <body><p>Permit fee of $40</p><a href="/permits">Permits</a></body></html>"#;
/// let page = parse_page(html);
/// assert_eq!(page.title, "Fees");
/// assert!(page.content.contains("Permit fee of $40"));
/// assert_eq!(page.links[0].href, "/permits");
/// ```
pub fn parse_page(html: &str) -> RenderedPage {
    let document = Html::parse_document(html);

    RenderedPage {
        title: extract_title(&document).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        content: extract_visible_text(&document),
        links: extract_links(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn extract_visible_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = document.select(&body_selector).next() else {
        return String::new();
    };

    let mut lines = Vec::new();
    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let line = collapse_whitespace(text);
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}

fn extract_links(document: &Html) -> Vec<PageLink> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(PageLink::new(href, anchor_text(&element)))
        })
        .collect()
}

fn anchor_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
