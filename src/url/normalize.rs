use crate::UrlError;
use url::Url;

/// Strips the fragment and the query string from a URL
///
/// This is the de-duplication key for the visited set: two links that differ
/// only in anchor or query parameters point at the same harvestable page.
///
/// # Examples
///
/// ```
/// use finharvest::url::strip_url;
///
/// assert_eq!(strip_url("https://x.gov/rates?year=2024#table"), "https://x.gov/rates");
/// assert_eq!(strip_url("https://x.gov/rates#q?x"), "https://x.gov/rates");
/// ```
pub fn strip_url(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment)
        .to_string()
}

/// Validates a crawl start URL
///
/// # Rules
///
/// 1. Must parse as an absolute URL
/// 2. Scheme must be HTTP or HTTPS
/// 3. Must carry a host
///
/// # Returns
///
/// * `Ok(Url)` - The parsed start URL
/// * `Err(UrlError)` - The URL cannot seed a crawl
pub fn validate_start_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
