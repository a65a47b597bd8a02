use crate::url::validate_start_url;
use crate::UrlError;
use url::Url;

/// The site a crawl is confined to
///
/// Derived from the start URL: its scheme, host and port. Relative links are
/// resolved against this origin and absolute links are kept only when they
/// point back into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl CrawlScope {
    /// Builds the scope from a crawl start URL
    ///
    /// # Examples
    ///
    /// ```
    /// use finharvest::url::CrawlScope;
    ///
    /// let scope = CrawlScope::from_start_url("https://X.gov/newsroom/").unwrap();
    /// assert_eq!(scope.origin(), "https://x.gov");
    /// ```
    pub fn from_start_url(start_url: &str) -> Result<Self, UrlError> {
        let url = validate_start_url(start_url)?;
        let host = extract_domain(&url).ok_or(UrlError::MissingDomain)?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
        })
    }

    /// Host plus explicit port, e.g. `x.gov` or `127.0.0.1:8080`
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Scheme and authority, e.g. `https://x.gov`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority())
    }

    /// Lowercase host of the crawled site
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if `url` is on the crawled host and port
    ///
    /// The scheme is not compared, so `http://` links on an `https://` site
    /// stay in scope.
    pub fn contains(&self, url: &Url) -> bool {
        extract_domain(url).as_deref() == Some(self.host.as_str()) && url.port() == self.port
    }
}

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use finharvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.gov/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.gov".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
