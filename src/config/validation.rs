use crate::config::types::{Config, CrawlConfig, FetchConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates traversal budgets
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    // max_depth of 0 is valid: only the start page is fetched

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates timeouts and retry budgets
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.page_timeout_secs == 0 || config.document_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got page={}s document={}s",
            config.page_timeout_secs, config.document_timeout_secs
        )));
    }

    if config.page_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "page_attempts must be >= 1, got {}",
            config.page_attempts
        )));
    }

    if config.pdf_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "pdf_attempts must be >= 1, got {}",
            config.pdf_attempts
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.folder.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output folder cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the start URL a crawl is seeded with
pub fn parse_start_url(start_url: &str) -> Result<Url, ConfigError> {
    crate::url::validate_start_url(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::with_output_folder("./harvest");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_depth_is_valid() {
        let mut config = Config::with_output_folder("./harvest");
        config.crawl.max_depth = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = Config::with_output_folder("./harvest");
        config.crawl.max_pages = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::with_output_folder("./harvest");
        config.fetch.pdf_attempts = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::with_output_folder("./harvest");
        config.fetch.page_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::with_output_folder("./harvest");
        config.fetch.document_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_folder_rejected() {
        let config = Config::with_output_folder("  ");
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_parse_start_url() {
        assert!(parse_start_url("https://x.gov/").is_ok());
        assert!(matches!(
            parse_start_url("ftp://x.gov/"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = Config::with_output_folder("./harvest");
        config.fetch.user_agent = String::new();
        assert!(validate(&config).is_err());
    }
}
