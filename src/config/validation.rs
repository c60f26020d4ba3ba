use crate::config::types::{Config, ScrapeOptions, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_scrape_options(&config.scrape)?;
    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates scrape options
fn validate_scrape_options(options: &ScrapeOptions) -> Result<(), ConfigError> {
    if options.max_concurrent_requests < 1 || options.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 100, got {}",
            options.max_concurrent_requests
        )));
    }

    if options.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            options.max_pages
        )));
    }

    if options.cache {
        if options.cache_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cache-dir cannot be empty when caching is enabled".to_string(),
            ));
        }
        if options.cache_max_age_hours < 1 {
            return Err(ConfigError::Validation(
                "cache-max-age-hours must be >= 1".to_string(),
            ));
        }
    }

    Ok(())
}
