//! URL handling module for Libble
//!
//! This module knows the site's URL templates, which host requests are
//! allowed to go to, and how external identifiers are read out of URL paths.

mod domain;
mod ids;

pub use domain::{extract_domain, is_allowed};
pub use ids::parse_id;

use crate::config::SiteConfig;
use crate::ConfigError;
use url::Url;

/// URL templates for the single allow-listed site
///
/// Every URL the scraper requests is built here against the configured base,
/// so the collector never has to construct an off-site request.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    domain: String,
}

impl SiteUrls {
    /// Builds the templates from a base URL such as `https://www.goodreads.com`
    ///
    /// # Returns
    ///
    /// * `Ok(SiteUrls)` - The base URL has a host
    /// * `Err(ConfigError)` - The base URL is unparsable or has no host
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let domain = extract_domain(&base)
            .ok_or_else(|| ConfigError::InvalidUrl(format!("{} has no host", base_url)))?;
        Ok(Self { base, domain })
    }

    /// Builds the templates from the site section of the configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url)
    }

    /// The allow-listed host, lowercase
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `https://<domain>/review/list/<user_id>`
    pub fn book_list(&self, user_id: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("/review/list/{}", user_id))
    }

    /// `https://<domain>/book/quotes/<book_id>`
    pub fn book_quotes(&self, book_id: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("/book/quotes/{}", book_id))
    }

    /// Checks a URL against the allow-listed domain
    pub fn allows(&self, url: &Url) -> bool {
        is_allowed(url, &self.domain)
    }
}
