//! HTTP collector
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Rejecting requests outside the allow-listed domain
//! - Serving and storing responses through the on-disk cache
//! - Classifying transport and status failures

use crate::config::{ScrapeOptions, SiteConfig};
use crate::crawler::cache::ResponseCache;
use crate::url::SiteUrls;
use crate::LibbleError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The site configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &SiteConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages from the single allow-listed site
///
/// Cheap to share: wrap in an `Arc` and hand a clone to every task.
#[derive(Debug)]
pub struct Collector {
    client: Client,
    urls: SiteUrls,
    cache: Option<ResponseCache>,
}

impl Collector {
    /// Creates a collector for the configured site
    ///
    /// When `options.cache` is false no cache is consulted or written.
    pub fn new(site: &SiteConfig, options: &ScrapeOptions) -> Result<Self, LibbleError> {
        let urls = SiteUrls::from_config(site)?;
        let client = build_http_client(site)?;
        let cache = options
            .cache
            .then(|| ResponseCache::new(&options.cache_dir, options.cache_max_age_hours));

        Ok(Self {
            client,
            urls,
            cache,
        })
    }

    /// URL templates for the allow-listed site
    pub fn urls(&self) -> &SiteUrls {
        &self.urls
    }

    /// Fetches a page body
    ///
    /// # Request Flow
    ///
    /// 1. Reject the URL if its host is not the allow-listed domain
    /// 2. Return a fresh cached body if caching is on
    /// 3. Send a GET request; transport failures and non-2xx statuses are errors
    /// 4. Store the body in the cache if caching is on
    ///
    /// Cache read and write failures are logged and never fail the fetch.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body
    /// * `Err(LibbleError)` - Domain rejection, transport, or status failure
    pub async fn fetch(&self, url: &Url) -> Result<String, LibbleError> {
        if !self.urls.allows(url) {
            return Err(LibbleError::DomainNotAllowed {
                url: url.to_string(),
            });
        }

        if let Some(cache) = &self.cache {
            match cache.get(url).await {
                Ok(Some(body)) => {
                    tracing::debug!("Cache hit for {}", url);
                    return Ok(body);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Ignoring unreadable cache entry: {}", e),
            }
        }

        tracing::debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| LibbleError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LibbleError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| LibbleError::Http {
            url: url.to_string(),
            source,
        })?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(url, &body).await {
                tracing::warn!("Failed to cache response for {}: {}", url, e);
            }
        }

        Ok(body)
    }
}
