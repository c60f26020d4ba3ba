use serde::Deserialize;

/// Default site the scraper is allowed to talk to
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// Default directory for cached responses
pub const DEFAULT_CACHE_DIR: &str = "./.request_cache";

/// Quotes with fewer likes than this are discarded
pub const DEFAULT_MIN_QUOTE_LIKES: i64 = 5;

/// Main configuration structure for Libble
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub scrape: ScrapeOptions,
}

/// The single site the collector is allowed to fetch from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host every request is built against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("libble/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
        }
    }
}

/// Options for a single scrape run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Serve and store responses through the on-disk cache
    pub cache: bool,

    /// Directory holding cached responses, one file per request URL
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// Cached responses older than this are fetched again
    #[serde(rename = "cache-max-age-hours")]
    pub cache_max_age_hours: u64,

    /// Minimum like count for a quote to be kept
    #[serde(rename = "min-quote-likes")]
    pub min_quote_likes: i64,

    /// Width of the quote extraction worker pool
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Upper bound on pages followed for a single listing
    #[serde(rename = "max-pages")]
    pub max_pages: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            cache: true,
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            cache_max_age_hours: 24,
            min_quote_likes: DEFAULT_MIN_QUOTE_LIKES,
            max_concurrent_requests: 8,
            max_pages: 50,
        }
    }
}

impl ScrapeOptions {
    /// Options with caching turned off, otherwise default
    pub fn uncached() -> Self {
        Self {
            cache: false,
            ..Self::default()
        }
    }
}
