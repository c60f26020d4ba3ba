//! Libble: reading-history harvester for a daily quote guessing game
//!
//! This crate scrapes a user's public book list and the quotes of every book
//! they have read from a book-cataloguing site, normalizes the markup into
//! typed records, and picks a deterministic "quote of the day" from the result.

pub mod config;
pub mod crawler;
pub mod daily;
pub mod extract;
pub mod model;
pub mod url;

use thiserror::Error;

/// Main error type for Libble operations
#[derive(Debug, Error)]
pub enum LibbleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Refusing to fetch {url}: host is outside the allowed domain")]
    DomainNotAllowed { url: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Response cache error at {path}: {source}")]
    Cache {
        path: String,
        source: std::io::Error,
    },

    #[error("Daily selection failed: {0}")]
    Selection(#[from] SelectionError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Per-record extraction failures
///
/// These never abort a scrape; the offending row or quote is logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Book row has no external id (title: {title:?})")]
    MissingBookId { title: String },

    #[error("Quote has no external id")]
    MissingQuoteId,

    #[error("Quote text has no citation delimiter")]
    MissingDelimiter,

    #[error("Failed to parse likes from {text:?}")]
    InvalidLikes { text: String },

    #[error("Missing element: {0}")]
    MissingElement(&'static str),
}

/// Daily quote selection failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("User has no quotes")]
    NoQuotes,

    #[error("Slot for quote {quote_id} was redrawn too many times")]
    RetryLimitExceeded { quote_id: String },
}

/// Result type alias for Libble operations
pub type Result<T> = std::result::Result<T, LibbleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for record extraction
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::{Config, ScrapeOptions};
pub use crawler::{scrape, ScrapeOutput, Scraper};
pub use daily::{pick_daily_quote, pick_daily_quote_on, DailyPick};
pub use model::{Book, Library, Quote};
