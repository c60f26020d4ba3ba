//! Configuration module for Libble
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table is optional; a missing file section falls back to the defaults
//! for scraping the public site.
//!
//! # Example
//!
//! ```no_run
//! use libble::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("libble.toml")).unwrap();
//! println!("Minimum quote likes: {}", config.scrape.min_quote_likes);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ScrapeOptions, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
