//! Crawler module for fetching and walking the site's listings
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching restricted to one domain, with an optional response cache
//! - Following `next_page` links across a listing
//! - Fanning out quote extraction across read books and joining the results

mod cache;
mod coordinator;
mod fetcher;
mod pagination;

pub use cache::ResponseCache;
pub use coordinator::{scrape, ScrapeOutput, Scraper};
pub use fetcher::{build_http_client, Collector};
pub use pagination::{follow_pages, next_page_url, resolve_next_page};
