//! Scrape coordinator - main orchestration logic
//!
//! This module runs a complete scrape for one user:
//! - Fetching the book list, following its pagination
//! - Fanning out one quote extraction task per read book over a bounded pool
//! - Joining every task before returning
//! - Merging quotes in book-list order and dropping duplicate quote ids
//!
//! Only a failure to fetch the first book list page is returned as an error.
//! A book whose quotes cannot be fetched is logged, reported in
//! [`ScrapeOutput::failed_books`], and contributes no quotes.

use crate::config::{Config, ScrapeOptions, SiteConfig};
use crate::crawler::fetcher::Collector;
use crate::crawler::pagination::follow_pages;
use crate::extract::{extract_books, extract_quotes, QuotePageIds};
use crate::model::{Book, Quote};
use crate::LibbleError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Everything a scrape produced
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutput {
    /// Every valid book on the user's list, in list order
    pub books: Vec<Book>,
    /// Kept quotes from every read book, grouped by book in list order
    pub quotes: Vec<Quote>,
    /// Number of books whose quotes were requested
    pub read_books: usize,
    /// Books whose quote listing could not be fetched
    pub failed_books: Vec<String>,
}

/// Main scraper structure
pub struct Scraper {
    collector: Arc<Collector>,
    options: ScrapeOptions,
}

impl Scraper {
    /// Creates a scraper from a full configuration
    pub fn new(config: &Config) -> Result<Self, LibbleError> {
        Self::with_options(&config.site, config.scrape.clone())
    }

    /// Creates a scraper for a site with explicit scrape options
    pub fn with_options(site: &SiteConfig, options: ScrapeOptions) -> Result<Self, LibbleError> {
        let collector = Collector::new(site, &options)?;
        Ok(Self {
            collector: Arc::new(collector),
            options,
        })
    }

    /// Fetches every page of a user's book list
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Book>)` - Valid books from every reachable page
    /// * `Err(LibbleError)` - The first page could not be fetched
    pub async fn scrape_books(&self, user_id: &str) -> Result<Vec<Book>, LibbleError> {
        let url = self.collector.urls().book_list(user_id)?;
        follow_pages(&self.collector, url, self.options.max_pages, extract_books).await
    }

    /// Fetches every page of a book's quote listing
    pub async fn scrape_quotes(&self, book_id: &str) -> Result<Vec<Quote>, LibbleError> {
        quotes_for_book(&self.collector, book_id, &self.options).await
    }

    /// Runs the full scrape for a user
    ///
    /// # Process
    ///
    /// 1. Fetch the book list; an error here aborts the scrape
    /// 2. Spawn one task per read book; at most `max-concurrent-requests`
    ///    run at once
    /// 3. Wait for every task
    /// 4. Merge quotes in book-list order, skipping repeated quote ids
    pub async fn run(&self, user_id: &str) -> Result<ScrapeOutput, LibbleError> {
        let books = self.scrape_books(user_id).await.map_err(|e| {
            tracing::error!("Failed to scrape book list for {}: {}", user_id, e);
            e
        })?;

        let read: Vec<&Book> = books.iter().filter(|book| book.is_read()).collect();
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_requests.max(1)));
        let mut tasks = JoinSet::new();

        for (index, book) in read.iter().enumerate() {
            let collector = Arc::clone(&self.collector);
            let semaphore = Arc::clone(&semaphore);
            let options = self.options.clone();
            let book_id = book.book_id.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = quotes_for_book(&collector, &book_id, &options).await;
                (index, book_id, result)
            });
        }

        // Slots stay `None` unless their task reports quotes
        let mut outcomes: Vec<Option<Vec<Quote>>> = vec![None; read.len()];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(quotes))) => outcomes[index] = Some(quotes),
                Ok((_, book_id, Err(e))) => {
                    tracing::error!("Failed to scrape quotes for book {}: {}", book_id, e);
                }
                Err(e) => tracing::error!("Quote task did not complete: {}", e),
            }
        }

        let book_ids: Vec<&str> = read.iter().map(|book| book.book_id.as_str()).collect();
        let (per_book, failed) = split_outcomes(&book_ids, outcomes);
        let quotes = merge_quotes(per_book);

        tracing::info!("Total Quote Count: {}", quotes.len());
        tracing::info!("Total Book Count: {}", books.len());
        tracing::info!("Read Book Count: {}", read.len());
        if !failed.is_empty() {
            tracing::warn!("Quote extraction failed for {} book(s)", failed.len());
        }

        Ok(ScrapeOutput {
            read_books: read.len(),
            failed_books: failed,
            books,
            quotes,
        })
    }
}

/// Walks one book's quote listing
///
/// Quotes take the book and author ids printed on the page. If the page
/// names no book, the requested book id is used instead.
async fn quotes_for_book(
    collector: &Collector,
    book_id: &str,
    options: &ScrapeOptions,
) -> Result<Vec<Quote>, LibbleError> {
    let url = collector.urls().book_quotes(book_id)?;
    let min_likes = options.min_quote_likes;
    let mut ids = QuotePageIds::default();

    let mut quotes = follow_pages(collector, url, options.max_pages, move |document| {
        extract_quotes(document, &mut ids, min_likes)
    })
    .await?;

    for quote in quotes.iter_mut().filter(|quote| quote.book_id.is_empty()) {
        quote.book_id = book_id.to_string();
    }

    tracing::debug!("Scraped {} quotes from book {}", quotes.len(), book_id);
    Ok(quotes)
}

/// Separates finished books from books whose task failed or never reported
///
/// Failed book ids keep book-list order.
fn split_outcomes(
    book_ids: &[&str],
    outcomes: Vec<Option<Vec<Quote>>>,
) -> (Vec<Vec<Quote>>, Vec<String>) {
    let mut per_book = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();

    for (book_id, outcome) in book_ids.iter().zip(outcomes) {
        match outcome {
            Some(quotes) => per_book.push(quotes),
            None => failed.push(book_id.to_string()),
        }
    }

    (per_book, failed)
}

/// Flattens per-book quotes, keeping the first occurrence of each quote id
fn merge_quotes(per_book: Vec<Vec<Quote>>) -> Vec<Quote> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for quote in per_book.into_iter().flatten() {
        if seen.insert(quote.quote_id.clone()) {
            merged.push(quote);
        } else {
            tracing::debug!("Duplicate quote {} dropped", quote.quote_id);
        }
    }

    merged
}

/// Scrapes a user's books and the quotes of every read book
///
/// # Arguments
///
/// * `user_id` - The user's id as it appears in their profile URL
/// * `config` - Site and scrape options
///
/// # Returns
///
/// * `Ok(ScrapeOutput)` - Books and quotes; per-book quote failures are
///   reported inside the output
/// * `Err(LibbleError)` - The book list could not be fetched
///
/// # Example
///
/// ```no_run
/// use libble::config::Config;
/// use libble::crawler::scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let output = scrape("12345-reader", &Config::default()).await?;
/// println!("{} books, {} quotes", output.books.len(), output.quotes.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(user_id: &str, config: &Config) -> Result<ScrapeOutput, LibbleError> {
    Scraper::new(config)?.run(user_id).await
}
