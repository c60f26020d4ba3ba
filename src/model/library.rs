//! A user's books and quotes keyed by external id

use crate::daily::{pick_daily_quote, pick_daily_quote_on, DailyPick};
use crate::model::{Book, Quote};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Answers whether the book behind a quote has been read
pub trait ReadStatus {
    /// * `Some(true)` / `Some(false)` - The book is known
    /// * `None` - No book with this external id
    fn is_book_read(&self, book_id: &str) -> Option<bool>;
}

impl ReadStatus for BTreeMap<String, Book> {
    fn is_book_read(&self, book_id: &str) -> Option<bool> {
        self.get(book_id).map(Book::is_read)
    }
}

/// Everything scraped for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub user_id: String,
    pub books: BTreeMap<String, Book>,
    pub quotes: BTreeMap<String, Quote>,
    /// Quotes already served as a daily quote
    #[serde(default)]
    pub seen_quotes: BTreeSet<String>,
}

impl Library {
    /// Merges a scrape result with the user's identity
    ///
    /// Invalid records are skipped. When an id appears twice the first
    /// record wins. Quotes whose book is not in the book list are kept, but
    /// logged, since the daily selector will never pick them normally.
    pub fn from_scrape(user_id: impl Into<String>, books: Vec<Book>, quotes: Vec<Quote>) -> Self {
        let user_id = user_id.into();
        let mut library = Self {
            user_id,
            ..Default::default()
        };

        for book in books.into_iter().filter(Book::is_valid) {
            if library.books.contains_key(&book.book_id) {
                tracing::debug!("Duplicate book {} ignored", book.book_id);
                continue;
            }
            library.books.insert(book.book_id.clone(), book);
        }

        for quote in quotes.into_iter().filter(Quote::is_valid) {
            if !quote.book_id.is_empty() && !library.books.contains_key(&quote.book_id) {
                tracing::error!(
                    "Book {} exists on quote {} but wasn't found",
                    quote.book_id,
                    quote.quote_id
                );
            }
            library.quotes.entry(quote.quote_id.clone()).or_insert(quote);
        }

        library
    }

    /// Finds a book by title, ignoring case and surrounding/inner whitespace runs
    pub fn find_book_id(&self, query: &str) -> Option<&str> {
        let query = query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self.books
            .iter()
            .find(|(_, book)| book.clean_title().to_lowercase() == query)
            .map(|(id, _)| id.as_str())
    }

    /// The book a quote was scraped from
    pub fn book_for_quote(&self, quote_id: &str) -> Option<&Book> {
        let quote = self.quotes.get(quote_id)?;
        self.books.get(&quote.book_id)
    }

    /// Records a quote as seen so later selections avoid it
    pub fn mark_seen(&mut self, quote_id: impl Into<String>) {
        self.seen_quotes.insert(quote_id.into());
    }

    /// Picks today's quote (UTC)
    pub fn daily_quote(&self) -> crate::Result<DailyPick> {
        Ok(pick_daily_quote(&self.quotes, &self.seen_quotes, &self.books)?)
    }

    /// Picks the quote for a given date
    pub fn daily_quote_on(&self, date: NaiveDate) -> crate::Result<DailyPick> {
        Ok(pick_daily_quote_on(
            &self.quotes,
            &self.seen_quotes,
            &self.books,
            date,
        )?)
    }
}
