//! Record extraction from the site's listing markup
//!
//! This module turns parsed pages into typed records:
//! - Book rows from a user's book list
//! - Quote blocks from a book's quote listing
//!
//! Extraction never fails a whole page. A row or quote that cannot be read
//! is logged and left out.

pub mod books;
pub mod quotes;
pub(crate) mod selectors;

pub use books::{extract_books, parse_book_row, star_rating};
pub use quotes::{extract_quotes, parse_likes, parse_quote, QuotePageIds, CITATION_DELIMITER};

use scraper::{ElementRef, Selector};

/// Whitespace-trimmed text content of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first descendant matching `selector`, or empty
pub(crate) fn child_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// An attribute of the first descendant matching `selector`, or empty
pub(crate) fn child_attr<'a>(element: ElementRef<'a>, selector: &Selector, attr: &str) -> &'a str {
    element
        .select(selector)
        .next()
        .and_then(|child| child.value().attr(attr))
        .unwrap_or_default()
}
