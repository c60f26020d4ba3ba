//! Quote listing extraction
//!
//! A quote page names its book and author once, in `a.bookTitle` and
//! `a.authorName`. Those ids are captured from the first page that has them
//! and stamped onto every kept quote, including quotes from later pages.

use crate::extract::selectors::{ANCHOR, AUTHOR_NAME, BOOK_TITLE, QUOTE, QUOTE_RIGHT, QUOTE_TEXT};
use crate::extract::{child_attr, element_text};
use crate::model::Quote;
use crate::url::parse_id;
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html};

/// Separates the quote text from its citation ("― Author, Book")
pub const CITATION_DELIMITER: char = '\u{2015}';

/// Book and author ids shared by every quote of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotePageIds {
    pub book_id: Option<String>,
    pub author_id: Option<String>,
}

impl QuotePageIds {
    /// Captures whichever ids are still unknown from the first matching anchors
    pub fn capture(&mut self, document: &Html) {
        if self.book_id.is_none() {
            self.book_id = first_href_id(document, &BOOK_TITLE);
        }
        if self.author_id.is_none() {
            self.author_id = first_href_id(document, &AUTHOR_NAME);
        }
    }

    fn apply(&self, quote: &mut Quote) {
        quote.book_id = self.book_id.clone().unwrap_or_default();
        quote.author_id = self.author_id.clone().unwrap_or_default();
    }
}

fn first_href_id(document: &Html, selector: &scraper::Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(parse_id)
        .filter(|id| !id.is_empty())
}

/// Parses a like count such as `"1,204 likes"`, `"1 like"` or `"-2 likes"`
///
/// # Examples
///
/// ```
/// use libble::extract::parse_likes;
///
/// assert_eq!(parse_likes("  42 likes ").unwrap(), 42);
/// assert_eq!(parse_likes("-3 likes").unwrap(), -3);
/// assert!(parse_likes("many likes").is_err());
/// ```
pub fn parse_likes(text: &str) -> ExtractResult<i64> {
    let trimmed = text.trim();
    let number = trimmed
        .strip_suffix("likes")
        .or_else(|| trimmed.strip_suffix("like"))
        .unwrap_or(trimmed)
        .trim();
    number
        .replace(',', "")
        .parse::<i64>()
        .map_err(|_| ExtractError::InvalidLikes {
            text: text.trim().to_string(),
        })
}

/// Reads one `div.quote` block
///
/// The returned quote has no book or author id yet.
pub fn parse_quote(element: ElementRef<'_>) -> ExtractResult<Quote> {
    let full_text = element
        .select(&QUOTE_TEXT)
        .next()
        .map(element_text)
        .ok_or(ExtractError::MissingElement("div.quoteText"))?;
    let end = full_text
        .rfind(CITATION_DELIMITER)
        .ok_or(ExtractError::MissingDelimiter)?;
    let text = full_text[..end].trim().to_string();

    let right = element
        .select(&QUOTE_RIGHT)
        .next()
        .ok_or(ExtractError::MissingElement("div.right"))?;
    let likes = parse_likes(&element_text(right))?;

    let quote_id = parse_id(child_attr(right, &ANCHOR, "href"));
    if quote_id.is_empty() {
        return Err(ExtractError::MissingQuoteId);
    }

    Ok(Quote {
        quote_id,
        likes,
        text,
        book_id: String::new(),
        author_id: String::new(),
    })
}

/// Extracts the quotes on one page that have at least `min_likes` likes
///
/// `ids` carries the book and author ids across pages of the same listing.
pub fn extract_quotes(document: &Html, ids: &mut QuotePageIds, min_likes: i64) -> Vec<Quote> {
    ids.capture(document);

    let mut quotes = Vec::new();
    for element in document.select(&QUOTE) {
        let mut quote = match parse_quote(element) {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!("Skipping quote: {}", e);
                continue;
            }
        };

        if !quote.meets_threshold(min_likes) {
            tracing::trace!(
                "Dropping quote {} with {} likes",
                quote.quote_id,
                quote.likes
            );
            continue;
        }

        ids.apply(&mut quote);
        quotes.push(quote);
    }
    quotes
}
