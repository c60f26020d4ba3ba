//! Book list extraction
//!
//! Every `tr.bookalike` row holds one book. Its `td.field` cells carry a
//! second class naming the column (`title`, `author`, `avg_rating`, ...),
//! which selects the rule used to read that cell.

use crate::extract::selectors::{ANCHOR, BOOK_ROW, DATE_ROW, FIELD_CELL, FIELD_VALUE};
use crate::extract::{child_attr, child_text, element_text};
use crate::model::Book;
use crate::url::parse_id;
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html};

/// Maps the site's star-rating phrase to a star count
///
/// # Returns
///
/// * `Some(1..=5)` - One of the five rating phrases
/// * `Some(0)` - Empty text, the book is not rated
/// * `None` - Anything else
///
/// # Examples
///
/// ```
/// use libble::extract::star_rating;
///
/// assert_eq!(star_rating("really liked it"), Some(4));
/// assert_eq!(star_rating(""), Some(0));
/// assert_eq!(star_rating("meh"), None);
/// ```
pub fn star_rating(text: &str) -> Option<u8> {
    match text {
        "did not like it" => Some(1),
        "it was ok" => Some(2),
        "liked it" => Some(3),
        "really liked it" => Some(4),
        "it was amazing" => Some(5),
        "" => Some(0),
        _ => None,
    }
}

/// Extracts every valid book row on a book list page
///
/// Rows without an external id are logged and skipped.
pub fn extract_books(document: &Html) -> Vec<Book> {
    document
        .select(&BOOK_ROW)
        .filter_map(|row| match parse_book_row(row) {
            Ok(book) => Some(book),
            Err(e) => {
                tracing::error!("Skipping book row: {}", e);
                None
            }
        })
        .collect()
}

/// Reads one `tr.bookalike` row
///
/// Unparsable numbers and unknown rating phrases are logged and leave the
/// field at its default. Only a missing external id rejects the row.
pub fn parse_book_row(row: ElementRef<'_>) -> ExtractResult<Book> {
    let mut book = Book::default();

    for field in row.select(&FIELD_CELL) {
        let Some(column) = field.value().classes().find(|class| *class != "field") else {
            continue;
        };

        match column {
            "title" => {
                book.title = child_attr(field, &ANCHOR, "title").trim().to_string();
                book.book_id = parse_id(child_attr(field, &ANCHOR, "href"));
            }
            "author" => {
                book.author = child_text(field, &ANCHOR);
                book.author_id = parse_id(child_attr(field, &ANCHOR, "href"));
            }
            "avg_rating" => {
                let text = child_text(field, &FIELD_VALUE);
                match text.parse::<f32>() {
                    Ok(value) => book.avg_rating = value,
                    Err(e) => tracing::warn!(
                        "Error getting avg_rating {:?} for {:?}: {}",
                        text,
                        book.title,
                        e
                    ),
                }
            }
            "num_ratings" => {
                let text = child_text(field, &FIELD_VALUE).replace(',', "");
                match text.parse::<u32>() {
                    Ok(value) => book.rating_count = value,
                    Err(e) => tracing::warn!(
                        "Error getting num_ratings {:?} for {:?}: {}",
                        text,
                        book.title,
                        e
                    ),
                }
            }
            "rating" => {
                let text = child_text(field, &FIELD_VALUE);
                match star_rating(&text) {
                    Some(stars) => book.stars = stars,
                    None => tracing::warn!(
                        "Was unable to translate {:?} to star count for {:?}",
                        text,
                        book.title
                    ),
                }
            }
            "date_read" => {
                book.dates_read.extend(field.select(&DATE_ROW).map(element_text));
            }
            "date_added" => {
                book.date_added = child_text(field, &FIELD_VALUE);
            }
            _ => {}
        }
    }

    if book.is_valid() {
        Ok(book)
    } else {
        Err(ExtractError::MissingBookId { title: book.title })
    }
}
