use serde::{Deserialize, Serialize};

/// Sentinel the site prints in a date-read cell for a book with no read date
pub const DATE_NOT_SET: &str = "not set";

/// A book from a user's public book list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// External id, the trailing path segment of the book's link
    pub book_id: String,
    pub title: String,
    pub author: String,
    /// External id of the author
    pub author_id: String,
    /// The user's rating, 1-5; 0 means unrated
    pub stars: u8,
    pub avg_rating: f32,
    pub rating_count: u32,
    /// Date-read cells in document order, possibly containing [`DATE_NOT_SET`]
    pub dates_read: Vec<String>,
    pub date_added: String,
}

impl Book {
    /// A book is kept only if it has an external id
    pub fn is_valid(&self) -> bool {
        !self.book_id.is_empty()
    }

    /// The site marks a book as read by giving it a star rating
    pub fn is_read(&self) -> bool {
        self.stars > 0
    }

    /// Returns true if any date-read entry holds an actual date
    pub fn has_read_date(&self) -> bool {
        self.dates_read
            .iter()
            .any(|date| !date.is_empty() && date != DATE_NOT_SET)
    }

    /// Title with runs of whitespace collapsed to single spaces
    pub fn clean_title(&self) -> String {
        self.title.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
