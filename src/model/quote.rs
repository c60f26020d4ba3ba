use serde::{Deserialize, Serialize};

/// A quote from a book's quote listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// External id, the trailing path segment of the quote's link
    pub quote_id: String,
    /// Like count as printed by the site; it can be negative
    pub likes: i64,
    pub text: String,
    /// External id of the book the quote page belongs to
    pub book_id: String,
    /// External id of that book's author
    pub author_id: String,
}

impl Quote {
    /// A quote is kept only if it has an external id
    pub fn is_valid(&self) -> bool {
        !self.quote_id.is_empty()
    }

    /// Returns true if the quote has at least `min_likes` likes
    pub fn meets_threshold(&self, min_likes: i64) -> bool {
        self.likes >= min_likes
    }
}
