//! Record types produced by the scraper
//!
//! # Components
//!
//! - `Book`: one row of a user's book list
//! - `Quote`: one quote from a book's quote listing
//! - `Library`: a user's books and quotes keyed by external id, ready to be
//!   handed to a persistence layer or the daily selector

mod book;
mod library;
mod quote;

pub use book::{Book, DATE_NOT_SET};
pub use library::{Library, ReadStatus};
pub use quote::Quote;
