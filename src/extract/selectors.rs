use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect(concat!("Invalid CSS selector: ", $css)));
    };
}

// Shared
selector!(ANCHOR, "a");
selector!(NEXT_PAGE, "a.next_page");

// Book list
selector!(BOOK_ROW, "tr.bookalike");
selector!(FIELD_CELL, "td.field");
selector!(FIELD_VALUE, "div.value");
selector!(DATE_ROW, "div.date_row");

// Quote listing
selector!(BOOK_TITLE, "a.bookTitle");
selector!(AUTHOR_NAME, "a.authorName");
selector!(QUOTE, "div.quote");
selector!(QUOTE_TEXT, "div.quoteText");
selector!(QUOTE_RIGHT, "div.right");
