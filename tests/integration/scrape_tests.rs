//! End-to-end scrape tests
//!
//! A wiremock server plays the book site: a paginated book list for user
//! `u1` and one quote listing per book.

use chrono::NaiveDate;
use libble::config::{Config, ScrapeOptions, SiteConfig};
use libble::crawler::Scraper;
use libble::{Library, LibbleError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an uncached configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            ..SiteConfig::default()
        },
        scrape: ScrapeOptions::uncached(),
    }
}

/// One `tr.bookalike` row
fn book_row(book_id: &str, title: &str, rating: &str) -> String {
    format!(
        r#"<tr class="bookalike review">
            <td class="field title"><div class="value"><a title="{title}" href="/book/show/{book_id}">{title}</a></div></td>
            <td class="field author"><div class="value"><a href="/author/show/42.Some_Author">Author, Some</a></div></td>
            <td class="field avg_rating"><div class="value">3.90</div></td>
            <td class="field num_ratings"><div class="value">1,024</div></td>
            <td class="field rating"><div class="value">{rating}</div></td>
            <td class="field date_read"><div class="value"><div class="date_row">Mar 01, 2024</div></div></td>
            <td class="field date_added"><div class="value">Feb 11, 2024</div></td>
        </tr>"#
    )
}

/// A book list page, optionally linking to a next page
fn book_list_page(rows: &[String], next: Option<&str>) -> String {
    let pagination = match next {
        Some(href) => format!(r#"<a class="next_page" rel="next" href="{}">next »</a>"#, href),
        None => r#"<span class="next_page disabled">next »</span>"#.to_string(),
    };
    format!(
        r#"<html><body><table id="books"><tbody>{}</tbody></table>
           <div id="reviewPagination">{}</div></body></html>"#,
        rows.join("\n"),
        pagination
    )
}

/// One `div.quote` block
fn quote_block(quote_id: &str, text: &str, likes: i64) -> String {
    format!(
        r#"<div class="quote"><div class="quoteDetails">
            <div class="quoteText">“{text}”<br> &#8213; <span class="authorOrTitle">Some Author,</span></div>
            <div class="quoteFooter"><div class="right"><a class="smallText" href="/quotes/{quote_id}">{likes} likes</a></div></div>
        </div></div>"#
    )
}

/// A single-page quote listing for a book
fn quote_page(book_id: &str, blocks: &[String]) -> String {
    format!(
        r#"<html><body>
           <h1><a class="bookTitle" href="/book/show/{}">Title</a></h1>
           <a class="authorName" href="/author/show/42.Some_Author">Some Author</a>
           <div class="quotes">{}</div></body></html>"#,
        book_id,
        blocks.join("\n")
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts the two-page list: 1-one (read), 2-two (unread), 3-three (read)
async fn mount_book_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(html(book_list_page(
            &[
                book_row("1-one", "One", "it was amazing"),
                book_row("2-two", "Two", ""),
            ],
            Some("/review/list/u1?page=2"),
        )))
        .mount(server)
        .await;

    // Higher priority so it wins over the bare path matcher above
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .and(query_param("page", "2"))
        .respond_with(html(book_list_page(
            &[book_row("3-three", "Three", "liked it")],
            None,
        )))
        .with_priority(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_two_page_list() {
    let server = MockServer::start().await;
    mount_book_list(&server).await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/1-one"))
        .respond_with(html(quote_page(
            "1-one",
            &[
                quote_block("11-first", "First quote", 120),
                quote_block("12-quiet", "Below the threshold", 2),
            ],
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/3-three"))
        .respond_with(html(quote_page(
            "3-three",
            &[quote_block("31-third", "Third quote", 5)],
        )))
        .expect(1)
        .mount(&server)
        .await;

    // The unread book is never visited
    Mock::given(method("GET"))
        .and(path("/book/quotes/2-two"))
        .respond_with(html(quote_page("2-two", &[quote_block("21-x", "x", 99)])))
        .expect(0)
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let output = scraper.run("u1").await.expect("Scrape failed");

    let book_ids: Vec<&str> = output.books.iter().map(|b| b.book_id.as_str()).collect();
    assert_eq!(book_ids, vec!["1-one", "2-two", "3-three"]);
    assert_eq!(output.read_books, 2);
    assert!(output.failed_books.is_empty());

    let quotes: Vec<(&str, &str)> = output
        .quotes
        .iter()
        .map(|q| (q.quote_id.as_str(), q.book_id.as_str()))
        .collect();
    assert_eq!(quotes, vec![("11-first", "1-one"), ("31-third", "3-three")]);
    assert!(output.quotes.iter().all(|q| q.book_id != "2-two"));
    assert!(output.quotes.iter().all(|q| q.author_id == "42.Some_Author"));

    let first = &output.books[0];
    assert_eq!(first.stars, 5);
    assert_eq!(first.rating_count, 1024);
    assert_eq!(first.dates_read, vec!["Mar 01, 2024"]);
}

#[tokio::test]
async fn test_book_list_failure_aborts_scrape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let result = scraper.run("u1").await;

    assert!(matches!(
        result,
        Err(LibbleError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_failed_quote_page_is_reported_not_fatal() {
    let server = MockServer::start().await;
    mount_book_list(&server).await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/1-one"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/3-three"))
        .respond_with(html(quote_page(
            "3-three",
            &[quote_block("31-third", "Third quote", 50)],
        )))
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let output = scraper.run("u1").await.expect("Scrape failed");

    assert_eq!(output.books.len(), 3);
    assert_eq!(output.failed_books, vec!["1-one"]);
    assert_eq!(output.quotes.len(), 1);
    assert_eq!(output.quotes[0].quote_id, "31-third");
}

#[tokio::test]
async fn test_quote_shared_by_two_books_kept_once() {
    let server = MockServer::start().await;
    mount_book_list(&server).await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/1-one"))
        .respond_with(html(quote_page(
            "1-one",
            &[quote_block("77-shared", "Shared quote", 40)],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/3-three"))
        .respond_with(html(quote_page(
            "3-three",
            &[
                quote_block("77-shared", "Shared quote", 40),
                quote_block("31-third", "Third quote", 50),
            ],
        )))
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let output = scraper.run("u1").await.expect("Scrape failed");

    let quotes: Vec<(&str, &str)> = output
        .quotes
        .iter()
        .map(|q| (q.quote_id.as_str(), q.book_id.as_str()))
        .collect();
    assert_eq!(quotes, vec![("77-shared", "1-one"), ("31-third", "3-three")]);
}

#[tokio::test]
async fn test_quote_listing_pages_are_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(html(book_list_page(
            &[book_row("1-one", "One", "it was ok")],
            None,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/1-one"))
        .respond_with(html(format!(
            r#"{}<a class="next_page" href="/book/quotes/1-one?page=2">next</a>"#,
            quote_page("1-one", &[quote_block("11-a", "A", 10)])
        )))
        .mount(&server)
        .await;

    // Later pages carry no header; the ids from page one still apply
    Mock::given(method("GET"))
        .and(path("/book/quotes/1-one"))
        .and(query_param("page", "2"))
        .respond_with(html(format!(
            r#"<html><body>{}</body></html>"#,
            quote_block("12-b", "B", 10)
        )))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let quotes = scraper.scrape_quotes("1-one").await.expect("Quote scrape failed");

    let ids: Vec<&str> = quotes.iter().map(|q| q.quote_id.as_str()).collect();
    assert_eq!(ids, vec!["11-a", "12-b"]);
    assert!(quotes.iter().all(|q| q.book_id == "1-one"));
}

#[tokio::test]
async fn test_pagination_stops_at_page_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(html(book_list_page(
            &[book_row("1-one", "One", "")],
            Some("/review/list/u1?page=2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .and(query_param("page", "2"))
        .respond_with(html(book_list_page(
            &[book_row("2-two", "Two", "")],
            Some("/review/list/u1?page=3"),
        )))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .and(query_param("page", "3"))
        .respond_with(html(book_list_page(&[book_row("3-three", "Three", "")], None)))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.scrape.max_pages = 2;

    let scraper = Scraper::new(&config).expect("Failed to create scraper");
    let books = scraper.scrape_books("u1").await.expect("Book scrape failed");

    assert_eq!(books.len(), 2);
}

#[tokio::test]
async fn test_pagination_cycle_terminates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(html(book_list_page(
            &[book_row("1-one", "One", "")],
            Some("/review/list/u1?page=2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Page two links straight back to itself
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .and(query_param("page", "2"))
        .respond_with(html(book_list_page(
            &[book_row("2-two", "Two", "")],
            Some("/review/list/u1?page=2"),
        )))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let books = scraper.scrape_books("u1").await.expect("Book scrape failed");

    let ids: Vec<&str> = books.iter().map(|b| b.book_id.as_str()).collect();
    assert_eq!(ids, vec!["1-one", "2-two"]);
}

#[tokio::test]
async fn test_scraped_library_picks_read_quote() {
    let server = MockServer::start().await;
    mount_book_list(&server).await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/1-one"))
        .respond_with(html(quote_page(
            "1-one",
            &[
                quote_block("11-first", "First quote", 120),
                quote_block("13-second", "Second quote", 80),
            ],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/quotes/3-three"))
        .respond_with(html(quote_page(
            "3-three",
            &[quote_block("31-third", "Third quote", 50)],
        )))
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let output = scraper.run("u1").await.expect("Scrape failed");
    let library = Library::from_scrape("u1", output.books, output.quotes);

    assert_eq!(library.books.len(), 3);
    assert_eq!(library.quotes.len(), 3);
    assert_eq!(library.find_book_id("three"), Some("3-three"));

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
    let pick = library.daily_quote_on(date).expect("Selection failed");
    let again = library.daily_quote_on(date).expect("Selection failed");

    assert_eq!(pick, again);
    assert!(!pick.recycled);
    let book = library.book_for_quote(&pick.quote_id).expect("Quote has a book");
    assert!(book.is_read());
}

#[tokio::test]
async fn test_later_page_failure_keeps_earlier_books() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(html(book_list_page(
            &[book_row("1-one", "One", "it was ok")],
            Some("/review/list/u1?page=2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let scraper =
        Scraper::new(&create_test_config(&server.uri())).expect("Failed to create scraper");
    let books = scraper.scrape_books("u1").await.expect("Book scrape failed");

    let ids: Vec<&str> = books.iter().map(|b| b.book_id.as_str()).collect();
    assert_eq!(ids, vec!["1-one"]);
}

#[tokio::test]
async fn test_uncached_scrape_always_fetches_live() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/review/list/u1"))
        .respond_with(html(book_list_page(&[book_row("1-one", "One", "")], None)))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let cache_dir = dir.path().join("cache");
    let mut config = create_test_config(&server.uri());
    config.scrape.cache_dir = cache_dir.display().to_string();

    let scraper = Scraper::new(&config).expect("Failed to create scraper");
    let first = scraper.scrape_books("u1").await.expect("Book scrape failed");
    let second = scraper.scrape_books("u1").await.expect("Book scrape failed");

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(!cache_dir.exists(), "uncached scrape wrote to {:?}", cache_dir);
}
