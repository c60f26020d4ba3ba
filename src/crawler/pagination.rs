//! Pagination following
//!
//! Listings link to their next page with an `a.next_page` anchor. Pages are
//! walked in an explicit loop, strictly one after another, until there is no
//! next link, the next link was already visited, or the page limit is hit.

use crate::crawler::fetcher::Collector;
use crate::extract::selectors::NEXT_PAGE;
use crate::LibbleError;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Resolves a next-page href against the page it was found on
///
/// The link's path and query are kept; scheme, host and port are always
/// copied from `current`, so a next link can never leave the site.
///
/// # Returns
///
/// * `Some(Url)` - The absolute next page URL
/// * `None` - The href is empty or unparsable; treated as the last page
pub fn resolve_next_page(href: &str, current: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut next = match current.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Error parsing next page href {:?}: {}", href, e);
            return None;
        }
    };

    next.set_scheme(current.scheme()).ok()?;
    next.set_host(current.host_str()).ok()?;
    next.set_port(current.port()).ok()?;
    Some(next)
}

/// Finds the next page link on a parsed page
pub fn next_page_url(document: &Html, current: &Url) -> Option<Url> {
    let href = document
        .select(&NEXT_PAGE)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))?;
    resolve_next_page(href, current)
}

/// Fetches a listing and every page after it, extracting records from each
///
/// # Arguments
///
/// * `collector` - Fetches the pages
/// * `start` - The first page of the listing
/// * `max_pages` - Upper bound on pages fetched
/// * `extract` - Called once per page, in page order
///
/// # Returns
///
/// * `Ok(Vec<T>)` - Records from every page that could be fetched
/// * `Err(LibbleError)` - The first page could not be fetched
///
/// A failure on a later page is logged and ends the walk with the records
/// gathered so far.
pub async fn follow_pages<T, F>(
    collector: &Collector,
    start: Url,
    max_pages: usize,
    mut extract: F,
) -> Result<Vec<T>, LibbleError>
where
    F: FnMut(&Html) -> Vec<T>,
{
    let mut records = Vec::new();
    let mut visited = HashSet::new();
    let mut current = start;

    loop {
        let body = match collector.fetch(&current).await {
            Ok(body) => body,
            Err(e) if visited.is_empty() => return Err(e),
            Err(e) => {
                tracing::error!("Stopping pagination at {}: {}", current, e);
                break;
            }
        };
        visited.insert(current.clone());

        // Parsed documents are not Send; keep this one out of the next await.
        let next = {
            let document = Html::parse_document(&body);
            records.extend(extract(&document));
            next_page_url(&document, &current)
        };

        let Some(next) = next else {
            break;
        };
        if visited.contains(&next) {
            tracing::debug!("Next page {} already visited", next);
            break;
        }
        if visited.len() >= max_pages {
            tracing::warn!(
                "Reached the limit of {} pages, not following {}",
                max_pages,
                next
            );
            break;
        }

        tracing::debug!("Following next page {}", next);
        current = next;
    }

    Ok(records)
}
