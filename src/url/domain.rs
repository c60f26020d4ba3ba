use url::Url;

/// Extracts the domain from a URL
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain/host
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use libble::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Goodreads.com/review/list/1").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.goodreads.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host is exactly the allowed domain
///
/// Subdomains are not implicitly allowed; the site serves every page the
/// scraper needs from one host.
pub fn is_allowed(url: &Url, allowed_domain: &str) -> bool {
    match extract_domain(url) {
        Some(domain) => domain == allowed_domain.to_lowercase(),
        None => false,
    }
}
