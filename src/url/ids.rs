/// Reads an external identifier from the trailing path segment of an href
///
/// Site links look like `/book/show/2767052-the-hunger-games` or
/// `/quotes/12345-some-slug`; the identifier is everything after the last `/`.
/// An href with no `/` at all yields no identifier.
///
/// # Examples
///
/// ```
/// use libble::url::parse_id;
///
/// assert_eq!(parse_id("/author/show/153394.Suzanne_Collins"), "153394.Suzanne_Collins");
/// assert_eq!(parse_id("no-slash"), "");
/// ```
pub fn parse_id(href: &str) -> String {
    match href.rfind('/') {
        Some(index) => href[index + 1..].to_string(),
        None => String::new(),
    }
}
