//! Escaping and URL helpers shared by backends.

/// Escape special HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Whether a link target may be emitted as an `href`.
///
/// Accepts `http`, `https`, `mailto` and `tel` URLs, fragments and relative
/// references. Any other scheme (`javascript:`, `data:`, ...) is rejected.
///
/// # Examples
///
/// ```
/// use shelf_renderer::is_safe_href;
///
/// assert!(is_safe_href("https://example.com"));
/// assert!(is_safe_href("/books/dune"));
/// assert!(!is_safe_href("javascript:alert(1)"));
/// ```
pub fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() {
        return false;
    }

    // A scheme is everything before the first ':' when no '/', '?' or '#'
    // comes earlier.
    let scheme_end = href.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(pos) if href.as_bytes()[pos] == b':' => {
            let scheme = href[..pos].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto" | "tel")
        }
        _ => true,
    }
}
