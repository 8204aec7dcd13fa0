//! HTML page templates.
//!
//! Every page is a complete document built with [maud](https://maud.lambda.xyz/),
//! which escapes all dynamic values. Rendered chapter content is the only
//! markup inserted unescaped.

pub(crate) mod book;
pub(crate) mod chapter;
pub(crate) mod error;
pub(crate) mod home;
pub(crate) mod layout;

use percent_encoding::{AsciiSet, CONTROLS, PercentEncode, utf8_percent_encode};

/// Characters escaped in a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(slug: &str) -> PercentEncode<'_> {
    utf8_percent_encode(slug, SEGMENT)
}

/// URL of a book page.
///
/// Also the page's cache key: distinct slugs always give distinct URLs.
pub(crate) fn book_href(book_slug: &str) -> String {
    format!("/books/{}", segment(book_slug))
}

/// URL of a chapter page.
///
/// Also the page's cache key: distinct slug pairs always give distinct URLs.
pub(crate) fn chapter_href(book_slug: &str, chapter_slug: &str) -> String {
    format!(
        "/books/{}/chapters/{}",
        segment(book_slug),
        segment(chapter_slug)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_slugs_unchanged() {
        assert_eq!(book_href("dune"), "/books/dune");
        assert_eq!(chapter_href("dune", "rise-1"), "/books/dune/chapters/rise-1");
    }

    #[test]
    fn test_slugs_are_encoded() {
        assert_eq!(book_href("a b?c#d"), "/books/a%20b%3Fc%23d");
        assert_eq!(book_href("100%"), "/books/100%25");
        assert_eq!(book_href("café"), "/books/caf%C3%A9");
    }

    #[test]
    fn test_slash_in_slug_cannot_collide() {
        assert_eq!(chapter_href("a/b", "c"), "/books/a%2Fb/chapters/c");
        assert_ne!(chapter_href("a/b", "c"), chapter_href("a", "b/c"));
    }
}
