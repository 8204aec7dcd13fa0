//! Book list page.

use maud::{Markup, html};
use shelf_renderer::ImageUrlResolver;
use shelf_site::BookSummary;

use super::{book_href, layout};
use crate::SiteSettings;

/// Render the book list.
pub(crate) fn render(
    site: &SiteSettings,
    images: &dyn ImageUrlResolver,
    books: &[BookSummary],
) -> Markup {
    let body = html! {
        h1 class="library-title" { (site.title) }
        @if books.is_empty() {
            p class="empty" { "No books found" }
        } @else {
            div class="book-grid" {
                @for book in books {
                    a class="book-card" href=(book_href(&book.slug)) {
                        @if let Some(cover) = book.cover_image.as_ref().and_then(|c| images.resolve(c)) {
                            img src=(cover) alt=(book.title) loading="lazy";
                        }
                        div class="book-card-text" {
                            h2 { (book.title) }
                            @if let Some(author) = &book.author {
                                p { "by " (author.name) }
                            }
                            @if let Some(description) = &book.description {
                                p { (description) }
                            }
                        }
                    }
                }
            }
        }
    };
    layout::page(site, &site.title, body)
}

#[cfg(test)]
mod tests {
    use shelf_renderer::{DirectUrlResolver, ImageSource};
    use shelf_site::Author;

    use super::*;

    fn site() -> SiteSettings {
        SiteSettings {
            title: "Your Library".to_owned(),
            footer_name: "Book Platform".to_owned(),
            studio_url: None,
        }
    }

    #[test]
    fn test_empty_library() {
        let html = render(&site(), &DirectUrlResolver, &[]).into_string();
        assert!(html.contains("Your Library"));
        assert!(html.contains("No books found"));
    }

    #[test]
    fn test_book_cards() {
        let books = vec![BookSummary {
            id: "book-1".to_owned(),
            title: "Dune".to_owned(),
            slug: "dune".to_owned(),
            description: Some("Desert & spice".to_owned()),
            cover_image: Some(ImageSource {
                reference: None,
                url: Some("https://cdn.example/dune.jpg".to_owned()),
            }),
            author: Some(Author {
                name: "Frank Herbert".to_owned(),
                ..Author::default()
            }),
        }];

        let html = render(&site(), &DirectUrlResolver, &books).into_string();

        assert!(html.contains(r#"href="/books/dune""#));
        assert!(html.contains(r#"src="https://cdn.example/dune.jpg""#));
        assert!(html.contains("by Frank Herbert"));
        assert!(html.contains("Desert &amp; spice"));
        assert!(!html.contains("No books found"));
    }
}
