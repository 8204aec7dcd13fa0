//! Book detail page.

use maud::{Markup, html};
use shelf_renderer::ImageUrlResolver;
use shelf_site::Book;

use super::{chapter_href, layout};
use crate::SiteSettings;

/// Render a book with its chapter list.
pub(crate) fn render(site: &SiteSettings, images: &dyn ImageUrlResolver, book: &Book) -> Markup {
    let cover = book
        .cover_image
        .as_ref()
        .and_then(|source| images.resolve(source));

    let body = html! {
        div class="book" {
            div class="book-cover" {
                @if let Some(cover) = &cover {
                    img src=(cover) alt=(book.title);
                }
            }
            div {
                h1 { (book.title) }
                @if let Some(author) = &book.author {
                    p class="byline" { "by " (author.name) }
                }
                @if let Some(description) = &book.description {
                    p class="description" { (description) }
                }
                @if !book.chapters.is_empty() {
                    section class="chapters" {
                        h2 { "Chapters" }
                        ol {
                            @for chapter in &book.chapters {
                                li {
                                    a href=(chapter_href(&book.slug, &chapter.slug)) { (chapter.title) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    layout::page(site, &book.title, body)
}
