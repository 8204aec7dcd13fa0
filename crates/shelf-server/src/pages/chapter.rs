//! Chapter reader page.

use maud::{Markup, PreEscaped, html};
use shelf_site::ChapterPage;

use super::{book_href, chapter_href, layout};
use crate::SiteSettings;

/// Render a chapter. `content_html` is the already rendered chapter body.
pub(crate) fn render(site: &SiteSettings, page: &ChapterPage, content_html: &str) -> Markup {
    let book = &page.book;
    let chapter = &page.chapter;
    let nav = &page.navigation;

    let body = html! {
        article class="reader" {
            a class="back" href=(book_href(&book.slug)) { "← Back to " (book.title) }
            header {
                h1 { (chapter.title) }
                @if let Some(author) = &book.author {
                    p class="byline" { "from " (book.title) " by " (author.name) }
                }
            }
            @if let Some(audio) = &chapter.audio_url {
                div class="player" {
                    audio controls src=(audio) {
                        "Your browser does not support the audio element."
                    }
                }
            }
            div class="content" { (PreEscaped(content_html)) }
            nav class="chapter-nav" {
                @if let Some(previous) = &nav.previous {
                    a rel="prev" href=(chapter_href(&book.slug, &previous.slug)) { "← " (previous.title) }
                } @else {
                    span {}
                }
                span class="position" { (nav.position_label()) }
                @if let Some(next) = &nav.next {
                    a rel="next" href=(chapter_href(&book.slug, &next.slug)) { (next.title) " →" }
                } @else {
                    span {}
                }
            }
        }
    };
    layout::page(site, &format!("{} - {}", chapter.title, book.title), body)
}
