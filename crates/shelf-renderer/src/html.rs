//! HTML backend for Portable Text rendering.
//!
//! Produces semantic HTML5 output suitable for web display.

use std::fmt::Write;

use crate::backend::{Mark, RenderBackend};
use crate::util::escape_html;

/// HTML render backend.
///
/// Produces semantic HTML5 with:
/// - `<p>`, `<h1>`..`<h6>` and `<blockquote>` for blocks
/// - `<ul>`/`<ol>` for lists
/// - `<figure>` for images
/// - `<pre><code>` for code listings
/// - `<audio controls>` for audio
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn paragraph_start(out: &mut String) {
        out.push_str("<p>");
    }

    fn paragraph_end(out: &mut String) {
        out.push_str("</p>");
    }

    fn heading_start(level: u8, out: &mut String) {
        write!(out, "<h{level}>").unwrap();
    }

    fn heading_end(level: u8, out: &mut String) {
        write!(out, "</h{level}>").unwrap();
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn list_start(ordered: bool, out: &mut String) {
        out.push_str(if ordered { "<ol>" } else { "<ul>" });
    }

    fn list_end(ordered: bool, out: &mut String) {
        out.push_str(if ordered { "</ol>" } else { "</ul>" });
    }

    fn list_item_start(out: &mut String) {
        out.push_str("<li>");
    }

    fn list_item_end(out: &mut String) {
        out.push_str("</li>");
    }

    fn mark_start(mark: Mark<'_>, out: &mut String) {
        match mark {
            Mark::Link { href } => {
                write!(out, r#"<a href="{}">"#, escape_html(href)).unwrap();
            }
            Mark::Strong => out.push_str("<strong>"),
            Mark::Em => out.push_str("<em>"),
            Mark::Underline => out.push_str("<u>"),
            Mark::StrikeThrough => out.push_str("<s>"),
            Mark::Code => out.push_str("<code>"),
        }
    }

    fn mark_end(mark: Mark<'_>, out: &mut String) {
        out.push_str(match mark {
            Mark::Link { .. } => "</a>",
            Mark::Strong => "</strong>",
            Mark::Em => "</em>",
            Mark::Underline => "</u>",
            Mark::StrikeThrough => "</s>",
            Mark::Code => "</code>",
        });
    }

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_html(text));
    }

    fn image(src: Option<&str>, alt: &str, caption: Option<&str>, out: &mut String) {
        out.push_str("<figure>");
        if let Some(src) = src {
            write!(
                out,
                r#"<img src="{}" alt="{}" loading="lazy">"#,
                escape_html(src),
                escape_html(alt)
            )
            .unwrap();
        }
        if let Some(caption) = caption {
            write!(out, "<figcaption>{}</figcaption>", escape_html(caption)).unwrap();
        }
        out.push_str("</figure>");
    }

    fn code_block(lang: Option<&str>, filename: Option<&str>, content: &str, out: &mut String) {
        match filename {
            Some(name) => write!(out, r#"<pre data-filename="{}">"#, escape_html(name)).unwrap(),
            None => out.push_str("<pre>"),
        }
        match lang {
            Some(lang) => write!(
                out,
                r#"<code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap(),
            None => write!(out, "<code>{}</code></pre>", escape_html(content)).unwrap(),
        }
    }

    fn audio(src: &str, title: Option<&str>, out: &mut String) {
        write!(out, r#"<audio controls preload="none" src="{}""#, escape_html(src)).unwrap();
        if let Some(title) = title {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        out.push_str("></audio>");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_code_block_with_language_and_filename() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), Some("main.rs"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre data-filename="main.rs"><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_plain() {
        let mut out = String::new();
        HtmlBackend::code_block(None, None, "a < b\n  c", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b\n  c</code></pre>");
    }

    #[test]
    fn test_blockquote() {
        let mut out = String::new();
        HtmlBackend::blockquote_start(&mut out);
        out.push_str("content");
        HtmlBackend::blockquote_end(&mut out);
        assert_eq!(out, "<blockquote>content</blockquote>");
    }

    #[test]
    fn test_image_with_caption() {
        let mut out = String::new();
        HtmlBackend::image(Some("https://cdn.example/a.png"), "A map", Some("Arrakis"), &mut out);
        assert_eq!(
            out,
            r#"<figure><img src="https://cdn.example/a.png" alt="A map" loading="lazy"><figcaption>Arrakis</figcaption></figure>"#
        );
    }

    #[test]
    fn test_image_caption_only() {
        let mut out = String::new();
        HtmlBackend::image(None, "", Some("Missing map"), &mut out);
        assert_eq!(out, "<figure><figcaption>Missing map</figcaption></figure>");
    }

    #[test]
    fn test_link_href_escaped() {
        let mut out = String::new();
        let mark = Mark::Link {
            href: "/search?q=a&b=\"c\"",
        };
        HtmlBackend::mark_start(mark, &mut out);
        out.push_str("x");
        HtmlBackend::mark_end(mark, &mut out);
        assert_eq!(out, r#"<a href="/search?q=a&amp;b=&quot;c&quot;">x</a>"#);
    }

    #[test]
    fn test_audio_with_title() {
        let mut out = String::new();
        HtmlBackend::audio("https://cdn.example/1.mp3", Some("Narration"), &mut out);
        assert_eq!(
            out,
            r#"<audio controls preload="none" src="https://cdn.example/1.mp3" title="Narration"></audio>"#
        );
    }

    #[test]
    fn test_heading_levels() {
        let mut out = String::new();
        HtmlBackend::heading_start(3, &mut out);
        HtmlBackend::text("T", &mut out);
        HtmlBackend::heading_end(3, &mut out);
        assert_eq!(out, "<h3>T</h3>");
    }
}
