//! Shared page layout.

use chrono::{Datelike, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::SiteSettings;

/// Inline CSS for all pages.
pub(crate) const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#000;--fg:#fff;--fg2:#d4d4d8;--fg3:#71717a;--accent:#60a5fa;--accent-hover:#93c5fd;--surface:#18181b;--border:#27272a;--mono:ui-monospace,SFMono-Regular,Menlo,monospace}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column}
header.site{padding:1rem;border-bottom:1px solid var(--border)}
header.site a{color:var(--fg);font-weight:700}
main{flex:1;width:100%;max-width:1200px;margin:0 auto;padding:3rem 1rem}
a{color:var(--accent);text-decoration:none}
a:hover{color:var(--accent-hover)}
img{max-width:100%;height:auto}

.library-title{font-size:3.5rem;font-weight:700;text-align:center;margin-bottom:3rem}
.book-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:2rem}
.book-card{position:relative;display:block;aspect-ratio:3/4;overflow:hidden;border-radius:8px;background:var(--surface);color:var(--fg)}
.book-card img{position:absolute;inset:0;width:100%;height:100%;object-fit:cover}
.book-card-text{position:absolute;bottom:0;width:100%;padding:1.5rem;background:linear-gradient(to top,#000,rgba(0,0,0,.4),transparent)}
.book-card-text h2{font-size:1.5rem}
.book-card-text p{font-size:.9rem;color:var(--fg2)}
.empty{text-align:center;color:var(--fg3)}

.book{display:grid;grid-template-columns:repeat(auto-fit,minmax(300px,1fr));gap:3rem}
.book-cover{aspect-ratio:3/4;overflow:hidden;border-radius:8px;background:var(--surface)}
.book-cover img{width:100%;height:100%;object-fit:cover}
.book h1{font-size:2.5rem;margin-bottom:.5rem}
.byline{color:var(--fg3);margin-bottom:1.5rem}
.description{color:var(--fg2);margin-bottom:2rem}
.chapters h2{font-size:1.5rem;margin-bottom:1rem}
.chapters ol{list-style:none}
.chapters li a{display:block;padding:.75rem 1rem;border-radius:6px;background:var(--surface);margin-bottom:.5rem;color:var(--fg)}

.reader{max-width:65ch;margin:0 auto}
.reader header{margin-bottom:2rem}
.reader h1{font-size:2.5rem;margin-bottom:.5rem}
.back{display:inline-block;margin-bottom:2rem}
.player{margin-bottom:2rem}
.player audio{width:100%}
.content{font-size:1.125rem;line-height:1.8;color:var(--fg2)}
.content p,.content ul,.content ol,.content blockquote,.content figure,.content pre{margin-bottom:1rem}
.content h1,.content h2,.content h3,.content h4,.content h5,.content h6{color:var(--fg);margin:2rem 0 1rem}
.content ul,.content ol{padding-left:1.5rem}
.content blockquote{border-left:3px solid var(--border);padding-left:1rem;font-style:italic}
.content pre{background:var(--surface);border-radius:6px;padding:1rem;overflow-x:auto;font-size:.9rem}
.content code{font-family:var(--mono)}
.content figcaption{font-size:.875rem;color:var(--fg3);text-align:center}
.chapter-nav{display:flex;justify-content:space-between;align-items:center;gap:1rem;margin-top:3rem;padding-top:1.5rem;border-top:1px solid var(--border)}
.chapter-nav .position{color:var(--fg3);font-size:.875rem}

footer.site{padding:1rem;border-top:1px solid var(--border);display:flex;justify-content:space-between;color:var(--fg3);font-size:.875rem}
footer.site a{color:var(--fg3);opacity:.3}
footer.site a:hover{opacity:1}

.error-page{text-align:center;padding-top:4rem}
.error-page h1{font-size:2rem;margin-bottom:1rem}
.error-page p{color:var(--fg2);margin-bottom:2rem}
"#;

/// Wrap `body` in the site chrome.
pub(crate) fn page(site: &SiteSettings, title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                header class="site" {
                    a href="/" { (site.title) }
                }
                main { (body) }
                (footer(site))
            }
        }
    }
}

fn footer(site: &SiteSettings) -> Markup {
    html! {
        footer class="site" {
            div { "© " (Utc::now().year()) " " (site.footer_name) }
            @if let Some(studio) = &site.studio_url {
                a href=(studio) aria-label="Content Management System" { "Studio" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(studio_url: Option<&str>) -> SiteSettings {
        SiteSettings {
            title: "Your Library".to_owned(),
            footer_name: "Book Platform".to_owned(),
            studio_url: studio_url.map(str::to_owned),
        }
    }

    #[test]
    fn test_footer_copyright_line() {
        let html = page(&settings(None), "Home", html! { p { "body" } }).into_string();
        let expected = format!("© {} Book Platform", Utc::now().year());
        assert!(html.contains(&expected));
        assert!(!html.contains("Studio"));
    }

    #[test]
    fn test_studio_link() {
        let html = page(&settings(Some("https://studio.example")), "Home", html! {}).into_string();
        assert!(html.contains(r#"href="https://studio.example""#));
    }

    #[test]
    fn test_title_escaped() {
        let html = page(&settings(None), "<script>", html! {}).into_string();
        assert!(html.contains("<title>&lt;script&gt;</title>"));
    }
}
