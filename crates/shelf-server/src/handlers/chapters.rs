//! Chapter reader page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use shelf_renderer::{HtmlBackend, PortableTextRenderer};

use crate::error::ServerError;
use crate::handlers::{cached_page, html_response};
use crate::pages;
use crate::state::{AppState, PageBucket};

/// Handle GET /books/{book_slug}/chapters/{chapter_slug}.
pub(crate) async fn get_chapter(
    Path((book_slug, chapter_slug)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let href = pages::chapter_href(&book_slug, &chapter_slug);

    let html = cached_page(Arc::clone(&state), PageBucket::Chapters, href.clone(), move |state| {
        let Some(page) = state.library.fetch_chapter_page(&book_slug, &chapter_slug)? else {
            return Ok(None);
        };

        let renderer = PortableTextRenderer::<HtmlBackend>::new()
            .with_image_resolver(state.library.image_resolver());
        let content = renderer.render(&page.chapter.content);

        for warning in &content.warnings {
            if state.verbose {
                tracing::warn!(%book_slug, %chapter_slug, %warning, "Chapter render warning");
            } else {
                tracing::debug!(%book_slug, %chapter_slug, %warning, "Chapter render warning");
            }
        }

        Ok(Some(
            pages::chapter::render(&state.site, &page, &content.html).into_string(),
        ))
    })
    .await?
    .ok_or(ServerError::NotFound(href))?;

    Ok(html_response(&state.version, &headers, html))
}
