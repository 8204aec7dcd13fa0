//! Book detail page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::error::ServerError;
use crate::handlers::{cached_page, html_response};
use crate::pages;
use crate::state::{AppState, PageBucket};

/// Handle GET /books/{book_slug}.
pub(crate) async fn get_book(
    Path(book_slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let href = pages::book_href(&book_slug);

    let html = cached_page(Arc::clone(&state), PageBucket::Books, href.clone(), move |state| {
        let Some(book) = state.library.fetch_book(&book_slug)? else {
            return Ok(None);
        };
        let images = state.library.image_resolver();
        Ok(Some(
            pages::book::render(&state.site, images.as_ref(), &book).into_string(),
        ))
    })
    .await?
    .ok_or(ServerError::NotFound(href))?;

    Ok(html_response(&state.version, &headers, html))
}
