//! Book list page.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

use crate::error::ServerError;
use crate::handlers::{cached_page, html_response};
use crate::pages;
use crate::state::{AppState, PageBucket};

/// Handle GET /.
pub(crate) async fn get_home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let html = cached_page(Arc::clone(&state), PageBucket::Home, "/".to_owned(), |state| {
        let books = state.library.fetch_book_list()?;
        let images = state.library.image_resolver();
        Ok(Some(
            pages::home::render(&state.site, images.as_ref(), &books).into_string(),
        ))
    })
    .await?
    .ok_or_else(|| ServerError::NotFound("/".to_owned()))?;

    Ok(html_response(&state.version, &headers, html))
}
