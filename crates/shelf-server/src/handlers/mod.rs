//! HTTP request handlers.
//!
//! Page handlers share one pipeline: look the page up in its cache bucket,
//! otherwise fetch and render it on the blocking pool, then answer with an
//! `ETag` so repeat visits can be served with `304 Not Modified`.

pub(crate) mod books;
pub(crate) mod chapters;
pub(crate) mod health;
pub(crate) mod home;
pub(crate) mod revalidate;

use std::sync::Arc;

use axum::extract::OriginalUri;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use md5::{Digest, Md5};
use shelf_cache::CacheBucketExt;
use shelf_site::SiteError;

use crate::error::ServerError;
use crate::state::{AppState, PageBucket};

/// Browser caching policy for rendered pages.
const PAGE_CACHE_CONTROL: &str = "public, max-age=60";

/// Serve a page from `bucket`, rendering it with `render` on a miss.
///
/// `render` runs on the blocking pool since store queries are synchronous.
/// It returns `Ok(None)` when the page does not exist; such results are not
/// cached.
pub(crate) async fn cached_page<F>(
    state: Arc<AppState>,
    bucket: PageBucket,
    key: String,
    render: F,
) -> Result<Option<String>, ServerError>
where
    F: FnOnce(&AppState) -> Result<Option<String>, SiteError> + Send + 'static,
{
    let html = tokio::task::spawn_blocking(move || -> Result<Option<String>, SiteError> {
        let cache = state.bucket(bucket);
        let generation = state.generation();
        let etag = state.cache_etag(generation);
        if let Some(html) = cache.get_string(&key, &etag) {
            tracing::debug!(?bucket, key = %key, "Page cache hit");
            return Ok(Some(html));
        }

        let html = render(&state)?;
        if let Some(html) = &html {
            if state.generation() == generation {
                cache.set_string(&key, &etag, html);
            } else {
                tracing::debug!(?bucket, key = %key, "Cache cleared during render, not storing");
            }
        }
        Ok(html)
    })
    .await??;

    Ok(html)
}

/// Build an HTML response, or `304` if the client already has this version.
pub(crate) fn html_response(version: &str, headers: &HeaderMap, html: String) -> Response {
    let etag = compute_etag(version, &html);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, PAGE_CACHE_CONTROL.to_owned()),
        ],
        Html(html),
    )
        .into_response()
}

/// Fallback for unmatched routes.
pub(crate) async fn not_found(OriginalUri(uri): OriginalUri) -> ServerError {
    ServerError::NotFound(uri.path().to_owned())
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        assert_ne!(compute_etag("1.0.0", "content"), compute_etag("1.0.1", "content"));
    }

    #[test]
    fn test_compute_etag_includes_content() {
        assert_ne!(compute_etag("1.0.0", "content1"), compute_etag("1.0.0", "content2"));
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        // 16 hex chars + 2 quotes
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_html_response_headers() {
        let response = html_response("1.0.0", &HeaderMap::new(), "<p>hi</p>".to_owned());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ETAG].to_str().unwrap(),
            compute_etag("1.0.0", "<p>hi</p>")
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], PAGE_CACHE_CONTROL);
    }

    #[test]
    fn test_html_response_not_modified() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_str(&compute_etag("1.0.0", "<p>hi</p>")).unwrap(),
        );

        let response = html_response("1.0.0", &headers, "<p>hi</p>".to_owned());
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

        let response = html_response("1.0.1", &headers, "<p>hi</p>".to_owned());
        assert_eq!(response.status(), StatusCode::OK);
    }
}
