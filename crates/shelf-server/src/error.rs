//! Error types for the HTTP server.
//!
//! Errors are rendered as HTML error pages, since every failing route is a
//! reader-facing page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use shelf_site::SiteError;
use tokio::task::JoinError;

use crate::pages;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No book, chapter or route at the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Fetching content failed.
    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    /// The blocking fetch task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound(path) => {
                tracing::debug!(path = %path, "Not found");
                (
                    StatusCode::NOT_FOUND,
                    "Page Not Found",
                    "The book or chapter you are looking for does not exist.",
                )
            }
            Self::Site(err) => {
                tracing::error!(error = %err, "Failed to load page content");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something Went Wrong",
                    "The library is temporarily unavailable. Please try again later.",
                )
            }
            Self::Task(err) => {
                tracing::error!(error = %err, "Page task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something Went Wrong",
                    "An internal error occurred. Please try again later.",
                )
            }
        };

        let markup = pages::error::render(status, title, message);
        (status, Html(markup.into_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use shelf_store::StoreError;

    use super::*;

    #[test]
    fn test_not_found_response() {
        let response = ServerError::NotFound("/books/missing".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_site_error_response() {
        let err = ServerError::Site(SiteError::Store(StoreError::Http {
            status: 500,
            body: "boom".to_owned(),
        }));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display() {
        let err = ServerError::NotFound("/x".to_owned());
        assert_eq!(err.to_string(), "Not found: /x");
    }
}
