//! Fetcher error type.

use shelf_store::StoreError;

/// Error from document fetchers.
///
/// Missing documents are not errors; fetchers report them as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The content store could not answer the query.
    #[error("content store query failed: {0}")]
    Store(#[from] StoreError),

    /// The query result did not have the expected shape.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}
