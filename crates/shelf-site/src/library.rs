//! Document fetchers.
//!
//! [`Library`] turns page requests into content store queries and decodes the
//! results. Missing documents are `Ok(None)`; only transport, query and decode
//! failures are errors.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shelf_renderer::{DirectUrlResolver, ImageSource, ImageUrlResolver};
use shelf_store::{ContentStore, QueryParams};

use crate::error::SiteError;
use crate::models::{Book, BookRecord, BookSummary, ChapterPage, ChapterPageRecord};
use crate::navigation::ChapterNavigation;
use crate::queries;

/// Id prefix of unpublished documents.
const DRAFT_PREFIX: &str = "drafts.";

/// Read access to books and chapters.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct Library {
    store: Arc<dyn ContentStore>,
    images: Arc<dyn ImageUrlResolver>,
}

impl Library {
    /// Create a library over `store` that only displays already resolved
    /// image URLs.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            images: Arc::new(DirectUrlResolver),
        }
    }

    /// Use `resolver` for cover, author and content images.
    #[must_use]
    pub fn with_image_resolver(mut self, resolver: Arc<dyn ImageUrlResolver>) -> Self {
        self.images = resolver;
        self
    }

    /// The image resolver, for handing to the content renderer.
    pub fn image_resolver(&self) -> Arc<dyn ImageUrlResolver> {
        Arc::clone(&self.images)
    }

    /// Resolve an optional image to a URL.
    pub fn image_url(&self, source: Option<&ImageSource>) -> Option<String> {
        self.images.resolve(source?)
    }

    /// Fetch all published books, newest first.
    pub fn fetch_book_list(&self) -> Result<Vec<BookSummary>, SiteError> {
        let result = self
            .store
            .query(queries::BOOK_LIST, &QueryParams::new())
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch book list"))?;

        let books: Option<Vec<BookSummary>> = decode(result, "book list")
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode book list"))?;
        Ok(books
            .unwrap_or_default()
            .into_iter()
            .filter(|book| !book.id.starts_with(DRAFT_PREFIX))
            .collect())
    }

    /// Fetch a published book with its ordered chapter list.
    pub fn fetch_book(&self, book_slug: &str) -> Result<Option<Book>, SiteError> {
        if book_slug.is_empty() {
            return Ok(None);
        }

        let params = QueryParams::new().with("bookSlug", book_slug);
        let result = self
            .store
            .query(queries::BOOK, &params)
            .inspect_err(|e| tracing::error!(book_slug, error = %e, "Failed to fetch book"))?;

        let record: Option<BookRecord> = decode(result, "book")
            .inspect_err(|e| tracing::error!(book_slug, error = %e, "Failed to decode book"))?;
        Ok(record.map(BookRecord::into_book))
    }

    /// Fetch everything the chapter reader shows, in one query.
    ///
    /// The chapter is the one with `chapter_slug` that belongs to the book
    /// with `book_slug`; a chapter of the same slug in another book is not a
    /// match.
    pub fn fetch_chapter_page(
        &self,
        book_slug: &str,
        chapter_slug: &str,
    ) -> Result<Option<ChapterPage>, SiteError> {
        if book_slug.is_empty() || chapter_slug.is_empty() {
            return Ok(None);
        }

        let params = QueryParams::new()
            .with("bookSlug", book_slug)
            .with("chapterSlug", chapter_slug);
        let result = self
            .store
            .query(queries::CHAPTER_PAGE, &params)
            .inspect_err(|e| {
                tracing::error!(book_slug, chapter_slug, error = %e, "Failed to fetch chapter");
            })?;

        let record: Option<ChapterPageRecord> = decode(result, "chapter page")
            .inspect_err(|e| {
                tracing::error!(book_slug, chapter_slug, error = %e, "Failed to decode chapter");
            })?;
        let Some(ChapterPageRecord {
            book: Some(book),
            candidates,
        }) = record
        else {
            return Ok(None);
        };

        let book = book.into_book();
        let Some((chapter, navigation)) = candidates.into_iter().find_map(|chapter| {
            ChapterNavigation::locate(&book.chapters, &chapter.id).map(|nav| (chapter, nav))
        }) else {
            tracing::debug!(book_slug, chapter_slug, "Chapter not found in book");
            return Ok(None);
        };

        Ok(Some(ChapterPage {
            book,
            chapter,
            navigation,
        }))
    }
}

/// Decode a query result; `null` decodes to `None`.
fn decode<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<Option<T>, SiteError> {
    serde_json::from_value(value).map_err(|source| SiteError::Decode { what, source })
}
