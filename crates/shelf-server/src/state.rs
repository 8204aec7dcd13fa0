//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shelf_cache::{Cache, CacheBucket};
use shelf_site::Library;

use crate::SiteSettings;

/// Cache bucket for the book list page.
pub(crate) const HOME_BUCKET: &str = "home";
/// Cache bucket for book pages.
pub(crate) const BOOKS_BUCKET: &str = "books";
/// Cache bucket for chapter pages.
pub(crate) const CHAPTERS_BUCKET: &str = "chapters";

/// Page cache bucket selector.
#[derive(Clone, Copy, Debug)]
pub(crate) enum PageBucket {
    Home,
    Books,
    Chapters,
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document fetchers.
    pub(crate) library: Arc<Library>,
    /// Rendered book list page.
    pub(crate) home: Box<dyn CacheBucket>,
    /// Rendered book pages, keyed by page URL.
    pub(crate) books: Box<dyn CacheBucket>,
    /// Rendered chapter pages, keyed by page URL.
    pub(crate) chapters: Box<dyn CacheBucket>,
    /// Presentation settings for page templates.
    pub(crate) site: SiteSettings,
    /// Secret for the cache invalidation endpoint.
    pub(crate) revalidate_token: Option<String>,
    /// Enable verbose output (show render warnings).
    pub(crate) verbose: bool,
    /// Application version for cache validation and `ETag`s.
    pub(crate) version: String,
    /// Bumped by every cache clear. Part of the cache etag, so a page
    /// rendered from content fetched before a clear is never served after it.
    generation: AtomicU64,
}

impl AppState {
    pub(crate) fn new(
        library: Arc<Library>,
        cache: &dyn Cache,
        site: SiteSettings,
        revalidate_token: Option<String>,
        verbose: bool,
        version: String,
    ) -> Self {
        Self {
            library,
            home: cache.bucket(HOME_BUCKET),
            books: cache.bucket(BOOKS_BUCKET),
            chapters: cache.bucket(CHAPTERS_BUCKET),
            site,
            revalidate_token: revalidate_token.filter(|token| !token.is_empty()),
            verbose,
            version,
            generation: AtomicU64::new(0),
        }
    }

    pub(crate) fn bucket(&self, which: PageBucket) -> &dyn CacheBucket {
        match which {
            PageBucket::Home => self.home.as_ref(),
            PageBucket::Books => self.books.as_ref(),
            PageBucket::Chapters => self.chapters.as_ref(),
        }
    }

    /// Current cache generation.
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cache etag for pages rendered during `generation`.
    pub(crate) fn cache_etag(&self, generation: u64) -> String {
        format!("{}:{generation}", self.version)
    }

    /// Drop every rendered page. Returns the number of entries removed.
    ///
    /// Renders already in flight keep the old generation, so whatever they
    /// store afterwards is ignored.
    pub(crate) fn clear_pages(&self) -> usize {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.home.clear() + self.books.clear() + self.chapters.clear()
    }
}
