//! Page cache abstraction layer for Shelf.
//!
//! This crate provides generic caching traits that decouple the HTTP server
//! from the storage mechanism used for rendered pages. Two traits form the
//! core API:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with etag-based validation and
//!   whole-bucket invalidation
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: Process-local implementation shared across requests
//!
//! # Example
//!
//! ```
//! use shelf_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! let bucket = cache.bucket("books");
//! bucket.set("dune", "v1", b"<html>Dune</html>");
//! assert_eq!(bucket.get("dune", "v1"), Some(b"<html>Dune</html>".to_vec()));
//!
//! bucket.clear();
//! assert_eq!(bucket.get("dune", "v1"), None);
//! ```

mod ext;
mod memory;

pub use ext::CacheBucketExt;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// Each bucket stores key-value pairs where values are validated by an etag.
/// The etag is an opaque string chosen by the caller (e.g., an application
/// version). A cache hit occurs only when both the key and etag match.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `Some(value)` if the key exists **and** was stored with the same
    /// `etag`. Returns `None` on cache miss or etag mismatch.
    ///
    /// If `etag` is an empty string, etag validation is skipped and the cached
    /// data is returned regardless of the stored etag.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key, regardless of the
    /// previous etag.
    fn set(&self, key: &str, etag: &str, value: &[u8]);

    /// Drop every entry in this bucket.
    ///
    /// Returns the number of entries removed.
    fn clear(&self) -> usize;
}

/// Factory for named cache [`CacheBucket`]s.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// Handles to the same bucket name share their entries, so clearing one handle
/// is visible through every other handle.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// * `name` - Bucket name (e.g., "home", "books", "chapters")
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded.
/// Used as the bucket type for [`NullCache`].
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}

    fn clear(&self) -> usize {
        0
    }
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled. All operations are no-ops and all lookups
/// return `None`.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}
