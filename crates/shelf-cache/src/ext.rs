//! Extension trait for [`CacheBucket`] with typed convenience methods.

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Implemented as default methods on an extension trait so that
/// [`CacheBucket`] stays object-safe and implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use shelf_cache::{Cache, CacheBucketExt, MemoryCache};
///
/// let cache = MemoryCache::new();
/// let bucket = cache.bucket("home");
///
/// bucket.set_string("/", "v1", "<html></html>");
/// assert_eq!(bucket.get_string("/", "v1").as_deref(), Some("<html></html>"));
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on cache miss, etag mismatch, or invalid UTF-8.
    fn get_string(&self, key: &str, etag: &str) -> Option<String> {
        let bytes = self.get(key, etag)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value in the cache.
    fn set_string(&self, key: &str, etag: &str, value: &str) {
        self.set(key, etag, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cache, MemoryCache, NullCache};

    #[test]
    fn test_string_round_trip() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("books");
        bucket.set_string("dune", "v1", "Dune");
        assert_eq!(bucket.get_string("dune", "v1").as_deref(), Some("Dune"));
    }

    #[test]
    fn test_invalid_utf8_is_miss() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("books");
        bucket.set("bad", "v1", &[0xff, 0xfe]);
        assert_eq!(bucket.get_string("bad", "v1"), None);
    }

    #[test]
    fn test_null_cache_string_miss() {
        let bucket = NullCache.bucket("home");
        bucket.set_string("/", "v1", "page");
        assert_eq!(bucket.get_string("/", "v1"), None);
    }
}
