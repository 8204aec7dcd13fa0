//! In-memory cache implementation.
//!
//! [`MemoryCache`] keeps rendered pages in process memory, grouped into named
//! buckets. Entries live until their bucket is cleared or the process exits;
//! there is no size bound or time-based expiry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Cache, CacheBucket};

/// Entries of a single bucket: key -> (etag, value).
type Entries = Arc<RwLock<HashMap<String, (String, Vec<u8>)>>>;

/// Process-local [`Cache`] shared across requests.
///
/// Cloning is cheap; clones share the same buckets.
#[derive(Clone, Default)]
pub struct MemoryCache {
    buckets: Arc<RwLock<HashMap<String, Entries>>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, name: &str) -> Entries {
        if let Some(entries) = self
            .buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(entries);
        }

        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(buckets.entry(name.to_owned()).or_default())
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            entries: self.entries(name),
        })
    }
}

/// Handle to one bucket of a [`MemoryCache`].
struct MemoryCacheBucket {
    name: String,
    entries: Entries,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let (stored_etag, value) = entries.get(key)?;
        if !etag.is_empty() && stored_etag != etag {
            return None;
        }
        Some(value.clone())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), (etag.to_owned(), value.to_vec()));
    }

    fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let removed = entries.len();
        entries.clear();
        tracing::debug!(bucket = %self.name, removed, "Cleared cache bucket");
        removed
    }
}
