//! Image asset URL resolution.

use crate::model::ImageSource;

/// Turns an image asset reference into a displayable URL.
///
/// Implementations must tolerate absent or malformed references and return
/// `None` rather than failing.
pub trait ImageUrlResolver: Send + Sync {
    /// Resolve `source` to a URL.
    fn resolve(&self, source: &ImageSource) -> Option<String>;
}

/// Resolver that only accepts already resolved URLs.
///
/// Used when no asset CDN is configured.
pub struct DirectUrlResolver;

impl ImageUrlResolver for DirectUrlResolver {
    fn resolve(&self, source: &ImageSource) -> Option<String> {
        source.url.clone().filter(|url| !url.is_empty())
    }
}
