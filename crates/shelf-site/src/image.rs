//! Sanity image CDN URLs.

use shelf_renderer::{ImageSource, ImageUrlResolver};

/// Image CDN host.
const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Resolves Sanity image asset references to CDN URLs.
///
/// Asset ids have the form `image-<assetId>-<width>x<height>-<format>` and map
/// to `https://cdn.sanity.io/images/<project>/<dataset>/<assetId>-<width>x<height>.<format>`.
/// An already resolved `url` wins over the reference.
#[derive(Clone, Debug)]
pub struct SanityImageResolver {
    project_id: String,
    dataset: String,
}

impl SanityImageResolver {
    /// Create a resolver for one project and dataset.
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    fn url_for_reference(&self, reference: &str) -> Option<String> {
        let rest = reference.strip_prefix("image-")?;
        let (rest, format) = rest.rsplit_once('-')?;
        let (asset_id, dimensions) = rest.rsplit_once('-')?;

        let valid_dimensions = dimensions.split_once('x').is_some_and(|(w, h)| {
            !w.is_empty()
                && !h.is_empty()
                && w.bytes().all(|b| b.is_ascii_digit())
                && h.bytes().all(|b| b.is_ascii_digit())
        });
        let valid_id = !asset_id.is_empty() && asset_id.bytes().all(|b| b.is_ascii_alphanumeric());
        let valid_format = !format.is_empty() && format.bytes().all(|b| b.is_ascii_alphanumeric());
        if !(valid_dimensions && valid_id && valid_format) {
            return None;
        }

        Some(format!(
            "{CDN_BASE}/{}/{}/{asset_id}-{dimensions}.{format}?auto=format&fit=max",
            self.project_id, self.dataset
        ))
    }
}

impl ImageUrlResolver for SanityImageResolver {
    fn resolve(&self, source: &ImageSource) -> Option<String> {
        if let Some(url) = source.url.as_deref().filter(|url| !url.is_empty()) {
            return Some(url.to_owned());
        }
        self.url_for_reference(source.reference.as_deref()?)
    }
}
