//! Render backend trait for format-specific rendering.
//!
//! The renderer owns structure (list grouping, mark nesting, fallbacks); the
//! backend owns syntax. Its methods fall into three groups: node types
//! (image, code, audio), block styles and inline marks.

/// A resolved inline mark, ready to be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mark<'a> {
    /// Hyperlink annotation with a vetted target.
    Link {
        /// Link target.
        href: &'a str,
    },
    Strong,
    Em,
    Underline,
    StrikeThrough,
    Code,
}

impl Mark<'_> {
    /// Decorator for a built-in mark name.
    pub fn decorator(name: &str) -> Option<Mark<'static>> {
        match name {
            "strong" => Some(Mark::Strong),
            "em" => Some(Mark::Em),
            "underline" => Some(Mark::Underline),
            "strike-through" => Some(Mark::StrikeThrough),
            "code" => Some(Mark::Code),
            _ => None,
        }
    }
}

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide format-specific rendering for:
/// - Block styles (paragraph, headings, blockquote)
/// - Lists and list items
/// - Inline marks (decorators and link annotations)
/// - Typed nodes (images, code listings, audio)
///
/// Every method writes to `out`. Text handed to [`text`](Self::text) is raw;
/// the backend escapes it.
pub trait RenderBackend {
    /// Render paragraph start tag.
    fn paragraph_start(out: &mut String);

    /// Render paragraph end tag.
    fn paragraph_end(out: &mut String);

    /// Render heading start tag. `level` is 1 to 6.
    fn heading_start(level: u8, out: &mut String);

    /// Render heading end tag.
    fn heading_end(level: u8, out: &mut String);

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String);

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String);

    /// Render list start tag.
    fn list_start(ordered: bool, out: &mut String);

    /// Render list end tag.
    fn list_end(ordered: bool, out: &mut String);

    /// Render list item start tag.
    fn list_item_start(out: &mut String);

    /// Render list item end tag.
    fn list_item_end(out: &mut String);

    /// Render the opening half of a mark.
    fn mark_start(mark: Mark<'_>, out: &mut String);

    /// Render the closing half of a mark.
    fn mark_end(mark: Mark<'_>, out: &mut String);

    /// Render a run of text.
    fn text(text: &str, out: &mut String);

    /// Render a line break inside a block.
    ///
    /// Default uses `<br>`.
    fn line_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render an image.
    ///
    /// # Arguments
    ///
    /// * `src` - Resolved image URL, if any
    /// * `alt` - Alt text for the image
    /// * `caption` - Optional caption
    /// * `out` - Output buffer to write to
    ///
    /// Called only when `src` or `caption` is present.
    fn image(src: Option<&str>, alt: &str, caption: Option<&str>, out: &mut String);

    /// Render a code listing.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `filename` - Optional file name shown with the listing
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, filename: Option<&str>, content: &str, out: &mut String);

    /// Render an audio player for `src`.
    fn audio(src: &str, title: Option<&str>, out: &mut String);
}
