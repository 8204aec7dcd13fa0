//! Portable Text renderer with pluggable backends.
//!
//! This crate provides a generic [`PortableTextRenderer`] that turns a
//! Portable Text document (an ordered list of [`ContentNode`]s) into markup
//! using the [`RenderBackend`] trait.
//!
//! # Architecture
//!
//! The renderer walks the node tree and handles the structural work shared by
//! every output format: grouping list items into nested lists, resolving span
//! marks against their annotation definitions and falling back for node kinds,
//! styles and marks it does not know. The backend decides how each element is
//! written:
//! - [`HtmlBackend`]: Produces semantic HTML5
//!
//! Image assets are turned into URLs by an [`ImageUrlResolver`] supplied by
//! the caller, so the renderer itself performs no I/O.
//!
//! Rendering never fails. Anything that cannot be rendered is skipped or
//! degraded and reported in [`RenderResult::warnings`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shelf_renderer::{ContentNode, HtmlBackend, PortableTextRenderer};
//!
//! let nodes: Vec<ContentNode> = serde_json::from_value(json!([{
//!     "_type": "block",
//!     "style": "h2",
//!     "children": [{"_type": "span", "text": "Hello", "marks": ["strong"]}]
//! }]))
//! .unwrap();
//!
//! let result = PortableTextRenderer::<HtmlBackend>::new().render(&nodes);
//! assert_eq!(result.html, "<h2><strong>Hello</strong></h2>");
//! ```

mod backend;
mod html;
mod image;
mod model;
mod renderer;
mod util;

pub use backend::{Mark, RenderBackend};
pub use html::HtmlBackend;
pub use image::{DirectUrlResolver, ImageUrlResolver};
pub use model::{
    AudioNode, Block, BlockStyle, CodeNode, ContentNode, ImageNode, ImageSource, Inline,
    ListKind, MarkDef, Span,
};
pub use renderer::{PortableTextRenderer, RenderResult};
pub use util::{escape_html, is_safe_href};
