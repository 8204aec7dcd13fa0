//! Generic Portable Text renderer with pluggable backend.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::backend::{Mark, RenderBackend};
use crate::image::{DirectUrlResolver, ImageUrlResolver};
use crate::model::{
    AudioNode, Block, BlockStyle, CodeNode, ContentNode, ImageNode, Inline, ListKind, MarkDef,
    Span,
};
use crate::util::is_safe_href;

/// Result of rendering a document.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered markup.
    pub html: String,
    /// Fallbacks taken during rendering (unknown nodes, styles, marks, ...).
    pub warnings: Vec<String>,
}

/// Generic Portable Text renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling document structure generically. Rendering is pure: the same
/// nodes always produce the same result.
pub struct PortableTextRenderer<B: RenderBackend> {
    resolver: Arc<dyn ImageUrlResolver>,
    _backend: PhantomData<B>,
}

/// An open list at one nesting level.
#[derive(Clone, Copy)]
struct ListFrame {
    ordered: bool,
    level: u32,
}

/// Mutable state of one render call.
struct RenderState {
    output: String,
    warnings: Vec<String>,
    /// Open lists, outermost first. Every open list has an open item.
    list_stack: Vec<ListFrame>,
}

impl<B: RenderBackend> PortableTextRenderer<B> {
    /// Create a renderer that only displays images with resolved URLs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(DirectUrlResolver),
            _backend: PhantomData,
        }
    }

    /// Use `resolver` to turn image asset references into URLs.
    #[must_use]
    pub fn with_image_resolver(mut self, resolver: Arc<dyn ImageUrlResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Render `nodes` in order.
    pub fn render(&self, nodes: &[ContentNode]) -> RenderResult {
        let mut state = RenderState {
            output: String::with_capacity(4096),
            warnings: Vec::new(),
            list_stack: Vec::new(),
        };

        for node in nodes {
            match node {
                ContentNode::Block(block) if block.list_item.is_some() => {
                    Self::list_item(block, &mut state);
                }
                ContentNode::Block(block) => {
                    Self::close_lists(&mut state);
                    Self::block(block, &mut state);
                }
                ContentNode::Image(image) => {
                    Self::close_lists(&mut state);
                    self.image(image, &mut state);
                }
                ContentNode::Code(code) => {
                    Self::close_lists(&mut state);
                    Self::code(code, &mut state);
                }
                ContentNode::Audio(audio) => {
                    Self::close_lists(&mut state);
                    Self::audio(audio, &mut state);
                }
                ContentNode::Unknown { kind } => {
                    Self::close_lists(&mut state);
                    state
                        .warnings
                        .push(format!("skipped content node of unknown type '{kind}'"));
                }
            }
        }
        Self::close_lists(&mut state);

        RenderResult {
            html: state.output,
            warnings: state.warnings,
        }
    }

    fn block(block: &Block, state: &mut RenderState) {
        match &block.style {
            BlockStyle::Normal => {
                B::paragraph_start(&mut state.output);
                Self::children(block, state);
                B::paragraph_end(&mut state.output);
            }
            BlockStyle::Heading(level) => {
                B::heading_start(*level, &mut state.output);
                Self::children(block, state);
                B::heading_end(*level, &mut state.output);
            }
            BlockStyle::Blockquote => {
                B::blockquote_start(&mut state.output);
                Self::children(block, state);
                B::blockquote_end(&mut state.output);
            }
            BlockStyle::Other(style) => {
                state
                    .warnings
                    .push(format!("unknown block style '{style}' rendered as paragraph"));
                B::paragraph_start(&mut state.output);
                Self::children(block, state);
                B::paragraph_end(&mut state.output);
            }
        }
    }

    /// Render a list item, opening and closing lists so that consecutive
    /// items share a list and deeper levels nest inside the previous item.
    fn list_item(block: &Block, state: &mut RenderState) {
        let ordered = match &block.list_item {
            Some(ListKind::Number) => true,
            Some(ListKind::Bullet) | None => false,
            Some(ListKind::Other(kind)) => {
                state
                    .warnings
                    .push(format!("unknown list kind '{kind}' rendered as bullet list"));
                false
            }
        };
        let level = block.list_level();

        while let Some(top) = state.list_stack.last().copied() {
            if top.level > level || (top.level == level && top.ordered != ordered) {
                B::list_item_end(&mut state.output);
                B::list_end(top.ordered, &mut state.output);
                state.list_stack.pop();
            } else {
                break;
            }
        }

        match state.list_stack.last() {
            Some(top) if top.level == level => B::list_item_end(&mut state.output),
            _ => {
                B::list_start(ordered, &mut state.output);
                state.list_stack.push(ListFrame { ordered, level });
            }
        }

        B::list_item_start(&mut state.output);
        Self::children(block, state);
    }

    fn close_lists(state: &mut RenderState) {
        while let Some(frame) = state.list_stack.pop() {
            B::list_item_end(&mut state.output);
            B::list_end(frame.ordered, &mut state.output);
        }
    }

    fn children(block: &Block, state: &mut RenderState) {
        for child in &block.children {
            match child {
                Inline::Span(span) => Self::span(span, &block.mark_defs, state),
                Inline::Unknown { kind, text } => {
                    state
                        .warnings
                        .push(format!("unknown inline object '{kind}'"));
                    if let Some(text) = text {
                        Self::text(text, &mut state.output);
                    }
                }
            }
        }
    }

    fn span(span: &Span, mark_defs: &[MarkDef], state: &mut RenderState) {
        let mut marks: Vec<Mark<'_>> = Vec::with_capacity(span.marks.len());
        for name in &span.marks {
            if let Some(mark) = Mark::decorator(name) {
                marks.push(mark);
                continue;
            }
            match mark_defs.iter().find(|def| def.key == *name) {
                Some(def) => match (def.kind.as_str(), def.href.as_deref()) {
                    ("link", Some(href)) if is_safe_href(href) => {
                        marks.push(Mark::Link { href });
                    }
                    ("link", _) => state
                        .warnings
                        .push(format!("dropped link with unsupported target in '{name}'")),
                    (kind, _) => state
                        .warnings
                        .push(format!("unknown annotation '{kind}' rendered as plain text")),
                },
                None => state
                    .warnings
                    .push(format!("unknown mark '{name}' rendered as plain text")),
            }
        }
        marks.sort();
        marks.dedup();

        for mark in &marks {
            B::mark_start(*mark, &mut state.output);
        }
        Self::text(&span.text, &mut state.output);
        for mark in marks.iter().rev() {
            B::mark_end(*mark, &mut state.output);
        }
    }

    fn text(text: &str, out: &mut String) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                B::line_break(out);
            }
            B::text(line, out);
        }
    }

    fn image(&self, image: &ImageNode, state: &mut RenderState) {
        let src = image
            .asset
            .as_ref()
            .and_then(|asset| self.resolver.resolve(asset));
        let caption = image.caption.as_deref().filter(|c| !c.is_empty());

        if src.is_none() {
            state
                .warnings
                .push("image asset could not be resolved".to_owned());
            if caption.is_none() {
                return;
            }
        }
        B::image(
            src.as_deref(),
            image.alt.as_deref().unwrap_or_default(),
            caption,
            &mut state.output,
        );
    }

    fn code(code: &CodeNode, state: &mut RenderState) {
        B::code_block(
            code.language.as_deref().filter(|l| !l.is_empty()),
            code.filename.as_deref().filter(|f| !f.is_empty()),
            &code.code,
            &mut state.output,
        );
    }

    fn audio(audio: &AudioNode, state: &mut RenderState) {
        match audio.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => B::audio(url, audio.title.as_deref(), &mut state.output),
            None => state.warnings.push("audio without a source URL".to_owned()),
        }
    }
}

impl<B: RenderBackend> Default for PortableTextRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::html::HtmlBackend;
    use crate::model::ImageSource;

    fn nodes(value: Value) -> Vec<ContentNode> {
        serde_json::from_value(value).unwrap()
    }

    fn render_html(value: Value) -> RenderResult {
        PortableTextRenderer::<HtmlBackend>::new().render(&nodes(value))
    }

    fn span(text: &str, marks: &[&str]) -> Value {
        json!({"_type": "span", "text": text, "marks": marks})
    }

    fn item(kind: &str, level: u32, text: &str) -> Value {
        json!({"_type": "block", "listItem": kind, "level": level, "children": [span(text, &[])]})
    }

    /// Resolves references of the form `image-<name>` to a fixed CDN.
    struct PrefixResolver;

    impl ImageUrlResolver for PrefixResolver {
        fn resolve(&self, source: &ImageSource) -> Option<String> {
            let name = source.reference.as_deref()?.strip_prefix("image-")?;
            Some(format!("https://cdn.example/{name}"))
        }
    }

    #[test]
    fn test_heading_with_strong() {
        let result = render_html(json!([{
            "_type": "block",
            "style": "h2",
            "children": [span("Hello", &["strong"])]
        }]));
        assert_eq!(result.html, "<h2><strong>Hello</strong></h2>");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_paragraph_with_spans() {
        let result = render_html(json!([{
            "_type": "block",
            "style": "normal",
            "children": [span("Plain ", &[]), span("em", &["em"]), span(" tail", &[])]
        }]));
        assert_eq!(result.html, "<p>Plain <em>em</em> tail</p>");
    }

    #[test]
    fn test_mark_order_is_canonical() {
        let a = render_html(json!([{
            "_type": "block",
            "children": [span("x", &["em", "strong"])]
        }]));
        let b = render_html(json!([{
            "_type": "block",
            "children": [span("x", &["strong", "em"])]
        }]));
        assert_eq!(a.html, "<p><strong><em>x</em></strong></p>");
        assert_eq!(a.html, b.html);
    }

    #[test]
    fn test_link_annotation_is_outermost() {
        let result = render_html(json!([{
            "_type": "block",
            "children": [span("site", &["code", "l1"])],
            "markDefs": [{"_key": "l1", "_type": "link", "href": "https://example.com"}]
        }]));
        assert_eq!(
            result.html,
            r#"<p><a href="https://example.com"><code>site</code></a></p>"#
        );
    }

    #[test]
    fn test_unsafe_link_dropped() {
        let result = render_html(json!([{
            "_type": "block",
            "children": [span("click", &["l1"])],
            "markDefs": [{"_key": "l1", "_type": "link", "href": "javascript:alert(1)"}]
        }]));
        assert_eq!(result.html, "<p>click</p>");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_mark_renders_text() {
        let result = render_html(json!([{
            "_type": "block",
            "children": [span("glow", &["highlight"])]
        }]));
        assert_eq!(result.html, "<p>glow</p>");
        assert_eq!(result.warnings, vec!["unknown mark 'highlight' rendered as plain text"]);
    }

    #[test]
    fn test_unknown_style_falls_back_to_paragraph() {
        let result = render_html(json!([{
            "_type": "block",
            "style": "lead",
            "children": [span("Intro", &[])]
        }]));
        assert_eq!(result.html, "<p>Intro</p>");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_blockquote() {
        let result = render_html(json!([{
            "_type": "block",
            "style": "blockquote",
            "children": [span("Fear is the mind-killer.", &[])]
        }]));
        assert_eq!(result.html, "<blockquote>Fear is the mind-killer.</blockquote>");
    }

    #[test]
    fn test_text_escaped_and_newlines() {
        let result = render_html(json!([{
            "_type": "block",
            "children": [span("a < b\nc & d", &[])]
        }]));
        assert_eq!(result.html, "<p>a &lt; b<br>c &amp; d</p>");
    }

    #[test]
    fn test_unknown_node_skipped() {
        let result = render_html(json!([
            {"_type": "youtube", "id": "abc"},
            {"_type": "block", "children": [span("after", &[])]}
        ]));
        assert_eq!(result.html, "<p>after</p>");
        assert_eq!(result.warnings, vec!["skipped content node of unknown type 'youtube'"]);
    }

    #[test]
    fn test_malformed_block_fields_keep_text() {
        let result = render_html(json!([
            {"_type": "block", "level": "2", "children": [span("Paragraph one", &[])]},
            {
                "_type": "block",
                "children": [span("Paragraph two", &["x"])],
                "markDefs": [{"_key": "x", "_type": "internalLink", "href": {"_ref": "chapter-1"}}]
            }
        ]));
        assert_eq!(result.html, "<p>Paragraph one</p><p>Paragraph two</p>");
        assert_eq!(
            result.warnings,
            vec!["unknown annotation 'internalLink' rendered as plain text"]
        );
    }

    #[test]
    fn test_unknown_inline_object_keeps_text() {
        let result = render_html(json!([{
            "_type": "block",
            "children": [span("See ", &[]), {"_type": "footnote", "text": "note 1"}]
        }]));
        assert_eq!(result.html, "<p>See note 1</p>");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_flat_bullet_list() {
        let result = render_html(json!([
            item("bullet", 1, "one"),
            item("bullet", 1, "two"),
            {"_type": "block", "children": [span("after", &[])]}
        ]));
        assert_eq!(
            result.html,
            "<ul><li>one</li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn test_nested_list() {
        let result = render_html(json!([
            item("number", 1, "one"),
            item("bullet", 2, "one.a"),
            item("bullet", 2, "one.b"),
            item("number", 1, "two")
        ]));
        assert_eq!(
            result.html,
            "<ol><li>one<ul><li>one.a</li><li>one.b</li></ul></li><li>two</li></ol>"
        );
    }

    #[test]
    fn test_list_kind_change_starts_new_list() {
        let result = render_html(json!([
            item("bullet", 1, "a"),
            item("number", 1, "b")
        ]));
        assert_eq!(result.html, "<ul><li>a</li></ul><ol><li>b</li></ol>");
    }

    #[test]
    fn test_list_closed_at_end_of_document() {
        let result = render_html(json!([
            item("bullet", 1, "a"),
            item("bullet", 3, "deep")
        ]));
        assert_eq!(
            result.html,
            "<ul><li>a<ul><li>deep</li></ul></li></ul>"
        );
    }

    #[test]
    fn test_image_resolved() {
        let renderer =
            PortableTextRenderer::<HtmlBackend>::new().with_image_resolver(Arc::new(PrefixResolver));
        let result = renderer.render(&nodes(json!([{
            "_type": "image",
            "asset": {"_ref": "image-map.png"},
            "alt": "Map"
        }])));
        assert_eq!(
            result.html,
            r#"<figure><img src="https://cdn.example/map.png" alt="Map" loading="lazy"></figure>"#
        );
    }

    #[test]
    fn test_unresolvable_image_keeps_caption() {
        let result = render_html(json!([{
            "_type": "image",
            "asset": {"_ref": "not-an-image"},
            "caption": "The desert"
        }]));
        assert_eq!(result.html, "<figure><figcaption>The desert</figcaption></figure>");
        assert!(!result.html.contains("<img"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unresolvable_image_without_caption_renders_nothing() {
        let result = render_html(json!([{"_type": "image", "alt": "Nothing"}]));
        assert_eq!(result.html, "");
    }

    #[test]
    fn test_code_node() {
        let result = render_html(json!([{
            "_type": "code",
            "language": "rust",
            "filename": "main.rs",
            "code": "fn main() {\n    println!(\"<hi>\");\n}"
        }]));
        assert_eq!(
            result.html,
            "<pre data-filename=\"main.rs\"><code class=\"language-rust\">fn main() {\n    println!(&quot;&lt;hi&gt;&quot;);\n}</code></pre>"
        );
    }

    #[test]
    fn test_audio_node() {
        let result = render_html(json!([
            {"_type": "audio", "url": "https://cdn.example/a.mp3"},
            {"_type": "audio"}
        ]));
        assert_eq!(
            result.html,
            r#"<audio controls preload="none" src="https://cdn.example/a.mp3"></audio>"#
        );
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_render_is_idempotent() {
        let doc = nodes(json!([
            {"_type": "block", "style": "h1", "children": [span("Title", &["em"])]},
            item("bullet", 1, "a"),
            {"_type": "mystery"},
            {"_type": "image", "asset": {"_ref": "bad"}, "caption": "c"}
        ]));
        let renderer = PortableTextRenderer::<HtmlBackend>::new();
        let first = renderer.render(&doc);
        let second = renderer.render(&doc);
        assert_eq!(first.html, second.html);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_empty_document() {
        let result = render_html(json!([]));
        assert_eq!(result.html, "");
        assert!(result.warnings.is_empty());
    }
}
