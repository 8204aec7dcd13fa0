//! Portable Text content model.
//!
//! Deserialization is lenient: a node whose `_type` is not one of the known
//! kinds, or whose fields cannot be decoded as that kind, becomes an
//! `Unknown` node so one bad node never fails a whole document. Blocks are
//! decoded field by field instead, so a malformed field never costs the
//! block its text.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A top-level node of a rich-text document.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentNode {
    /// Text block (paragraph, heading, blockquote or list item).
    Block(Block),
    /// Inline image with optional caption.
    Image(ImageNode),
    /// Literal code listing.
    Code(CodeNode),
    /// Embedded audio clip.
    Audio(AudioNode),
    /// Any node kind without a renderer.
    Unknown {
        /// The node's `_type`, or empty if it had none.
        kind: String,
    },
}

impl ContentNode {
    /// The node's `_type` discriminator.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Block(_) => "block",
            Self::Image(_) => "image",
            Self::Code(_) => "code",
            Self::Audio(_) => "audio",
            Self::Unknown { kind } => kind,
        }
    }

    /// Decode a node from JSON, falling back to [`ContentNode::Unknown`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let kind = type_of(&value);
        let decoded = match kind.as_str() {
            "block" => Some(Self::Block(Block::from_value(value))),
            "image" => serde_json::from_value(value).map(Self::Image).ok(),
            "code" => serde_json::from_value(value).map(Self::Code).ok(),
            "audio" => serde_json::from_value(value).map(Self::Audio).ok(),
            _ => None,
        };
        decoded.unwrap_or(Self::Unknown { kind })
    }
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Text block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    /// Stable key within the document.
    pub key: String,
    /// Block style.
    pub style: BlockStyle,
    /// List kind when the block is a list item.
    pub list_item: Option<ListKind>,
    /// List nesting level, starting at 1.
    pub level: Option<u32>,
    /// Inline children in display order.
    pub children: Vec<Inline>,
    /// Annotation definitions referenced from span marks.
    pub mark_defs: Vec<MarkDef>,
}

impl Block {
    /// Decode a block, ignoring fields of the wrong shape.
    ///
    /// `level` also accepts numeric strings. Children and mark definitions
    /// are decoded one element at a time.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        let level = fields.get("level").and_then(|level| match level {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        Self {
            key: string_field(&fields, "_key").unwrap_or_default(),
            style: string_field(&fields, "style")
                .map(BlockStyle::from)
                .unwrap_or_default(),
            list_item: string_field(&fields, "listItem").map(ListKind::from),
            level: level.and_then(|level| u32::try_from(level).ok()),
            children: array_field(&mut fields, "children")
                .into_iter()
                .filter_map(|child| Inline::deserialize(child).ok())
                .collect(),
            mark_defs: array_field(&mut fields, "markDefs")
                .into_iter()
                .map(MarkDef::from_value)
                .collect(),
        }
    }

    /// List nesting level, clamped to at least 1.
    #[must_use]
    pub fn list_level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }
}

/// Block style.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BlockStyle {
    /// Plain paragraph.
    #[default]
    Normal,
    /// Heading, level 1 to 6.
    Heading(u8),
    /// Quotation.
    Blockquote,
    /// A style without a renderer.
    Other(String),
}

impl From<String> for BlockStyle {
    fn from(style: String) -> Self {
        match style.as_str() {
            "normal" | "" => Self::Normal,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "blockquote" => Self::Blockquote,
            _ => Self::Other(style),
        }
    }
}

/// List kind of a list item block.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ListKind {
    /// Unordered list.
    Bullet,
    /// Ordered list.
    Number,
    /// A list kind without a renderer.
    Other(String),
}

impl From<String> for ListKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "bullet" => Self::Bullet,
            "number" => Self::Number,
            _ => Self::Other(kind),
        }
    }
}

/// Inline child of a block.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    /// Run of text with marks.
    Span(Span),
    /// Inline object without a renderer.
    Unknown {
        /// The object's `_type`.
        kind: String,
        /// Plain text carried by the object, if any.
        text: Option<String>,
    },
}

impl<'de> Deserialize<'de> for Inline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = type_of(&value);
        if kind == "span" || kind.is_empty() {
            if let Ok(span) = serde_json::from_value::<Span>(value.clone()) {
                return Ok(Self::Span(span));
            }
        }
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Ok(Self::Unknown { kind, text })
    }
}

/// Run of text.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Span {
    /// Literal text; may contain `\n`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Decorator names or `markDefs` keys.
    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Annotation definition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkDef {
    /// Key referenced from span marks.
    pub key: String,
    /// Annotation kind (`link`, ...).
    pub kind: String,
    /// Link target for `link` annotations. `None` when absent or not a
    /// string, such as an internal reference object.
    pub href: Option<String>,
}

impl MarkDef {
    /// Decode an annotation definition, ignoring fields of the wrong shape.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        Self {
            key: string_field(&fields, "_key").unwrap_or_default(),
            kind: string_field(&fields, "_type").unwrap_or_default(),
            href: string_field(&fields, "href"),
        }
    }
}

impl<'de> Deserialize<'de> for MarkDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Reference to an image asset.
///
/// Either a resolved `url` or an asset reference such as
/// `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ImageSource {
    /// Asset document id.
    #[serde(rename = "_ref", alias = "_id", default)]
    pub reference: Option<String>,
    /// Already resolved URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Image node.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ImageNode {
    #[serde(default)]
    pub asset: Option<ImageSource>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Code listing node.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CodeNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Audio node. The URL is resolved by the query projection.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AudioNode {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

fn type_of(value: &Value) -> String {
    value
        .get("_type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_owned)
}

fn array_field(fields: &mut Map<String, Value>, name: &str) -> Vec<Value> {
    match fields.remove(name) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
