//! Shared types used across the pipeline.
//!
//! The content model is what every [`crate::source::ContentSource`] produces
//! and what the renderer consumes. These types also define the on-disk
//! snapshot format, so they derive both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

/// One element of the content tree.
///
/// `children` is only populated when `has_children` is set and the tree has
/// been fetched with [`crate::source::fetch_tree`]. A node owns its children
/// exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    #[serde(flatten)]
    pub block: Block,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Discriminant name, used in logs.
    pub fn kind(&self) -> &'static str {
        self.block.kind()
    }
}

/// Node type plus its type-specific payload.
///
/// Any type the source reports that is not listed here deserializes into
/// [`Block::Unsupported`] and renders as nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    Heading {
        level: u8,
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    BulletItem {
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    NumberItem {
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    Quote {
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    Divider,
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    Callout {
        /// Emoji glyph; `None` falls back to the configured default.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default)]
        text: Vec<TextSpan>,
    },
    Image {
        source: ImageSource,
        #[serde(default)]
        caption: Vec<TextSpan>,
    },
    Embed {
        url: String,
    },
    #[serde(other)]
    Unsupported,
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading { .. } => "heading",
            Block::BulletItem { .. } => "bullet_item",
            Block::NumberItem { .. } => "number_item",
            Block::Quote { .. } => "quote",
            Block::Divider => "divider",
            Block::Code { .. } => "code",
            Block::Callout { .. } => "callout",
            Block::Image { .. } => "image",
            Block::Embed { .. } => "embed",
            Block::Unsupported => "unsupported",
        }
    }
}

/// Where an image's bytes live. The two variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// Linked from an arbitrary external URL.
    External { url: String },
    /// Uploaded to the content source; the URL is usually short-lived.
    Hosted { url: String },
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::External { url } | ImageSource::Hosted { url } => url,
        }
    }
}

/// One run of uniformly-styled text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Independent, composable style flags of a [`TextSpan`].
///
/// Unknown keys (such as a color) are ignored when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// Source description of one output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    /// Ascending sort key. Only decides fetch order, never output naming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    /// Raw slug, possibly empty.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

/// A finished page, ready to be persisted exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub output_name: String,
    pub html: String,
}

/// Sidebar navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavEntry {
    /// Output document name this entry links to, e.g. `"mindset.html"`.
    pub href: String,
    pub label: String,
    /// Stable identifier; defaults to the href without its `.html` suffix.
    #[serde(default)]
    pub id: String,
}
