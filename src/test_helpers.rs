//! Shared test utilities for the blockpress test suite.
//!
//! Provides terse builders for content nodes and text spans, an in-memory
//! [`DocumentSink`], and a [`ContentSource`] wrapper that fails on demand.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = vec![
//!     heading("h", 2, "Steps"),
//!     callout("c", Some("⚠️"), "Careful", vec![bullet("b", "First")]),
//! ];
//! ```

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::sync::Mutex;

use crate::generate::DocumentSink;
use crate::source::{ChildPage, ContentSource, SnapshotSource, SourceError};
use crate::types::{Annotations, Block, ContentNode, ImageSource, PageRecord, TextSpan};

// ============================================================================
// Text spans
// ============================================================================

pub fn span(text: &str) -> TextSpan {
    styled(text, Annotations::default())
}

pub fn styled(text: &str, annotations: Annotations) -> TextSpan {
    TextSpan {
        text: text.to_string(),
        annotations,
        link: None,
    }
}

pub fn linked(text: &str, url: &str) -> TextSpan {
    TextSpan {
        link: Some(url.to_string()),
        ..span(text)
    }
}

/// A single plain span, or nothing for empty text.
fn spans(text: &str) -> Vec<TextSpan> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![span(text)]
    }
}

// ============================================================================
// Nodes
// ============================================================================

pub fn node(id: &str, block: Block) -> ContentNode {
    ContentNode {
        id: id.to_string(),
        block,
        has_children: false,
        children: Vec::new(),
    }
}

pub fn paragraph(id: &str, text: &str) -> ContentNode {
    node(id, Block::Paragraph { text: spans(text) })
}

pub fn heading(id: &str, level: u8, text: &str) -> ContentNode {
    node(
        id,
        Block::Heading {
            level,
            text: spans(text),
        },
    )
}

pub fn bullet(id: &str, text: &str) -> ContentNode {
    node(id, Block::BulletItem { text: spans(text) })
}

pub fn number(id: &str, text: &str) -> ContentNode {
    node(id, Block::NumberItem { text: spans(text) })
}

pub fn quote(id: &str, text: &str) -> ContentNode {
    node(id, Block::Quote { text: spans(text) })
}

pub fn divider(id: &str) -> ContentNode {
    node(id, Block::Divider)
}

pub fn code(id: &str, language: Option<&str>, text: &str) -> ContentNode {
    node(
        id,
        Block::Code {
            language: language.map(str::to_string),
            text: spans(text),
        },
    )
}

pub fn embed(id: &str, url: &str) -> ContentNode {
    node(
        id,
        Block::Embed {
            url: url.to_string(),
        },
    )
}

pub fn image(id: &str, source: ImageSource, caption: &str) -> ContentNode {
    node(
        id,
        Block::Image {
            source,
            caption: spans(caption),
        },
    )
}

/// Callout with already-fetched children.
pub fn callout(
    id: &str,
    icon: Option<&str>,
    text: &str,
    children: Vec<ContentNode>,
) -> ContentNode {
    ContentNode {
        has_children: !children.is_empty(),
        children,
        ..node(
            id,
            Block::Callout {
                icon: icon.map(str::to_string),
                text: spans(text),
            },
        )
    }
}

pub fn page_record(id: &str, slug: &str, title: &str) -> PageRecord {
    PageRecord {
        id: id.to_string(),
        order: None,
        slug: slug.to_string(),
        title: title.to_string(),
        subtitle: String::new(),
    }
}

// ============================================================================
// Sinks and sources
// ============================================================================

/// Sink that keeps every document in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, name: &str, content: &str) -> io::Result<()> {
        self.documents.insert(name.to_string(), content.to_string());
        Ok(())
    }
}

/// Wraps a snapshot source and fails with a 503 for selected node ids.
pub struct FailingSource {
    inner: SnapshotSource,
    fail_on: HashSet<String>,
    fail_list: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FailingSource {
    pub fn new(inner: SnapshotSource, fail_on: &[&str]) -> Self {
        Self {
            inner,
            fail_on: fail_on.iter().map(|id| id.to_string()).collect(),
            fail_list: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Also fail the page listing.
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    fn unavailable() -> SourceError {
        SourceError::HttpResponse {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

impl ContentSource for FailingSource {
    fn list_pages(&self) -> Result<Vec<PageRecord>, SourceError> {
        if self.fail_list {
            return Err(Self::unavailable());
        }
        self.inner.list_pages()
    }

    fn list_children(
        &self,
        node_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildPage, SourceError> {
        self.calls.lock().unwrap().push(node_id.to_string());
        if self.fail_on.contains(node_id) {
            return Err(Self::unavailable());
        }
        self.inner.list_children(node_id, cursor)
    }
}
