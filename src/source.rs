//! Content source capability and tree fetching.
//!
//! A [`ContentSource`] answers two questions: which pages exist (in order),
//! and what are the direct children of a node (one paginated slice at a
//! time). [`fetch_tree`] turns that into a fully nested tree.
//!
//! Two sources ship with the crate:
//!
//! - [`crate::notion::NotionClient`] talks to the remote API.
//! - [`SnapshotSource`] serves a JSON snapshot from memory, so a site can be
//!   rebuilt offline and tests can run without a network.
//!
//! ## Snapshot Format
//!
//! ```json
//! {
//!   "pages": [{ "id": "p1", "order": 1, "slug": "home", "title": "Welcome", "subtitle": "" }],
//!   "children": {
//!     "p1": [
//!       { "id": "b1", "type": "paragraph", "text": [{ "text": "Hello" }] },
//!       { "id": "b2", "type": "callout", "text": [], "children": [
//!         { "id": "b3", "type": "bullet_item", "text": [{ "text": "nested" }] }
//!       ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Children may be nested inline (as captured) or listed as separate
//! `children` entries keyed by block id (handy for hand-written fixtures).

use crate::types::{ContentNode, PageRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("HTTP error: {status} - {body}")]
    HttpResponse { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing credential: set {0}")]
    MissingCredential(String),
    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// One paginated slice of a node's children.
#[derive(Debug, Clone, Default)]
pub struct ChildPage {
    pub nodes: Vec<ContentNode>,
    /// Present while more results remain.
    pub next_cursor: Option<String>,
}

/// Where pages and their content trees come from.
///
/// Ordering and pagination correctness are the implementation's contract;
/// callers do not re-sort or de-duplicate.
pub trait ContentSource: Sync {
    /// All page records, sorted by ascending order key.
    fn list_pages(&self) -> Result<Vec<PageRecord>, SourceError>;

    /// Direct children of `node_id`, starting at `cursor` (`None` = first slice).
    ///
    /// Returned nodes have empty `children`; `has_children` tells whether
    /// there is more to fetch below them.
    fn list_children(&self, node_id: &str, cursor: Option<&str>)
    -> Result<ChildPage, SourceError>;
}

/// Fetch the complete ordered tree below `node_id`.
///
/// Every slice is requested until the source stops returning a cursor. Each
/// node flagged `has_children` is expanded depth-first before it is added.
/// With `parallel`, the nodes of one slice are expanded concurrently; the
/// result is identical to the sequential fetch.
///
/// Any failure aborts the whole fetch. Nothing partial is returned.
pub fn fetch_tree(
    source: &dyn ContentSource,
    node_id: &str,
    parallel: bool,
) -> Result<Vec<ContentNode>, SourceError> {
    let mut nodes = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = source.list_children(node_id, cursor.as_deref())?;
        let expanded: Vec<ContentNode> = if parallel {
            page.nodes
                .into_par_iter()
                .map(|node| expand(source, node, parallel))
                .collect::<Result<_, _>>()?
        } else {
            page.nodes
                .into_iter()
                .map(|node| expand(source, node, parallel))
                .collect::<Result<_, _>>()?
        };
        nodes.extend(expanded);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    debug!("fetched {} children of {node_id}", nodes.len());
    Ok(nodes)
}

fn expand(
    source: &dyn ContentSource,
    mut node: ContentNode,
    parallel: bool,
) -> Result<ContentNode, SourceError> {
    if node.has_children {
        node.children = fetch_tree(source, &node.id, parallel)?;
    }
    Ok(node)
}

// ============================================================================
// Snapshots
// ============================================================================

/// Serialized form of a whole source: pages plus their trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pages: Vec<PageRecord>,
    /// Children keyed by parent id (page or block).
    #[serde(default)]
    pub children: BTreeMap<String, Vec<ContentNode>>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SourceError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Capture every page and its full tree from `source`.
pub fn capture_snapshot(
    source: &dyn ContentSource,
    parallel: bool,
) -> Result<Snapshot, SourceError> {
    let pages = source.list_pages()?;
    let mut children = BTreeMap::new();
    for page in &pages {
        info!("capturing page {} ({})", page.id, page.title);
        children.insert(page.id.clone(), fetch_tree(source, &page.id, parallel)?);
    }
    Ok(Snapshot { pages, children })
}

/// In-memory source backed by a [`Snapshot`].
///
/// Children are served in slices of `page_size` with the offset as cursor,
/// so callers see the same pagination behavior as against the remote API.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    pages: Vec<PageRecord>,
    index: HashMap<String, Vec<ContentNode>>,
    page_size: usize,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot, page_size: usize) -> Self {
        let mut index = HashMap::new();
        for (parent, nodes) in snapshot.children {
            index_children(&mut index, parent, nodes);
        }
        Self {
            pages: snapshot.pages,
            index,
            page_size: page_size.max(1),
        }
    }

    pub fn load(path: &Path, page_size: usize) -> Result<Self, SourceError> {
        Ok(Self::new(Snapshot::load(path)?, page_size))
    }
}

/// Flatten inline children into per-parent entries of shallow nodes.
fn index_children(
    index: &mut HashMap<String, Vec<ContentNode>>,
    parent: String,
    nodes: Vec<ContentNode>,
) {
    let mut shallow = Vec::with_capacity(nodes.len());
    for mut node in nodes {
        let nested = std::mem::take(&mut node.children);
        node.has_children |= !nested.is_empty();
        if !nested.is_empty() {
            index_children(index, node.id.clone(), nested);
        }
        shallow.push(node);
    }
    index.entry(parent).or_default().extend(shallow);
}

impl ContentSource for SnapshotSource {
    fn list_pages(&self) -> Result<Vec<PageRecord>, SourceError> {
        Ok(self.pages.clone())
    }

    fn list_children(
        &self,
        node_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildPage, SourceError> {
        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| SourceError::Protocol(format!("invalid cursor {c:?}")))?,
            None => 0,
        };
        let all = self.index.get(node_id).map(Vec::as_slice).unwrap_or(&[]);
        let end = (start + self.page_size).min(all.len());
        let nodes = all.get(start..end).unwrap_or(&[]).to_vec();
        let next_cursor = (end < all.len()).then(|| end.to_string());
        Ok(ChildPage { nodes, next_cursor })
    }
}
