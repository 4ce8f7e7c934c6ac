//! Reusable HTML fragments for the `COMPONENT:` command.
//!
//! Components live as `.html` files under `components/` in the project
//! directory. The component name is the file path relative to that
//! directory, without the extension, using `/` as separator:
//!
//! ```text
//! components/
//! ├── footer.html          → COMPONENT:footer
//! └── cta/
//!     └── apply.html       → COMPONENT:cta/apply
//! ```
//!
//! Fragments are spliced into the page verbatim; they are trusted content.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Named fragment lookup consumed by the renderer.
pub trait ComponentLookup {
    fn lookup(&self, name: &str) -> Option<&str>;
}

/// In-memory component store.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    fragments: BTreeMap<String, String>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, html: impl Into<String>) {
        self.fragments.insert(name.into(), html.into());
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    /// Load every `*.html` file under `dir`.
    ///
    /// A missing directory yields an empty store.
    pub fn load_dir(dir: &Path) -> std::io::Result<Self> {
        let mut store = Self::new();
        if !dir.is_dir() {
            return Ok(store);
        }
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::other)?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }
            let Ok(rel) = path.with_extension("").strip_prefix(dir).map(Path::to_path_buf) else {
                continue;
            };
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            debug!("loaded component {name}");
            store.insert(name, fs::read_to_string(path)?);
        }
        Ok(store)
    }
}

impl ComponentLookup for ComponentStore {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lookup_finds_inserted_fragment() {
        let mut store = ComponentStore::new();
        store.insert("footer", "<footer>bye</footer>");
        assert_eq!(store.lookup("footer"), Some("<footer>bye</footer>"));
        assert_eq!(store.lookup("header"), None);
    }

    #[test]
    fn load_dir_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = ComponentStore::load_dir(&tmp.path().join("components")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn load_dir_reads_nested_html_only() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("components");
        fs::create_dir_all(dir.join("cta")).unwrap();
        fs::write(dir.join("footer.html"), "<footer/>").unwrap();
        fs::write(dir.join("cta/apply.html"), "<a>Apply</a>").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let store = ComponentStore::load_dir(&dir).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("footer"), Some("<footer/>"));
        assert_eq!(store.lookup("cta/apply"), Some("<a>Apply</a>"));
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["cta/apply", "footer"]);
    }
}
