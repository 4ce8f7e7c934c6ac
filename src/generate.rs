//! HTML site generation.
//!
//! Lists the pages, fetches and renders each one, wraps it in the page
//! chrome and hands the finished document to a [`DocumentSink`].
//!
//! ## Generated Files
//!
//! ```text
//! dist/
//! ├── index.html        # Page whose slug is "home" or "index"
//! ├── mindset.html      # One document per page with a slug
//! ├── styles.css        # Unless the stylesheet is inlined
//! ├── nav.js            # Mobile menu toggle + reading progress bar
//! └── ...               # Files copied from the project's assets/
//! ```
//!
//! ## Failure Policy
//!
//! - Listing pages fails → the run aborts.
//! - A page has no slug → it is skipped and reported, never an error.
//! - A slug contains a path separator → the page is recorded as failed and
//!   the run continues, whatever the policy.
//! - Fetching one page's tree fails → recorded in the report and the run
//!   continues (`build.on_error = "continue"`), or the run aborts
//!   (`"abort"`).
//! - The sink fails → the run aborts.
//!
//! Documents already written before an abort stay in place.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! The sidebar is rendered statically from an explicit, ordered list of
//! [`NavEntry`] values; the active entry is a pure function of the current
//! document name.

use crate::components::ComponentLookup;
use crate::config::{self, ColorConfig, ErrorPolicy, SiteConfig, SiteMeta, StylesheetMode};
use crate::naming::{document_id, is_flat_name, output_name};
use crate::render::Renderer;
use crate::source::{ContentSource, SourceError, fetch_tree};
use crate::types::{ContentNode, NavEntry, PageRecord, RenderedDocument};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("listing pages failed: {0}")]
    ListPages(#[source] SourceError),
    #[error("page {page_id} ({title}) failed: {source}")]
    Page {
        page_id: String,
        title: String,
        source: SourceError,
    },
    #[error("build deadline of {0}s exceeded")]
    DeadlineExceeded(u64),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

const CSS_STATIC: &str = include_str!("../static/styles.css");
const JS: &str = include_str!("../static/nav.js");

pub const STYLESHEET_NAME: &str = "styles.css";
pub const SCRIPT_NAME: &str = "nav.js";

// ============================================================================
// Persistence
// ============================================================================

/// Destination for finished documents and static assets.
///
/// Writes overwrite; the last write of a name wins.
pub trait DocumentSink {
    fn write(&mut self, name: &str, content: &str) -> io::Result<()>;
}

/// Writes documents as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSink for DirSink {
    fn write(&mut self, name: &str, content: &str) -> io::Result<()> {
        let rel = Path::new(name);
        if !rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to write outside the output directory: {name}"),
            ));
        }
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }
}

/// Full stylesheet: color custom properties followed by the base styles.
pub fn site_css(colors: &ColorConfig) -> String {
    format!("{}\n\n{}", config::generate_color_css(colors), CSS_STATIC)
}

/// Write the stylesheet (when linked) and the navigation script.
///
/// Returns the names written.
pub fn write_static_assets(
    sink: &mut dyn DocumentSink,
    mode: StylesheetMode,
    css: &str,
) -> io::Result<Vec<String>> {
    let mut written = Vec::new();
    if mode == StylesheetMode::Linked {
        sink.write(STYLESHEET_NAME, css)?;
        written.push(STYLESHEET_NAME.to_string());
    }
    sink.write(SCRIPT_NAME, JS)?;
    written.push(SCRIPT_NAME.to_string());
    Ok(written)
}

/// Copy a user asset directory verbatim into the output directory.
///
/// A missing source directory copies nothing. Returns the number of files.
pub fn copy_assets(src: &Path, dst: &Path) -> io::Result<usize> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::other)?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Sidebar
// ============================================================================

/// The ordered sidebar entries for this build.
///
/// Configured `[[nav]]` entries win. Without them, every page that produces
/// a document is listed in page order, labelled by its title.
pub fn navigation(config: &SiteConfig, pages: &[PageRecord]) -> Vec<NavEntry> {
    if !config.nav.is_empty() {
        return config
            .nav
            .iter()
            .map(|entry| NavEntry {
                id: if entry.id.is_empty() {
                    document_id(&entry.href).to_string()
                } else {
                    entry.id.clone()
                },
                ..entry.clone()
            })
            .collect();
    }

    let mut seen = HashSet::new();
    pages
        .iter()
        .filter_map(|page| {
            let name = output_name(&page.slug).filter(|name| is_flat_name(name))?;
            if !seen.insert(name.clone()) {
                return None;
            }
            let label = if page.title.trim().is_empty() {
                document_id(&name).to_string()
            } else {
                page.title.clone()
            };
            Some(NavEntry {
                id: document_id(&name).to_string(),
                label,
                href: name,
            })
        })
        .collect()
}

/// Id of the entry pointing at `current`, if any.
pub fn active_nav_id<'a>(current: &str, nav: &'a [NavEntry]) -> Option<&'a str> {
    nav.iter()
        .find(|entry| entry.href == current)
        .map(|entry| entry.id.as_str())
}

/// Renders the sidebar contents for the document named `current`.
pub fn render_sidebar(current: &str, nav: &[NavEntry], brand: &str) -> Markup {
    let active = active_nav_id(current, nav);
    html! {
        @if !brand.is_empty() {
            div.sidebar-brand {
                span.brand-name { (brand) }
                div.brand-line {}
            }
        }
        ul.nav-list {
            @for entry in nav {
                @let is_active = active == Some(entry.id.as_str());
                li {
                    a href=(entry.href) class=[is_active.then_some("active")] { (entry.label) }
                }
            }
        }
    }
}

// ============================================================================
// Document assembly
// ============================================================================

/// How a document references its styles.
#[derive(Debug, Clone, Copy)]
pub enum Stylesheet<'a> {
    Linked(&'a str),
    Inline(&'a str),
}

/// Page chrome shared by every document of a build.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub site: &'a SiteMeta,
    pub stylesheet: Stylesheet<'a>,
    pub escape: bool,
}

impl Layout<'_> {
    /// Wrap a rendered body in the full document skeleton.
    pub fn assemble(&self, title: &str, subtitle: &str, sidebar: Markup, body: Markup) -> Markup {
        let site = self.site;
        html! {
            (DOCTYPE)
            html lang=(site.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.text(title)) (site.title_suffix) }
                    @for href in &site.font_stylesheets {
                        link rel="stylesheet" href=(href);
                    }
                    @match self.stylesheet {
                        Stylesheet::Linked(href) => { link rel="stylesheet" href=(href); }
                        Stylesheet::Inline(css) => { style { (PreEscaped(css)) } }
                    }
                }
                body {
                    div.progress-bar { div.progress-bar-fill {} }
                    div.mobile-overlay {}
                    header.mobile-header {
                        button.mobile-menu-btn type="button" aria-label="Menu" { "☰" }
                    }
                    div.page-wrapper {
                        nav.sidebar { (sidebar) }
                        main.main-content {
                            h1.page-title { (self.text(title)) }
                            @if !subtitle.is_empty() {
                                p.page-subtitle { (self.text(subtitle)) }
                            }
                            div.prose { (body) }
                        }
                    }
                    script src=(SCRIPT_NAME) {}
                }
            }
        }
    }

    fn text(&self, value: &str) -> Markup {
        if self.escape {
            html! { (value) }
        } else {
            PreEscaped(value.to_string())
        }
    }
}

/// Render one page's tree into a complete document.
pub fn render_document(
    renderer: &Renderer<'_>,
    layout: &Layout<'_>,
    nav: &[NavEntry],
    page: &PageRecord,
    output_name: String,
    tree: &[ContentNode],
) -> RenderedDocument {
    let body = renderer.render_siblings(tree);
    let sidebar = render_sidebar(&output_name, nav, &layout.site.brand);
    let html = layout
        .assemble(&page.title, &page.subtitle, sidebar, body)
        .into_string();
    RenderedDocument { output_name, html }
}

// ============================================================================
// Orchestration
// ============================================================================

/// A document that was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenPage {
    pub page_id: String,
    pub title: String,
    pub name: String,
}

/// A page whose tree could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedPage {
    pub page_id: String,
    pub title: String,
    pub error: String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub written: Vec<WrittenPage>,
    /// Pages without a slug.
    pub skipped: Vec<PageRecord>,
    pub failed: Vec<FailedPage>,
    /// Static asset names written through the sink.
    pub assets: Vec<String>,
}

/// Run the whole pipeline: list → fetch → render → assemble → persist.
pub fn build(
    source: &dyn ContentSource,
    components: &dyn ComponentLookup,
    sink: &mut dyn DocumentSink,
    config: &SiteConfig,
) -> Result<BuildReport, BuildError> {
    let started = Instant::now();
    let pages = source.list_pages().map_err(BuildError::ListPages)?;
    info!("Building {} pages", pages.len());

    let css = site_css(&config.colors);
    let layout = Layout {
        site: &config.site,
        stylesheet: match config.render.stylesheet {
            StylesheetMode::Linked => Stylesheet::Linked(STYLESHEET_NAME),
            StylesheetMode::Inline => Stylesheet::Inline(&css),
        },
        escape: config.render.escape_html,
    };
    let nav = navigation(config, &pages);
    let renderer = Renderer::new(&config.render, components);

    let mut report = BuildReport {
        assets: write_static_assets(sink, config.render.stylesheet, &css)?,
        ..Default::default()
    };

    for page in &pages {
        check_deadline(started, config.build.deadline_secs)?;

        let Some(name) = output_name(&page.slug) else {
            info!("Skipping page {} ({}): no slug", page.id, page.title);
            report.skipped.push(page.clone());
            continue;
        };
        if !is_flat_name(&name) {
            warn!(
                "Page {} ({}): slug {:?} is not a plain file name",
                page.id, page.title, page.slug
            );
            report.failed.push(FailedPage {
                page_id: page.id.clone(),
                title: page.title.clone(),
                error: format!(
                    "invalid slug {:?}: path separators are not allowed",
                    page.slug.trim()
                ),
            });
            continue;
        }

        let tree = match fetch_tree(source, &page.id, config.source.parallel_fetch) {
            Ok(tree) => tree,
            Err(err) if config.build.on_error == ErrorPolicy::Continue => {
                warn!("Page {} ({}) failed: {err}", page.id, page.title);
                report.failed.push(FailedPage {
                    page_id: page.id.clone(),
                    title: page.title.clone(),
                    error: err.to_string(),
                });
                continue;
            }
            Err(err) => {
                return Err(BuildError::Page {
                    page_id: page.id.clone(),
                    title: page.title.clone(),
                    source: err,
                });
            }
        };

        let doc = render_document(&renderer, &layout, &nav, page, name, &tree);
        sink.write(&doc.output_name, &doc.html)?;
        info!("Generated {}", doc.output_name);
        report.written.push(WrittenPage {
            page_id: page.id.clone(),
            title: page.title.clone(),
            name: doc.output_name,
        });
    }

    Ok(report)
}

fn check_deadline(started: Instant, deadline_secs: Option<u64>) -> Result<(), BuildError> {
    match deadline_secs {
        Some(secs) if started.elapsed() >= Duration::from_secs(secs) => {
            Err(BuildError::DeadlineExceeded(secs))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
