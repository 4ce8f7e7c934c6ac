//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **page-centric, not file-centric**. Every page leads with its
//! positional index and title; the output document and source id are
//! secondary context, shown after an arrow or on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 Welcome → index.html
//!     Id: 1f2e…
//! 002 Draft (no slug, skipped)
//!     Id: 9a8b…
//!
//! Components
//!     footer
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 Welcome → index.html
//! 002 The Six Moves → moves.html
//!
//! Skipped
//!     Draft (no slug)
//!
//! Failed
//!     Broken page
//!         Error: HTTP error: 503 - service unavailable
//!
//! Assets
//!     styles.css
//!     nav.js
//!
//! Generated 2 pages, 1 skipped, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::BuildReport;
use crate::naming::{is_flat_name, output_name};
use crate::source::Snapshot;
use crate::types::{ContentNode, PageRecord};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Page label, falling back to the id for untitled pages.
fn page_label(title: &str, id: &str) -> String {
    if title.trim().is_empty() {
        format!("({})", id)
    } else {
        title.to_string()
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

// ============================================================================
// Check
// ============================================================================

/// What `check` found in the project, besides the page list.
#[derive(Debug, Default)]
pub struct ProjectSummary {
    pub has_config_file: bool,
    pub has_assets: bool,
    pub components: Vec<String>,
}

/// Format the page inventory: every record and the document it maps to.
pub fn format_check_output(pages: &[PageRecord], project: &ProjectSummary) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in pages.iter().enumerate() {
        let label = page_label(&page.title, &page.id);
        match output_name(&page.slug) {
            Some(name) if is_flat_name(&name) => {
                lines.push(format!("{} {} → {}", format_index(i + 1), label, name))
            }
            Some(_) => lines.push(format!(
                "{} {} (invalid slug {:?}, skipped)",
                format_index(i + 1),
                label,
                page.slug.trim()
            )),
            None => lines.push(format!(
                "{} {} (no slug, skipped)",
                format_index(i + 1),
                label
            )),
        }
        lines.push(format!("    Id: {}", page.id));
    }

    if !project.components.is_empty() {
        lines.push(String::new());
        lines.push("Components".to_string());
        for name in &project.components {
            lines.push(format!("    {}", name));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if project.has_config_file {
        lines.push("    config.toml".to_string());
    } else {
        lines.push("    (stock defaults)".to_string());
    }
    if project.has_assets {
        lines.push("    assets/".to_string());
    }

    lines
}

pub fn print_check_output(pages: &[PageRecord], project: &ProjectSummary) {
    for line in format_check_output(pages, project) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a completed build.
pub fn format_build_output(report: &BuildReport, copied_assets: usize) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in report.written.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            page_label(&page.title, &page.page_id),
            page.name
        ));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for page in &report.skipped {
            lines.push(format!("    {} (no slug)", page_label(&page.title, &page.id)));
        }
    }

    if !report.failed.is_empty() {
        lines.push(String::new());
        lines.push("Failed".to_string());
        for page in &report.failed {
            lines.push(format!("    {}", page_label(&page.title, &page.page_id)));
            lines.push(format!("        Error: {}", page.error));
        }
    }

    lines.push(String::new());
    lines.push("Assets".to_string());
    for name in &report.assets {
        lines.push(format!("    {}", name));
    }
    if copied_assets > 0 {
        lines.push(format!("    {} from assets/", plural(copied_assets, "file")));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} skipped, {} failed",
        plural(report.written.len(), "page"),
        report.skipped.len(),
        report.failed.len()
    ));
    lines
}

pub fn print_build_output(report: &BuildReport, copied_assets: usize) {
    for line in format_build_output(report, copied_assets) {
        println!("{}", line);
    }
}

// ============================================================================
// Snapshot
// ============================================================================

fn count_nodes(nodes: &[ContentNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

/// Format the summary of a captured snapshot.
pub fn format_snapshot_output(snapshot: &Snapshot, path: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in snapshot.pages.iter().enumerate() {
        let blocks = snapshot
            .children
            .get(&page.id)
            .map(|tree| count_nodes(tree))
            .unwrap_or(0);
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            page_label(&page.title, &page.id),
            plural(blocks, "block")
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Captured {} → {}",
        plural(snapshot.pages.len(), "page"),
        path.display()
    ));
    lines
}

pub fn print_snapshot_output(snapshot: &Snapshot, path: &Path) {
    for line in format_snapshot_output(snapshot, path) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
