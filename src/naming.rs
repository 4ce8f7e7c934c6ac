//! Output document naming.
//!
//! Every page record carries a free-text slug. The slug alone decides the
//! output file name; the order key never does.
//!
//! ## Rules
//!
//! - empty (or whitespace-only) slug → no document, the page is skipped
//! - `home` / `index`, any case → `index.html`, the site root
//! - otherwise the trimmed slug, with `.html` appended unless already present
//!
//! A name containing a path separator is not a valid document name (see
//! [`is_flat_name`]); the build records such pages as failed.
//!
//! ```text
//! "  Home  "      → index.html
//! "mindset"       → mindset.html
//! "faq.html"      → faq.html
//! ""              → (skipped)
//! ```

/// File name of the site root document.
pub const ROOT_DOCUMENT: &str = "index.html";

/// Derive the output document name from a raw slug.
///
/// Returns `None` when the page must be skipped.
pub fn output_name(slug: &str) -> Option<String> {
    let slug = slug.trim();
    if slug.is_empty() {
        return None;
    }
    if slug.eq_ignore_ascii_case("home") || slug.eq_ignore_ascii_case("index") {
        return Some(ROOT_DOCUMENT.to_string());
    }
    if slug.to_ascii_lowercase().ends_with(".html") {
        Some(slug.to_string())
    } else {
        Some(format!("{slug}.html"))
    }
}

/// Whether `name` is a plain file name in the output root.
///
/// Documents link to `styles.css`, `nav.js` and each other relatively, so
/// anything below the root (or outside it) would break.
pub fn is_flat_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
}

/// Stable identifier of a document name: the name without `.html`.
///
/// Used as the default sidebar entry id.
pub fn document_id(name: &str) -> &str {
    name.strip_suffix(".html").unwrap_or(name)
}
