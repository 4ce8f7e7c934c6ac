//! Magic commands: plain-text paragraphs that expand into structure.
//!
//! Authors can write a paragraph whose text starts with a command prefix
//! instead of needing a dedicated block type:
//!
//! ```text
//! SLIDE:https://docs.google.com/presentation/d/XYZ/edit   → responsive slide embed
//! COMPONENT:footer                                       → reusable HTML fragment
//! ```
//!
//! Detection runs on the paragraph's plain text (formatting and auto-links
//! ignored), trimmed. Prefixes are case-sensitive.

use maud::{Markup, html};
use regex::Regex;
use std::sync::LazyLock;

pub const SLIDE_PREFIX: &str = "SLIDE:";
pub const COMPONENT_PREFIX: &str = "COMPONENT:";

/// Query string appended to rewritten slide URLs that carry none.
pub const SLIDE_DEFAULT_QUERY: &str = "start=false&loop=false&delayms=3000";

static SLIDES_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://docs\.google\.com/presentation/").expect("valid regex")
});

// `/edit` or `/view` as a whole path segment, plus everything after it.
static SLIDES_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:edit|view)(?:[/?#].*)?$").expect("valid regex"));

/// A recognized command and its trimmed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Slide(&'a str),
    Component(&'a str),
}

/// Recognize a command in a paragraph's plain text.
pub fn parse_command(plain: &str) -> Option<Command<'_>> {
    let text = plain.trim();
    if let Some(arg) = text.strip_prefix(SLIDE_PREFIX) {
        return Some(Command::Slide(arg.trim()));
    }
    if let Some(arg) = text.strip_prefix(COMPONENT_PREFIX) {
        return Some(Command::Component(arg.trim()));
    }
    None
}

/// Turn a presentation share link into its embeddable form.
///
/// - `…/edit…` or `…/view…` becomes `…/embed`
/// - if the result has no query string, [`SLIDE_DEFAULT_QUERY`] is inserted
///   before any `#fragment`
///
/// URLs from other hosts are returned unchanged. This never fails: a URL
/// that does not look like a share link is used as-is.
pub fn slide_embed_url(url: &str) -> String {
    let url = url.trim();
    if !SLIDES_HOST.is_match(url) {
        return url.to_string();
    }
    let embed = SLIDES_SUFFIX.replace(url, "/embed");
    let (base, fragment) = embed.split_at(embed.find('#').unwrap_or(embed.len()));
    if base.contains('?') {
        embed.into_owned()
    } else {
        format!("{base}?{SLIDE_DEFAULT_QUERY}{fragment}")
    }
}

/// Responsive 16:9 container around a full-screen capable iframe.
pub fn embed_container(src: &str) -> Markup {
    html! {
        div.embed-container style="position:relative;padding-bottom:56.25%;height:0;overflow:hidden;" {
            iframe
                src=(src)
                style="position:absolute;top:0;left:0;width:100%;height:100%;border:0;"
                frameborder="0"
                allowfullscreen="true"
                mozallowfullscreen="true"
                webkitallowfullscreen="true" {}
        }
    }
}

/// Visible diagnostic left in place of an unknown component.
pub fn missing_component(name: &str) -> String {
    // `--` may not appear inside an HTML comment.
    let mut safe = name.to_string();
    while safe.contains("--") {
        safe = safe.replace("--", "- -");
    }
    format!("<!-- component not found: {safe} -->")
}
