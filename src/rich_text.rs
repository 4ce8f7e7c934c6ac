//! Inline rich-text formatting.
//!
//! A rich-text value is an ordered list of [`TextSpan`]s. Each span becomes a
//! run of inline HTML; spans are concatenated with no separator.
//!
//! ## Tag Nesting
//!
//! Annotations are applied as nested wrappers in a fixed order, innermost
//! first, so the output is well-nested no matter which flags are set:
//!
//! ```text
//! code → strong → em → del → u → a
//! ```
//!
//! A span with every flag and a link renders as
//! `<a …><u><del><em><strong><code>text</code></strong></em></del></u></a>`.

use crate::types::TextSpan;
use maud::html;

/// Render spans to inline HTML.
///
/// With `escape` set, span text is HTML-escaped. Link targets are always
/// escaped since they land in an attribute.
pub fn to_html(spans: &[TextSpan], escape: bool) -> String {
    let mut out = String::new();
    for span in spans {
        out.push_str(&span_html(span, escape));
    }
    out
}

fn span_html(span: &TextSpan, escape: bool) -> String {
    let mut html = if escape {
        escape_html(&span.text)
    } else {
        span.text.clone()
    };

    let a = &span.annotations;
    if a.code {
        html = format!("<code>{html}</code>");
    }
    if a.bold {
        html = format!("<strong>{html}</strong>");
    }
    if a.italic {
        html = format!("<em>{html}</em>");
    }
    if a.strikethrough {
        html = format!("<del>{html}</del>");
    }
    if a.underline {
        html = format!("<u>{html}</u>");
    }
    if let Some(url) = &span.link {
        html = format!(
            r#"<a href="{}" target="_blank" rel="noopener">{html}</a>"#,
            escape_html(url)
        );
    }
    html
}

/// Concatenated literal text of all spans, formatting ignored.
pub fn plain_text(spans: &[TextSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// HTML-escape a string using maud's escaper.
pub(crate) fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}
