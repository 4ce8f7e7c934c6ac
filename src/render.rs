//! Block-tree rendering.
//!
//! Two layers:
//!
//! - [`Renderer::render_block`] turns one node (and, for containers, its
//!   children) into a block-level fragment. It never looks at siblings.
//! - [`Renderer::render_siblings`] folds an ordered sibling list into one
//!   fragment and owns list grouping: consecutive `bullet_item`s share one
//!   `<ul>`, consecutive `number_item`s share one `<ol>`.
//!
//! Children of every container are rendered with `render_siblings`, so a
//! callout holding lists, quotes or further callouts renders exactly like a
//! page body at any depth. The list state lives in a [`ListFold`] local to
//! one `render_siblings` call, which keeps independent subtrees reentrant.
//!
//! ## Per-type Output
//!
//! | Node | HTML |
//! |------|------|
//! | paragraph | `<p>…</p>`, dropped when empty; may be a magic command |
//! | heading (1–3) | `<h1>`–`<h3>`, always emitted |
//! | bullet / number item | `<li>…</li>` inside a grouped `<ul>`/`<ol>` |
//! | quote | `<blockquote>…</blockquote>` |
//! | divider | `<hr>` |
//! | code | `<pre><code class="language-…">…</code></pre>` |
//! | callout | icon + text + rendered children in `.callout-content` |
//! | image | `<figure><img><figcaption></figcaption></figure>` |
//! | embed | responsive iframe container |
//! | anything else | nothing |

use crate::components::ComponentLookup;
use crate::config::RenderConfig;
use crate::magic::{self, Command};
use crate::rich_text;
use crate::types::{Block, ContentNode, TextSpan};
use maud::{Markup, PreEscaped, html};
use tracing::{debug, warn};

/// Renders content trees with a fixed configuration and component store.
pub struct Renderer<'a> {
    config: &'a RenderConfig,
    components: &'a dyn ComponentLookup,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a RenderConfig, components: &'a dyn ComponentLookup) -> Self {
        Self { config, components }
    }

    /// Render an ordered sibling sequence, grouping list runs.
    pub fn render_siblings(&self, nodes: &[ContentNode]) -> Markup {
        let mut fold = ListFold::default();
        for node in nodes {
            match &node.block {
                Block::BulletItem { .. } => {
                    fold.push_item(ListKind::Unordered, self.render_block(node))
                }
                Block::NumberItem { .. } => {
                    fold.push_item(ListKind::Ordered, self.render_block(node))
                }
                _ => fold.push_block(self.render_block(node)),
            }
        }
        PreEscaped(fold.finish())
    }

    /// Render a single node. List wrappers are not emitted here.
    pub fn render_block(&self, node: &ContentNode) -> Markup {
        let escape = self.config.escape_html;
        match &node.block {
            Block::Paragraph { text } => self.render_paragraph(node, text),
            Block::Heading { level, text } => {
                let inline = PreEscaped(rich_text::to_html(text, escape));
                match level {
                    1 if self.config.heading_1 => html! { h1 { (inline) } },
                    2 => html! { h2 { (inline) } },
                    3 => html! { h3 { (inline) } },
                    _ => self.skip(node),
                }
            }
            Block::BulletItem { text } | Block::NumberItem { text } => html! {
                li {
                    (PreEscaped(rich_text::to_html(text, escape)))
                    (self.render_children(node))
                }
            },
            Block::Quote { text } => html! {
                blockquote {
                    (PreEscaped(rich_text::to_html(text, escape)))
                    (self.render_children(node))
                }
            },
            Block::Divider if self.config.divider => html! { hr; },
            Block::Code { language, text } if self.config.code => {
                let lang = language.as_deref().unwrap_or("");
                let source = rich_text::plain_text(text);
                html! {
                    pre {
                        code class={ "language-" (lang) } {
                            @if escape { (source) } @else { (PreEscaped(source)) }
                        }
                    }
                }
            }
            Block::Callout { icon, text } => {
                let icon = icon.as_deref().unwrap_or(&self.config.callout_icon);
                html! {
                    div.callout {
                        span.callout-icon { (icon) }
                        div.callout-content {
                            (PreEscaped(rich_text::to_html(text, escape)))
                            (self.render_children(node))
                        }
                    }
                }
            }
            Block::Image { source, caption } => {
                let caption_html = rich_text::to_html(caption, escape);
                let alt = rich_text::plain_text(caption);
                html! {
                    figure {
                        img src=(source.url()) alt=(alt);
                        @if !caption_html.is_empty() {
                            figcaption { (PreEscaped(caption_html)) }
                        }
                    }
                }
            }
            Block::Embed { url } if self.config.embed => magic::embed_container(url),
            _ => self.skip(node),
        }
    }

    fn render_paragraph(&self, node: &ContentNode, text: &[TextSpan]) -> Markup {
        let lead = match magic::parse_command(&rich_text::plain_text(text)) {
            Some(command) => self.run_command(command),
            None => {
                let inline = rich_text::to_html(text, self.config.escape_html);
                html! {
                    @if !inline.is_empty() {
                        p { (PreEscaped(inline)) }
                    }
                }
            }
        };
        let children = self.render_children(node);
        html! {
            (lead)
            @if !children.0.is_empty() {
                div.indented { (children) }
            }
        }
    }

    fn run_command(&self, command: Command<'_>) -> Markup {
        match command {
            Command::Slide(url) if url.is_empty() => {
                warn!("SLIDE command without a URL");
                html! {}
            }
            Command::Slide(url) => magic::embed_container(&magic::slide_embed_url(url)),
            Command::Component(name) => match self.components.lookup(name) {
                Some(fragment) => PreEscaped(fragment.to_string()),
                None => {
                    warn!("component not found: {name}");
                    PreEscaped(magic::missing_component(name))
                }
            },
        }
    }

    fn render_children(&self, node: &ContentNode) -> Markup {
        if node.children.is_empty() {
            return html! {};
        }
        self.render_siblings(&node.children)
    }

    fn skip(&self, node: &ContentNode) -> Markup {
        debug!("skipping {} node {}", node.kind(), node.id);
        html! {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "<ul>",
            ListKind::Ordered => "<ol>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "</ul>",
            ListKind::Ordered => "</ol>",
        }
    }
}

/// Accumulator for one sibling sequence.
///
/// Block fragments are kept as separate chunks joined by newlines; a list
/// and all of its items form a single chunk.
#[derive(Debug, Default)]
struct ListFold {
    open: Option<ListKind>,
    chunks: Vec<String>,
}

impl ListFold {
    fn push_block(&mut self, block: Markup) {
        self.close_list();
        let block = block.into_string();
        if !block.is_empty() {
            self.chunks.push(block);
        }
    }

    fn push_item(&mut self, kind: ListKind, item: Markup) {
        if self.open != Some(kind) {
            self.close_list();
            self.chunks.push(kind.open_tag().to_string());
            self.open = Some(kind);
        }
        if let Some(chunk) = self.chunks.last_mut() {
            chunk.push_str(&item.into_string());
        }
    }

    fn close_list(&mut self) {
        let Some(kind) = self.open.take() else {
            return;
        };
        if let Some(chunk) = self.chunks.last_mut() {
            chunk.push_str(kind.close_tag());
        }
    }

    fn finish(mut self) -> String {
        self.close_list();
        self.chunks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentStore;
    use crate::test_helpers::*;
    use crate::types::{Annotations, ImageSource};
    use pretty_assertions::assert_eq;

    fn render(nodes: &[ContentNode]) -> String {
        let config = RenderConfig::default();
        let components = ComponentStore::new();
        Renderer::new(&config, &components)
            .render_siblings(nodes)
            .into_string()
    }

    fn render_with(config: &RenderConfig, nodes: &[ContentNode]) -> String {
        let components = ComponentStore::new();
        Renderer::new(config, &components)
            .render_siblings(nodes)
            .into_string()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    // =========================================================================
    // Single blocks
    // =========================================================================

    #[test]
    fn paragraph_wraps_text() {
        assert_eq!(render(&[paragraph("p1", "Hello")]), "<p>Hello</p>");
    }

    #[test]
    fn empty_paragraph_is_dropped() {
        assert_eq!(render(&[paragraph("p1", "")]), "");
        let nodes = vec![paragraph("a", "One"), paragraph("b", ""), paragraph("c", "Two")];
        assert_eq!(render(&nodes), "<p>One</p>\n<p>Two</p>");
    }

    #[test]
    fn headings_always_emit_tags() {
        let nodes = vec![heading("h1", 1, ""), heading("h2", 2, "Two"), heading("h3", 3, "Three")];
        assert_eq!(render(&nodes), "<h1></h1>\n<h2>Two</h2>\n<h3>Three</h3>");
    }

    #[test]
    fn heading_1_can_be_disabled() {
        let config = RenderConfig {
            heading_1: false,
            ..Default::default()
        };
        assert_eq!(render_with(&config, &[heading("h", 1, "Top")]), "");
    }

    #[test]
    fn quote_and_divider() {
        let nodes = vec![quote("q", "Wise words"), divider("d")];
        assert_eq!(render(&nodes), "<blockquote>Wise words</blockquote>\n<hr>");
    }

    #[test]
    fn code_block_uses_language_class() {
        let html = render(&[code("c", Some("rust"), "fn main() {}")]);
        assert_eq!(
            html,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn code_block_without_language() {
        let html = render(&[code("c", None, "x")]);
        assert_eq!(html, r#"<pre><code class="language-">x</code></pre>"#);
    }

    #[test]
    fn code_block_text_ignores_annotations_and_escapes() {
        let bold = Annotations {
            bold: true,
            ..Default::default()
        };
        let node = node(
            "c",
            Block::Code {
                language: Some("html".into()),
                text: vec![styled("<b>", bold), span("x")],
            },
        );
        assert_eq!(
            render(&[node]),
            r#"<pre><code class="language-html">&lt;b&gt;x</code></pre>"#
        );
    }

    #[test]
    fn code_block_raw_when_escaping_disabled() {
        let config = RenderConfig {
            escape_html: false,
            ..Default::default()
        };
        let html = render_with(&config, &[code("c", None, "<br>")]);
        assert_eq!(html, r#"<pre><code class="language-"><br></code></pre>"#);
    }

    #[test]
    fn disabled_types_render_nothing() {
        let config = RenderConfig {
            divider: false,
            code: false,
            embed: false,
            ..Default::default()
        };
        let nodes = vec![
            divider("d"),
            code("c", None, "x"),
            embed("e", "https://example.com"),
        ];
        assert_eq!(render_with(&config, &nodes), "");
    }

    #[test]
    fn unknown_type_renders_nothing() {
        let nodes = vec![paragraph("a", "Before"), node("u", Block::Unsupported), paragraph("b", "After")];
        assert_eq!(render(&nodes), "<p>Before</p>\n<p>After</p>");
    }

    #[test]
    fn image_with_hosted_source_and_caption() {
        let html = render(&[image(
            "i",
            ImageSource::Hosted {
                url: "https://files.example.com/d1.png".into(),
            },
            "Diagram 1",
        )]);
        assert_eq!(
            html,
            r#"<figure><img src="https://files.example.com/d1.png" alt="Diagram 1"><figcaption>Diagram 1</figcaption></figure>"#
        );
    }

    #[test]
    fn image_with_external_source_without_caption() {
        let html = render(&[image(
            "i",
            ImageSource::External {
                url: "https://cdn.example.com/a.jpg".into(),
            },
            "",
        )]);
        assert!(html.contains(r#"src="https://cdn.example.com/a.jpg""#));
        assert!(html.contains(r#"alt="""#));
        assert!(!html.contains("figcaption"));
    }

    #[test]
    fn embed_uses_url_unmodified() {
        let url = "https://docs.google.com/presentation/d/XYZ/edit";
        let html = render(&[embed("e", url)]);
        assert!(html.contains(&format!(r#"src="{url}""#)));
        assert!(html.contains("embed-container"));
    }

    #[test]
    fn callout_uses_default_icon() {
        let html = render(&[callout("c", None, "Note this", vec![])]);
        assert_eq!(
            html,
            r#"<div class="callout"><span class="callout-icon">💡</span><div class="callout-content">Note this</div></div>"#
        );
    }

    #[test]
    fn callout_uses_own_icon() {
        let html = render(&[callout("c", Some("⚠️"), "Careful", vec![])]);
        assert!(html.contains(r#"<span class="callout-icon">⚠️</span>"#));
    }

    #[test]
    fn callout_with_mixed_list_children() {
        let html = render(&[callout(
            "c",
            None,
            "Steps",
            vec![bullet("b", "First"), number("n", "Second")],
        )]);
        assert_eq!(
            html,
            "<div class=\"callout\"><span class=\"callout-icon\">💡</span><div class=\"callout-content\">Steps\
             <ul><li>First</li></ul>\n<ol><li>Second</li></ol></div></div>"
        );
    }

    #[test]
    fn nested_callouts_render_recursively() {
        let inner = callout("inner", Some("📌"), "Inner", vec![quote("q", "Deep")]);
        let html = render(&[callout("outer", None, "Outer", vec![inner])]);
        assert_eq!(count(&html, r#"class="callout""#), 2);
        assert!(html.contains("<blockquote>Deep</blockquote>"));
    }

    #[test]
    fn list_item_children_nest_lists() {
        let mut item = bullet("b1", "Parent");
        item.has_children = true;
        item.children = vec![bullet("b2", "Child A"), bullet("b3", "Child B")];
        let html = render(&[item]);
        assert_eq!(
            html,
            "<ul><li>Parent<ul><li>Child A</li><li>Child B</li></ul></li></ul>"
        );
    }

    // =========================================================================
    // Magic commands
    // =========================================================================

    #[test]
    fn slide_command_renders_embed() {
        let html = render(&[paragraph(
            "p",
            "SLIDE:https://docs.google.com/presentation/d/XYZ/edit",
        )]);
        assert!(!html.contains("<p>"));
        let src = html
            .split(r#"src=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap()
            .replace("&amp;", "&");
        assert!(src.ends_with("/embed?start=false&loop=false&delayms=3000"));
    }

    #[test]
    fn slide_command_ignores_formatting_and_links() {
        let url = "https://docs.google.com/presentation/d/XYZ/view";
        let bold = Annotations {
            bold: true,
            ..Default::default()
        };
        let node = node(
            "p",
            Block::Paragraph {
                text: vec![styled("SLIDE: ", bold), linked(url, url)],
            },
        );
        let html = render(&[node]);
        assert!(html.contains("/d/XYZ/embed?start=false"));
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn slide_command_without_url_renders_nothing() {
        assert_eq!(render(&[paragraph("p", "SLIDE:   ")]), "");
    }

    #[test]
    fn component_command_splices_fragment() {
        let config = RenderConfig::default();
        let mut components = ComponentStore::new();
        components.insert("footer", "<footer>Contact us</footer>");
        let html = Renderer::new(&config, &components)
            .render_siblings(&[paragraph("p", "  COMPONENT: footer ")])
            .into_string();
        assert_eq!(html, "<footer>Contact us</footer>");
    }

    #[test]
    fn command_paragraph_keeps_its_children() {
        let config = RenderConfig::default();
        let mut components = ComponentStore::new();
        components.insert("footer", "<footer>Contact us</footer>");
        let mut para = paragraph("p", "COMPONENT:footer");
        para.has_children = true;
        para.children = vec![paragraph("c", "Below")];
        let html = Renderer::new(&config, &components)
            .render_siblings(&[para])
            .into_string();
        assert_eq!(
            html,
            r#"<footer>Contact us</footer><div class="indented"><p>Below</p></div>"#
        );
    }

    #[test]
    fn missing_component_leaves_comment() {
        let html = render(&[paragraph("p", "COMPONENT:footer")]);
        assert!(html.starts_with("<!--"));
        assert!(html.contains("footer"));
        assert!(!html.contains("<p>"));
    }

    // =========================================================================
    // List grouping
    // =========================================================================

    #[test]
    fn consecutive_items_share_one_list() {
        let nodes = vec![bullet("a", "A"), bullet("b", "B"), bullet("c", "C")];
        assert_eq!(render(&nodes), "<ul><li>A</li><li>B</li><li>C</li></ul>");
    }

    #[test]
    fn switching_kind_closes_previous_list() {
        let nodes = vec![bullet("a", "A"), number("b", "B"), number("c", "C"), bullet("d", "D")];
        assert_eq!(
            render(&nodes),
            "<ul><li>A</li></ul>\n<ol><li>B</li><li>C</li></ol>\n<ul><li>D</li></ul>"
        );
    }

    #[test]
    fn non_list_block_closes_list() {
        let nodes = vec![
            number("a", "One"),
            paragraph("p", "Interlude"),
            number("b", "Two"),
        ];
        assert_eq!(
            render(&nodes),
            "<ol><li>One</li></ol>\n<p>Interlude</p>\n<ol><li>Two</li></ol>"
        );
    }

    #[test]
    fn empty_paragraph_still_breaks_list() {
        let nodes = vec![bullet("a", "A"), paragraph("p", ""), bullet("b", "B")];
        assert_eq!(render(&nodes), "<ul><li>A</li></ul>\n<ul><li>B</li></ul>");
    }

    #[test]
    fn list_at_end_is_closed() {
        let html = render(&[paragraph("p", "Intro"), bullet("a", "A")]);
        assert_eq!(html, "<p>Intro</p>\n<ul><li>A</li></ul>");
    }

    #[test]
    fn list_tags_balance_for_mixed_sequences() {
        let nodes = vec![
            bullet("1", "a"),
            number("2", "b"),
            divider("3"),
            number("4", "c"),
            number("5", "d"),
            bullet("6", "e"),
            quote("7", "f"),
            bullet("8", "g"),
        ];
        let html = render(&nodes);
        assert_eq!(count(&html, "<ul>"), count(&html, "</ul>"));
        assert_eq!(count(&html, "<ol>"), count(&html, "</ol>"));
        assert!(!html.contains("</ol><ol>"));
        assert!(!html.contains("</ul><ul>"));
        assert_eq!(count(&html, "<ol>"), 2);
        assert_eq!(count(&html, "<ul>"), 3);
    }

    #[test]
    fn nested_list_state_is_independent() {
        // An open list in the parent sequence is not closed by the callout's
        // own children, and the callout's lists are closed inside it.
        let nodes = vec![
            bullet("a", "A"),
            callout("c", None, "", vec![number("n", "N")]),
            bullet("b", "B"),
        ];
        let html = render(&nodes);
        assert_eq!(
            html,
            "<ul><li>A</li></ul>\n<div class=\"callout\"><span class=\"callout-icon\">💡</span>\
             <div class=\"callout-content\"><ol><li>N</li></ol></div></div>\n<ul><li>B</li></ul>"
        );
    }
}
