//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the project directory next to `components/` and `assets/`:
//!
//! ```text
//! project/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── components/              # Fragments for COMPONENT:<name>
//! │   └── footer.html
//! └── assets/                  # Copied verbatim to the output root
//!     └── favicon.ico
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! lang = "en"
//! title_suffix = ""          # Appended to every <title>
//! brand = ""                 # Sidebar heading
//! font_stylesheets = []      # Extra <link rel="stylesheet"> hrefs
//!
//! [source]
//! api_base = "https://api.notion.com/v1"
//! api_version = "2022-06-28"
//! token_env = "NOTION_API_KEY"
//! database_id_env = "NOTION_DATABASE_ID"
//! # database_id = "..."      # Takes priority over database_id_env
//! order_property = "Order"
//! slug_property = "Slug"
//! title_property = "Page Title"
//! subtitle_property = "Subtitle"
//! page_size = 100
//! timeout_secs = 30
//! max_retries = 3
//! parallel_fetch = false
//!
//! [render]
//! escape_html = true
//! heading_1 = true
//! divider = true
//! code = true
//! embed = true
//! callout_icon = "💡"
//! stylesheet = "linked"      # or "inline"
//!
//! [build]
//! on_error = "continue"      # or "abort"
//! # deadline_secs = 600
//!
//! [[nav]]                    # Omit to derive the sidebar from the pages
//! href = "index.html"
//! label = "Home"
//!
//! [colors.light]
//! background = "#ffffff"
//! # ...
//!
//! [processing]
//! max_processes = 4          # Parallel fetch workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::types::NavEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document chrome: language, title suffix, sidebar brand, fonts.
    pub site: SiteMeta,
    /// Content source connection and page property names.
    pub source: SourceConfig,
    /// Block rendering switches.
    pub render: RenderConfig,
    /// Failure policy and deadline for the whole run.
    pub build: BuildConfig,
    /// Explicit sidebar entries, in display order.
    pub nav: Vec<NavEntry>,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel fetch settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.source.page_size) {
            return Err(ConfigError::Validation(
                "source.page_size must be 1-100".into(),
            ));
        }
        if self.build.deadline_secs == Some(0) {
            return Err(ConfigError::Validation(
                "build.deadline_secs must be greater than 0".into(),
            ));
        }
        for (i, entry) in self.nav.iter().enumerate() {
            if entry.href.trim().is_empty() || entry.label.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "nav[{i}] needs a non-empty href and label"
                )));
            }
        }
        Ok(())
    }
}

/// Document chrome settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Value of `<html lang>`.
    pub lang: String,
    /// Appended verbatim to every page's `<title>`, e.g. `" | Essay Guide"`.
    pub title_suffix: String,
    /// Heading shown at the top of the sidebar. Empty hides it.
    pub brand: String,
    /// Additional stylesheet URLs (web fonts) linked before the site styles.
    pub font_stylesheets: Vec<String>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            title_suffix: String::new(),
            brand: String::new(),
            font_stylesheets: Vec::new(),
        }
    }
}

/// Content source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// REST API root.
    pub api_base: String,
    /// Value of the `Notion-Version` header.
    pub api_version: String,
    /// Environment variable holding the integration token.
    pub token_env: String,
    /// Database to list pages from. Takes priority over `database_id_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    /// Environment variable holding the database id.
    pub database_id_env: String,
    /// Number property pages are sorted by (ascending).
    pub order_property: String,
    /// Text property holding the output slug.
    pub slug_property: String,
    /// Text property holding the page title.
    pub title_property: String,
    /// Text property holding the page subtitle.
    pub subtitle_property: String,
    /// Results requested per paginated call (1-100).
    pub page_size: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries for rate-limited (HTTP 429) requests.
    pub max_retries: u32,
    /// Fetch sibling subtrees in parallel.
    pub parallel_fetch: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            token_env: "NOTION_API_KEY".to_string(),
            database_id: None,
            database_id_env: "NOTION_DATABASE_ID".to_string(),
            order_property: "Order".to_string(),
            slug_property: "Slug".to_string(),
            title_property: "Page Title".to_string(),
            subtitle_property: "Subtitle".to_string(),
            page_size: 100,
            timeout_secs: 30,
            max_retries: 3,
            parallel_fetch: false,
        }
    }
}

/// How the stylesheet reaches the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylesheetMode {
    /// `<link rel="stylesheet" href="styles.css">`, file written next to pages.
    #[default]
    Linked,
    /// `<style>` element in every page.
    Inline,
}

/// Block rendering switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Escape span text, code, title and subtitle. Attributes are always escaped.
    pub escape_html: bool,
    /// Render top-level headings. When off they render as nothing.
    pub heading_1: bool,
    /// Render dividers.
    pub divider: bool,
    /// Render code blocks.
    pub code: bool,
    /// Render embed blocks.
    pub embed: bool,
    /// Glyph for callouts without their own icon.
    pub callout_icon: String,
    pub stylesheet: StylesheetMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            escape_html: true,
            heading_1: true,
            divider: true,
            code: true,
            embed: true,
            callout_icon: "💡".to_string(),
            stylesheet: StylesheetMode::Linked,
        }
    }
}

/// What happens when one page's tree cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and move on to the next page.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    Abort,
}

/// Run-level build settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub on_error: ErrorPolicy,
    /// Whole-run deadline, checked before each page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel fetch workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Subtitles, captions, inactive sidebar links.
    pub text_muted: String,
    /// Border color (sidebar edge, dividers, callouts).
    pub border: String,
    /// Link color.
    pub link: String,
    /// Accent used for the active sidebar entry and the progress bar.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e5e5e5".to_string(),
            link: "#1d4ed8".to_string(),
            accent: "#8b1e2d".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111111".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#93c5fd".to_string(),
            accent: "#e0707e".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including arrays such as `nav`) replace
///   base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the project directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the project directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# blockpress Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Document chrome
# ---------------------------------------------------------------------------
[site]
# Value of <html lang>.
lang = "en"

# Appended to every page title, e.g. " | College Essay Guide".
title_suffix = ""

# Heading shown at the top of the sidebar (empty = none).
brand = ""

# Extra stylesheets (web fonts) linked before styles.css.
font_stylesheets = []

# ---------------------------------------------------------------------------
# Content source
# ---------------------------------------------------------------------------
[source]
api_base = "https://api.notion.com/v1"
api_version = "2022-06-28"

# Environment variable holding the integration token.
token_env = "NOTION_API_KEY"

# Database to build from. Set directly, or leave unset and export the
# variable named by database_id_env.
# database_id = "0123456789abcdef0123456789abcdef"
database_id_env = "NOTION_DATABASE_ID"

# Page properties. The order property is a number; the others are text.
order_property = "Order"
slug_property = "Slug"
title_property = "Page Title"
subtitle_property = "Subtitle"

# Results per paginated request (1-100).
page_size = 100

# Per-request timeout in seconds.
timeout_secs = 30

# Retries for rate-limited requests (HTTP 429), honoring Retry-After.
max_retries = 3

# Fetch nested blocks of sibling subtrees in parallel.
parallel_fetch = false

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Escape text from the source. Turn off only for fully trusted content.
escape_html = true

# Block types that can be switched off (they then render as nothing).
heading_1 = true
divider = true
code = true
embed = true

# Glyph for callouts that have no icon of their own.
callout_icon = "💡"

# "linked" writes styles.css next to the pages; "inline" embeds it.
stylesheet = "linked"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# "continue" records pages that fail to fetch and keeps going;
# "abort" stops the run at the first failure.
on_error = "continue"

# Give up on the whole run after this many seconds.
# deadline_secs = 600

# ---------------------------------------------------------------------------
# Sidebar navigation
# ---------------------------------------------------------------------------
# Without [[nav]] entries the sidebar lists every built page in order.
#
# [[nav]]
# href = "index.html"
# label = "Home"
#
# [[nav]]
# href = "mindset.html"
# label = "The Mindset Shift"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1a1a1a"
text_muted = "#666666"
border = "#e5e5e5"
link = "#1d4ed8"
accent = "#8b1e2d"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111111"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#93c5fd"
accent = "#e0707e"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel fetch workers when parallel_fetch is on.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_accent = colors.dark.accent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.lang, "en");
        assert_eq!(config.source.api_base, "https://api.notion.com/v1");
        assert_eq!(config.source.slug_property, "Slug");
        assert_eq!(config.source.page_size, 100);
        assert!(config.render.escape_html);
        assert_eq!(config.render.callout_icon, "💡");
        assert_eq!(config.render.stylesheet, StylesheetMode::Linked);
        assert_eq!(config.build.on_error, ErrorPolicy::Continue);
        assert!(config.nav.is_empty());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[render]
divider = false
stylesheet = "inline"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert!(!config.render.divider);
        assert_eq!(config.render.stylesheet, StylesheetMode::Inline);
        // Defaults preserved
        assert!(config.render.code);
        assert_eq!(config.source.timeout_secs, 30);
    }

    #[test]
    fn parse_nav_entries() {
        let toml = r#"
[[nav]]
href = "index.html"
label = "Home"
id = "index"

[[nav]]
href = "moves.html"
label = "The Six Moves"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.nav.len(), 2);
        assert_eq!(config.nav[1].label, "The Six Moves");
        assert_eq!(config.nav[1].id, "");
    }

    #[test]
    fn parse_error_policy() {
        let config: SiteConfig = toml::from_str("[build]\non_error = \"abort\"").unwrap();
        assert_eq!(config.build.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[render]\nemebd = false");
        assert!(result.is_err());
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.accent = "#ff0000".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-accent: #ff0000"));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.source.api_version, defaults.source.api_version);
        assert_eq!(config.render.callout_icon, defaults.render.callout_icon);
        assert_eq!(config.colors.dark.link, defaults.colors.dark.link);
        assert!(config.source.database_id.is_none());
        assert!(config.nav.is_empty());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = SiteConfig::default();
        config.source.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_page_size_out_of_range() {
        let mut config = SiteConfig::default();
        config.source.page_size = 101;
        assert!(config.validate().is_err());
        config.source.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_nav_entry() {
        let mut config = SiteConfig::default();
        config.nav.push(NavEntry {
            href: " ".to_string(),
            label: "Home".to_string(),
            id: String::new(),
        });
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("nav[0]"));
    }

    // =========================================================================
    // Merge and load
    // =========================================================================

    #[test]
    fn merge_toml_overrides_nested_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("list = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("list = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["list"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.source.title_property, "Page Title");
        assert_eq!(config.colors.dark.background, "#111111");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[site]
title_suffix = " | Essay Guide"

[source]
database_id = "db-123"
parallel_fetch = true

[colors.light]
accent = "#123456"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title_suffix, " | Essay Guide");
        assert_eq!(config.source.database_id.as_deref(), Some("db-123"));
        assert!(config.source.parallel_fetch);
        assert_eq!(config.colors.light.accent, "#123456");
        // Unspecified values should be defaults
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.source.order_property, "Order");
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[source]\npage_size = 500\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_rejects_bad_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[source\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 16),
        };
        assert_eq!(effective_threads(&config), cores);
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }
}
