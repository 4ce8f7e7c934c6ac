//! # Blockpress
//!
//! A static site generator for content kept in a hosted block database.
//! Each database row is a page; each page's block tree becomes one HTML
//! document with a shared sidebar, stylesheet and navigation script.
//!
//! # Architecture: One Pass Per Page
//!
//! ```text
//! list pages → for each page: fetch tree → render body → assemble → persist
//! ```
//!
//! Pages are independent. One page failing to fetch never touches the
//! documents of the others, and nothing is written for a page until its
//! whole tree has been fetched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Content model: nodes, blocks, text spans, page records |
//! | [`source`] | `ContentSource` capability, tree fetching, JSON snapshots |
//! | [`notion`] | HTTP client for the remote database and block API |
//! | [`rich_text`] | Styled spans → inline HTML |
//! | [`magic`] | `SLIDE:` and `COMPONENT:` paragraph commands |
//! | [`components`] | Named HTML fragments loaded from the project |
//! | [`render`] | Block tree → HTML body, including list grouping |
//! | [`naming`] | Slug → output document name |
//! | [`generate`] | Page chrome, sidebar, sinks and the build orchestrator |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting of build results |
//!
//! # Design Decisions
//!
//! ## Sources Are Swappable
//!
//! The orchestrator only sees the [`source::ContentSource`] trait. The live
//! API client and the offline [`source::SnapshotSource`] are interchangeable,
//! so a captured snapshot rebuilds the exact same site without a network.
//!
//! ## Maud For Markup
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Attribute values
//! are always escaped. Text content is escaped unless `render.escape_html`
//! is turned off, which exists only for sources that store trusted markup in
//! their text.
//!
//! ## Static Sidebar
//!
//! The sidebar is rendered into every document, with the active entry chosen
//! from the document's own name. The shipped script only toggles the mobile
//! menu and drives the reading progress bar.

pub mod components;
pub mod config;
pub mod generate;
pub mod magic;
pub mod naming;
pub mod notion;
pub mod output;
pub mod render;
pub mod rich_text;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
