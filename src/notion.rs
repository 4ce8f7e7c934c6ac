//! Notion REST API client.
//!
//! Blocking HTTP client implementing [`ContentSource`] on top of two
//! endpoints:
//!
//! - `POST /databases/{id}/query` for page records, sorted ascending by the
//!   configured order property
//! - `GET /blocks/{id}/children` for one slice of a node's children
//!
//! Both are cursor-paginated. Wire objects are translated into the crate's
//! own [`ContentNode`] / [`PageRecord`] model here and nowhere else; block
//! types outside the supported vocabulary become [`Block::Unsupported`].

use crate::config::SourceConfig;
use crate::source::{ChildPage, ContentSource, SourceError};
use crate::types::{Annotations, Block, ContentNode, ImageSource, PageRecord, TextSpan};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::env;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::Agent;
use ureq::http::Response;

/// Wait used when a 429 response carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Page property names read from each database row.
#[derive(Debug, Clone)]
struct PropertyNames {
    order: String,
    slug: String,
    title: String,
    subtitle: String,
}

/// Notion API client.
pub struct NotionClient {
    agent: Agent,
    api_base: String,
    api_version: String,
    auth_header: String,
    database_id: String,
    properties: PropertyNames,
    page_size: u32,
    max_retries: u32,
}

impl NotionClient {
    /// Create a client from config, reading credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingCredential`] when the token variable is
    /// unset, or when neither `database_id` nor its variable is set.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        let token = non_empty_env(&config.token_env)
            .ok_or_else(|| SourceError::MissingCredential(config.token_env.clone()))?;
        let database_id = config
            .database_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| non_empty_env(&config.database_id_env))
            .ok_or_else(|| SourceError::MissingCredential(config.database_id_env.clone()))?;
        Ok(Self::new(config, &token, &database_id))
    }

    /// Create a client with explicit credentials.
    pub fn new(config: &SourceConfig, token: &str, database_id: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            api_version: config.api_version.clone(),
            auth_header: format!("Bearer {token}"),
            database_id: database_id.trim().to_owned(),
            properties: PropertyNames {
                order: config.order_property.clone(),
                slug: config.slug_property.clone(),
                title: config.title_property.clone(),
                subtitle: config.subtitle_property.clone(),
            },
            page_size: config.page_size,
            max_retries: config.max_retries,
        }
    }

    /// Send a request, retrying on 429, and decode the JSON body.
    fn execute<T: DeserializeOwned>(
        &self,
        what: &str,
        send: impl Fn() -> Result<Response<ureq::Body>, ureq::Error>,
    ) -> Result<T, SourceError> {
        let mut attempt = 0;
        loop {
            let response = send()?;
            let status = response.status().as_u16();

            if status == 429 && attempt < self.max_retries {
                let wait = retry_after(&response);
                attempt += 1;
                warn!(
                    "rate limited on {what}, retry {attempt}/{} in {}s",
                    self.max_retries,
                    wait.as_secs()
                );
                thread::sleep(wait);
                continue;
            }

            let mut body = response.into_body();
            if status >= 400 {
                let error_body = body
                    .read_to_string()
                    .unwrap_or_else(|_| "(unable to read error body)".to_owned());
                return Err(SourceError::HttpResponse {
                    status,
                    body: error_body,
                });
            }
            return Ok(body.read_json()?);
        }
    }
}

impl ContentSource for NotionClient {
    fn list_pages(&self) -> Result<Vec<PageRecord>, SourceError> {
        let url = format!("{}/databases/{}/query", self.api_base, self.database_id);
        info!("Querying database {}", self.database_id);

        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut body = json!({
                "page_size": self.page_size,
                "sorts": [{ "property": self.properties.order, "direction": "ascending" }],
            });
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }

            let response: Value = self.execute("database query", || {
                self.agent
                    .post(&url)
                    .header("Authorization", &self.auth_header)
                    .header("Notion-Version", &self.api_version)
                    .send_json(&body)
            })?;
            let (results, next) = parse_list(response)?;
            for row in results {
                pages.push(parse_page(row, &self.properties)?);
            }
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!("Found {} pages", pages.len());
        Ok(pages)
    }

    fn list_children(
        &self,
        node_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildPage, SourceError> {
        let url = format!("{}/blocks/{}/children", self.api_base, node_id);
        debug!("Listing children of {node_id} (cursor {cursor:?})");

        let page_size = self.page_size.to_string();
        let response: Value = self.execute("block children", || {
            let mut request = self
                .agent
                .get(&url)
                .header("Authorization", &self.auth_header)
                .header("Notion-Version", &self.api_version)
                .query("page_size", &page_size);
            if let Some(c) = cursor {
                request = request.query("start_cursor", c);
            }
            request.call()
        })?;
        parse_children(response)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn retry_after(response: &Response<ureq::Body>) -> Duration {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireList {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Split a paginated list response into results and the next cursor.
fn parse_list(response: Value) -> Result<(Vec<Value>, Option<String>), SourceError> {
    let list: WireList = serde_json::from_value(response)?;
    let next = match (list.has_more, list.next_cursor) {
        (true, Some(cursor)) => Some(cursor),
        (true, None) => {
            return Err(SourceError::Protocol(
                "has_more set without next_cursor".into(),
            ));
        }
        (false, _) => None,
    };
    Ok((list.results, next))
}

pub(crate) fn parse_children(response: Value) -> Result<ChildPage, SourceError> {
    let (results, next_cursor) = parse_list(response)?;
    let nodes = results
        .into_iter()
        .map(parse_block)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ChildPage { nodes, next_cursor })
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    /// Holds the payload object keyed by `kind`, plus metadata we ignore.
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WireSpan {
    #[serde(default)]
    plain_text: String,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    annotations: Annotations,
}

impl From<WireSpan> for TextSpan {
    fn from(span: WireSpan) -> Self {
        TextSpan {
            text: span.plain_text,
            annotations: span.annotations,
            link: span.href,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireText {
    #[serde(default)]
    rich_text: Vec<WireSpan>,
}

#[derive(Debug, Deserialize)]
struct WireCode {
    #[serde(default)]
    rich_text: Vec<WireSpan>,
    #[serde(default)]
    language: String,
}

#[derive(Debug, Deserialize)]
struct WireCallout {
    #[serde(default)]
    rich_text: Vec<WireSpan>,
    #[serde(default)]
    icon: Option<WireIcon>,
}

#[derive(Debug, Deserialize)]
struct WireIcon {
    #[serde(default)]
    emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    external: Option<WireUrl>,
    #[serde(default)]
    file: Option<WireUrl>,
    #[serde(default)]
    caption: Vec<WireSpan>,
}

fn spans(wire: Vec<WireSpan>) -> Vec<TextSpan> {
    wire.into_iter().map(TextSpan::from).collect()
}

fn parse_block(value: Value) -> Result<ContentNode, SourceError> {
    let mut wire: WireBlock = serde_json::from_value(value)?;
    let payload = wire.rest.remove(&wire.kind).unwrap_or(Value::Null);
    let block = match convert_block(&wire.kind, payload) {
        Ok(block) => block,
        Err(err) => {
            warn!("unreadable {} block {}: {err}", wire.kind, wire.id);
            Block::Unsupported
        }
    };
    Ok(ContentNode {
        id: wire.id,
        block,
        has_children: wire.has_children,
        children: Vec::new(),
    })
}

fn convert_block(kind: &str, payload: Value) -> Result<Block, serde_json::Error> {
    let text = |payload: Value| -> Result<Vec<TextSpan>, serde_json::Error> {
        let wire: WireText = serde_json::from_value(payload)?;
        Ok(spans(wire.rich_text))
    };

    Ok(match kind {
        "paragraph" => Block::Paragraph {
            text: text(payload)?,
        },
        "heading_1" | "heading_2" | "heading_3" => Block::Heading {
            level: kind[kind.len() - 1..].parse().unwrap_or(3),
            text: text(payload)?,
        },
        "bulleted_list_item" => Block::BulletItem {
            text: text(payload)?,
        },
        "numbered_list_item" => Block::NumberItem {
            text: text(payload)?,
        },
        "quote" => Block::Quote {
            text: text(payload)?,
        },
        "divider" => Block::Divider,
        "code" => {
            let code: WireCode = serde_json::from_value(payload)?;
            Block::Code {
                language: Some(code.language).filter(|l| !l.is_empty()),
                text: spans(code.rich_text),
            }
        }
        "callout" => {
            let callout: WireCallout = serde_json::from_value(payload)?;
            Block::Callout {
                icon: callout.icon.and_then(|i| i.emoji),
                text: spans(callout.rich_text),
            }
        }
        "image" => {
            let image: WireImage = serde_json::from_value(payload)?;
            let source = match (image.kind.as_str(), image.external, image.file) {
                ("external", Some(ext), _) => ImageSource::External { url: ext.url },
                (_, _, Some(file)) => ImageSource::Hosted { url: file.url },
                (_, Some(ext), None) => ImageSource::External { url: ext.url },
                _ => {
                    warn!("image block without a URL");
                    return Ok(Block::Unsupported);
                }
            };
            Block::Image {
                source,
                caption: spans(image.caption),
            }
        }
        "embed" => {
            let embed: WireUrl = serde_json::from_value(payload)?;
            Block::Embed { url: embed.url }
        }
        other => {
            debug!("unsupported block type {other}");
            Block::Unsupported
        }
    })
}

fn parse_page(value: Value, names: &PropertyNames) -> Result<PageRecord, SourceError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| SourceError::Protocol("page without id".into()))?
        .to_owned();
    let empty = Map::new();
    let props = value
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    Ok(PageRecord {
        id,
        order: props
            .get(&names.order)
            .and_then(|p| p.get("number"))
            .and_then(Value::as_f64),
        slug: property_text(props, &names.slug),
        title: property_text(props, &names.title),
        subtitle: property_text(props, &names.subtitle),
    })
}

/// Plain text of a text-like property (`rich_text`, `title`, `url`, ...).
fn property_text(props: &Map<String, Value>, name: &str) -> String {
    let Some(prop) = props.get(name) else {
        return String::new();
    };
    let kind = prop.get("type").and_then(Value::as_str).unwrap_or_default();
    match prop.get(kind) {
        Some(Value::Array(spans)) => spans
            .iter()
            .filter_map(|s| s.get("plain_text").and_then(Value::as_str))
            .collect(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}
