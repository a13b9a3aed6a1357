use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use serde::Deserialize;

use super::types::ParsedEntry;

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("xml feed parse error: {0}")]
    Xml(#[from] feed_rs::parser::ParseFeedError),
    #[error("json feed parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct JsonFeed {
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonFeedItem {
    id: Option<serde_json::Value>,
    title: Option<String>,
    url: Option<String>,
    summary: Option<String>,
    date_published: Option<String>,
}

pub fn parse_feed_bytes(raw: &[u8]) -> Result<Vec<ParsedEntry>, FeedParseError> {
    let trimmed = raw.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    if trimmed[0] == b'{' {
        return parse_json_feed(trimmed);
    }
    parse_xml_feed(trimmed)
}

fn parse_xml_feed(raw: &[u8]) -> Result<Vec<ParsedEntry>, FeedParseError> {
    // An item without a guid must keep an empty id so identity falls back to its link.
    let parser = feed_rs::parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build();
    let feed = parser.parse(raw)?;

    Ok(feed.entries.iter().map(entry_from_xml).collect())
}

fn parse_json_feed(raw: &[u8]) -> Result<Vec<ParsedEntry>, FeedParseError> {
    let feed: JsonFeed = serde_json::from_slice(raw)?;
    let entries = feed
        .items
        .into_iter()
        .map(|item| ParsedEntry {
            // JSON Feed ids should be strings; numeric ones show up in the wild
            id: item.id.and_then(|value| match value {
                serde_json::Value::String(text) => non_empty(text),
                serde_json::Value::Number(number) => Some(number.to_string()),
                _ => None,
            }),
            title: item.title,
            link: item.url,
            summary: item.summary,
            published: item.date_published.as_deref().and_then(parse_timestamp),
        })
        .collect();

    Ok(entries)
}

fn entry_from_xml(entry: &Entry) -> ParsedEntry {
    let title = entry.title.as_ref().map(|text| text.content.clone());
    let link = entry.links.first().map(|entry_link| entry_link.href.clone());
    let summary = entry.summary.as_ref().map(|text| text.content.clone());

    ParsedEntry {
        id: non_empty(entry.id.clone()),
        title,
        link,
        summary,
        published: entry.published,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
