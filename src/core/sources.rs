use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_FEEDS: &[&str] = &[
    "https://feeds.arstechnica.com/arstechnica/index",
    "https://www.theverge.com/rss/index.xml",
    "https://www.wired.com/feed/rss",
    "https://www.sciencealert.com/feed",
    "https://www.nasa.gov/news-release/feed/",
    "https://www.popsci.com/arcio/rss/",
    "https://www.techradar.com/feeds/articletype/news",
    "https://feeds.feedburner.com/TechCrunch/",
    "https://www.space.com/feeds/all",
    "https://interestingengineering.com/rss",
    "https://www.livescience.com/feeds/all",
];

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "AI",
    "yapay zeka",
    "artificial intelligence",
    "bilim",
    "science",
    "uzay",
    "space",
    "roket",
    "SpaceX",
    "NASA",
    "kuantum",
    "quantum",
    "oyun",
    "game",
    "Steam",
    "PlayStation",
    "Nvidia",
    "AMD",
    "Intel",
    "Android",
    "iOS",
    "robot",
    "keşif",
    "discovery",
    "buluş",
    "gelişme",
];

#[derive(Debug, thiserror::Error)]
pub enum SourceListError {
    #[error("invalid OPML content: {0}")]
    Opml(String),
    #[error("invalid JSON feed list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read feed list: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum JsonSourceItem {
    Url(String),
    Object { feed_url: String },
}

pub fn default_feeds() -> Vec<String> {
    DEFAULT_FEEDS.iter().map(ToString::to_string).collect()
}

/// Loads feed URLs from a file. The format follows the extension: `.opml`
/// and `.xml` are OPML, `.json` is a JSON list, anything else is one URL
/// per line.
pub fn load_feed_list(path: &Path) -> Result<Vec<String>, SourceListError> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase);
    let urls = match extension.as_deref() {
        Some("opml" | "xml") => parse_opml(&content)?,
        Some("json") => parse_json_sources(&content)?,
        _ => parse_url_list(&content),
    };
    Ok(dedup_feed_urls(urls))
}

pub fn parse_opml(opml_content: &str) -> Result<Vec<String>, SourceListError> {
    let doc = roxmltree::Document::parse(opml_content)
        .map_err(|error| SourceListError::Opml(error.to_string()))?;

    let urls = doc
        .descendants()
        .filter(|node| node.has_tag_name("outline"))
        .filter_map(|node| node.attribute("xmlUrl"))
        .map(str::trim)
        .filter(|feed_url| !feed_url.is_empty())
        .map(ToString::to_string)
        .collect();
    Ok(urls)
}

pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(ToString::to_string)
        .collect()
}

pub fn parse_json_sources(input: &str) -> Result<Vec<String>, SourceListError> {
    let items: Vec<JsonSourceItem> = serde_json::from_str(input)?;
    let urls = items
        .into_iter()
        .map(|item| match item {
            JsonSourceItem::Url(feed_url) | JsonSourceItem::Object { feed_url } => feed_url,
        })
        .filter(|feed_url| !feed_url.trim().is_empty())
        .collect();
    Ok(urls)
}

/// Drops repeated feeds, keeping the first spelling of each URL.
pub fn dedup_feed_urls(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(normalize_url(url)))
        .collect()
}

pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}
