use chrono::{DateTime, FixedOffset, Utc};
use html_escape::encode_text;

const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Builds the HTML-mode message text. Telegram rejects a bare `<` or `&`,
/// so the title and link are escaped.
pub fn format_message(title: &str, link: &str, source: &str, published: Option<&str>) -> String {
    let mut message = format!("📰 <b>{}</b>\n🌍 {source}", encode_text(title));
    if let Some(published) = published.filter(|value| !value.is_empty()) {
        message.push_str(&format!(" | 🕒 {published}"));
    }
    message.push_str(&format!("\n🔗 {}", encode_text(link)));
    message
}

/// Renders `timestamp` as `DD.MM.YYYY HH:MM` in a fixed UTC offset.
pub fn localize_published(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Display name of a feed: its host without `www.`, port kept.
pub fn source_name(feed_url: &str) -> String {
    let Ok(url) = reqwest::Url::parse(feed_url) else {
        return feed_url.to_string();
    };
    let host = url.host_str().unwrap_or_default().replace("www.", "");
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}
