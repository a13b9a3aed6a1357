use chrono::{DateTime, Utc};

/// One item as it came out of a feed. Every field is optional because feeds
/// in the wild omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}
