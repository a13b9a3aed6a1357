use html2text::render::text_renderer::TrivialDecorator;

use super::feed::types::ParsedEntry;

// Wide enough that html2text never wraps a summary mid-phrase.
const TEXT_WIDTH: usize = 10_000;

/// Case-insensitive keyword match over an entry's title and plain-text summary.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn allowed(&self, entry: &ParsedEntry) -> bool {
        let title = entry.title.as_deref().unwrap_or_default().to_lowercase();
        let summary = strip_markup(entry.summary.as_deref().unwrap_or_default()).to_lowercase();

        self.keywords
            .iter()
            .any(|keyword| title.contains(keyword.as_str()) || summary.contains(keyword.as_str()))
    }
}

/// Renders markup to plain text with all whitespace runs collapsed to one space.
pub fn strip_markup(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }
    let text =
        html2text::from_read_with_decorator(markup.as_bytes(), TEXT_WIDTH, TrivialDecorator::new());
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
