use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;

use super::sources::DEFAULT_KEYWORDS;

pub const DEFAULT_INTERVAL_MINUTES: u64 = 20;
pub const DEFAULT_DATABASE_PATH: &str = "news.db";
pub const DEFAULT_MAX_ENTRIES_PER_FEED: usize = 10;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),
    #[error("environment variable {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: i64,
    pub interval: Duration,
    pub database_path: PathBuf,
    pub feeds_file: Option<PathBuf>,
    pub keywords: Vec<String>,
    pub max_entries_per_feed: usize,
    pub fetch_timeout: Duration,
    pub utc_offset: FixedOffset,
    pub telegram_api_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("interval", &self.interval)
            .field("database_path", &self.database_path)
            .field("feeds_file", &self.feeds_file)
            .field("keywords", &self.keywords)
            .field("max_entries_per_feed", &self.max_entries_per_feed)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("utc_offset", &self.utc_offset)
            .field("telegram_api_url", &self.telegram_api_url)
            .finish()
    }
}

impl Config {
    /// Reads the process environment after loading `.env.local` and `.env`.
    /// Variables already set in the environment win over both files.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let chat_id = parse_value("CHAT_ID", get("CHAT_ID"))?
            .ok_or(ConfigError::Missing("CHAT_ID"))?;
        let interval_minutes: u64 = parse_value("INTERVAL_MINUTES", get("INTERVAL_MINUTES"))?
            .map(|minutes| non_zero("INTERVAL_MINUTES", minutes))
            .transpose()?
            .unwrap_or(DEFAULT_INTERVAL_MINUTES);
        let max_entries_per_feed: usize =
            parse_value("MAX_ENTRIES_PER_FEED", get("MAX_ENTRIES_PER_FEED"))?
                .map(|count| non_zero("MAX_ENTRIES_PER_FEED", count))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_ENTRIES_PER_FEED);
        let fetch_timeout_secs: u64 =
            parse_value("FETCH_TIMEOUT_SECS", get("FETCH_TIMEOUT_SECS"))?
                .map(|secs| non_zero("FETCH_TIMEOUT_SECS", secs))
                .transpose()?
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let offset_hours: i32 = parse_value("UTC_OFFSET_HOURS", get("UTC_OFFSET_HOURS"))?
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
        let utc_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
            })?;

        let keywords = match get("KEYWORDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(ToString::to_string)
                .collect(),
            None => DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect(),
        };

        Ok(Self {
            bot_token,
            chat_id,
            interval: Duration::from_secs(interval_minutes.saturating_mul(60)),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            feeds_file: get("FEEDS_FILE").map(PathBuf::from),
            keywords,
            max_entries_per_feed,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            utc_offset,
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        })
    }
}

fn parse_value<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value })
    })
    .transpose()
}

fn non_zero<T>(key: &'static str, value: T) -> Result<T, ConfigError>
where
    T: Default + PartialEq + ToString,
{
    if value == T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
