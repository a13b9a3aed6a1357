pub mod core;

use tracing::info;

use crate::core::config::{Config, ConfigError};
use crate::core::dispatch::TelegramDispatcher;
use crate::core::feed::fetcher::{build_client, HttpFeedFetcher};
use crate::core::filter::KeywordFilter;
use crate::core::relay::{Relay, RelaySettings};
use crate::core::sources::{default_feeds, load_feed_list, SourceListError};
use crate::core::storage::{DeliveryStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("record store error: {0}")]
    Storage(#[from] StorageError),
    #[error("feed list error: {0}")]
    Sources(#[from] SourceListError),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Loads configuration from the environment and relays news until the
/// process is stopped. Returns only when startup fails.
pub async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let relay = build_relay(&config).await?;

    relay.run_forever(config.interval).await;
    Ok(())
}

pub async fn build_relay(
    config: &Config,
) -> Result<Relay<HttpFeedFetcher, TelegramDispatcher>, AppError> {
    let feeds = match &config.feeds_file {
        Some(path) => load_feed_list(path)?,
        None => default_feeds(),
    };
    let store = DeliveryStore::open(&config.database_path).await?;
    let delivered = store.count().await?;

    let client = build_client(config.fetch_timeout)?;
    let fetcher = HttpFeedFetcher::new(client.clone());
    let dispatcher = TelegramDispatcher::new(
        client,
        &config.telegram_api_url,
        &config.bot_token,
        config.chat_id,
    );
    let filter = KeywordFilter::new(&config.keywords);

    info!(
        feeds = feeds.len(),
        keywords = filter.keywords().len(),
        interval_minutes = config.interval.as_secs() / 60,
        database = %config.database_path.display(),
        delivered,
        "News relay started, scanning feeds"
    );

    Ok(Relay::new(
        store,
        fetcher,
        dispatcher,
        filter,
        RelaySettings {
            feeds,
            max_entries_per_feed: config.max_entries_per_feed,
            utc_offset: config.utc_offset,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn build_relay_uses_feeds_file_and_creates_database() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let feeds_path = dir.path().join("feeds.txt");
        std::fs::write(
            &feeds_path,
            "https://a.example.com/rss\nhttps://A.example.com/rss/\nhttps://b.example.com/rss\n",
        )
        .expect("feeds file should be written");
        let database_path = dir.path().join("data").join("news.db");

        let vars = HashMap::from([
            ("BOT_TOKEN", "123:abc".to_string()),
            ("CHAT_ID", "99".to_string()),
            ("FEEDS_FILE", feeds_path.to_string_lossy().to_string()),
            ("DATABASE_PATH", database_path.to_string_lossy().to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("config should load");

        let relay = build_relay(&config).await.expect("relay should build");

        assert_eq!(
            relay.settings().feeds,
            vec!["https://a.example.com/rss", "https://b.example.com/rss"]
        );
        assert!(database_path.exists());
    }

    #[tokio::test]
    async fn missing_feeds_file_fails_startup() {
        let vars = HashMap::from([
            ("BOT_TOKEN", "123:abc".to_string()),
            ("CHAT_ID", "99".to_string()),
            ("FEEDS_FILE", "/definitely/not/here.opml".to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("config should load");

        let result = build_relay(&config).await;

        assert!(matches!(result, Err(AppError::Sources(_))));
    }
}
