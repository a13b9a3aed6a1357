use std::time::Duration;

use chrono::FixedOffset;
use tracing::{debug, error, info};

use super::dispatch::{DeliveryError, MessageSink};
use super::feed::fetcher::FetchError;
use super::feed::EntrySource;
use super::filter::KeywordFilter;
use super::format::{format_message, localize_published, source_name};
use super::identity::identify;
use super::storage::{DeliveryStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("feed fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
    #[error("record store failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub feeds: Vec<String>,
    pub max_entries_per_feed: usize,
    pub utc_offset: FixedOffset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub sent: usize,
    pub failed_feeds: usize,
    /// The record store failed and the remaining feeds were skipped.
    pub aborted: bool,
}

/// Polls every feed, relays unseen keyword matches, and remembers what it sent.
pub struct Relay<S, M> {
    store: DeliveryStore,
    source: S,
    sink: M,
    filter: KeywordFilter,
    settings: RelaySettings,
}

impl<S, M> Relay<S, M>
where
    S: EntrySource,
    M: MessageSink,
{
    pub fn new(
        store: DeliveryStore,
        source: S,
        sink: M,
        filter: KeywordFilter,
        settings: RelaySettings,
    ) -> Self {
        Self {
            store,
            source,
            sink,
            filter,
            settings,
        }
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Runs a pass, sleeps for `interval`, and repeats until the process is stopped.
    pub async fn run_forever(&self, interval: Duration) {
        loop {
            self.run_pass().await;
            debug!(seconds = interval.as_secs(), "Sleeping until next pass");
            tokio::time::sleep(interval).await;
        }
    }

    /// One pass over every configured feed. A failing feed never stops the
    /// pass; a failing record store does.
    pub async fn run_pass(&self) -> PassSummary {
        let mut summary = PassSummary::default();

        for feed_url in &self.settings.feeds {
            match self.process_feed(feed_url, &mut summary.sent).await {
                Ok(()) => {}
                Err(RelayError::Storage(error)) => {
                    error!(feed = %feed_url, error = %error, "Record store failed, aborting pass");
                    summary.failed_feeds += 1;
                    summary.aborted = true;
                    break;
                }
                Err(error) => {
                    error!(feed = %feed_url, error = %error, "Feed skipped");
                    summary.failed_feeds += 1;
                }
            }
        }

        info!(
            sent = summary.sent,
            failed_feeds = summary.failed_feeds,
            aborted = summary.aborted,
            "Pass complete"
        );
        summary
    }

    async fn process_feed(&self, feed_url: &str, sent: &mut usize) -> Result<(), RelayError> {
        let entries = self.source.fetch_entries(feed_url).await?;
        let source = source_name(feed_url);

        for entry in entries.iter().take(self.settings.max_entries_per_feed) {
            let id = identify(entry);
            if self.store.exists(&id).await? {
                continue;
            }
            if !self.filter.allowed(entry) {
                continue;
            }

            let title = entry.title.as_deref().unwrap_or_default();
            let link = entry.link.as_deref().unwrap_or_default();
            let published = entry
                .published
                .map(|timestamp| localize_published(timestamp, self.settings.utc_offset));
            let message = format_message(title, link, &source, published.as_deref());

            // Recording only after a successful send keeps a failed entry
            // eligible for the next pass.
            self.sink.send(&message).await?;
            self.store
                .record(&id, link, published.as_deref().unwrap_or_default())
                .await?;
            *sent += 1;
            debug!(feed = %feed_url, title, "Entry delivered");
        }

        Ok(())
    }
}
