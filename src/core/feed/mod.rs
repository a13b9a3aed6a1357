pub mod fetcher;
pub mod parser;
pub mod types;

use fetcher::FetchError;
use types::ParsedEntry;

/// Anything that can turn a feed URL into its current entries, newest first
/// as the feed publishes them.
#[allow(async_fn_in_trait)]
pub trait EntrySource {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<ParsedEntry>, FetchError>;
}
