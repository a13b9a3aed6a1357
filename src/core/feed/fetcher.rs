use std::time::Duration;

use super::parser::{parse_feed_bytes, FeedParseError};
use super::types::ParsedEntry;
use super::EntrySource;

const USER_AGENT: &str = concat!("news-relay/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("feed could not be parsed: {0}")]
    Parse(#[from] FeedParseError),
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    Ok(response.bytes().await?.to_vec())
}

/// Fetches feeds over HTTP, one request per call.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl EntrySource for HttpFeedFetcher {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<ParsedEntry>, FetchError> {
        let body = fetch_feed(&self.client, feed_url).await?;
        tracing::debug!(feed = feed_url, bytes = body.len(), "Fetched feed");
        Ok(parse_feed_bytes(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;

    async fn rss_handler() -> Response {
        (
            [(reqwest::header::CONTENT_TYPE, "application/rss+xml")],
            include_str!("../../../fixtures/feeds/sample.rss.xml"),
        )
            .into_response()
    }

    async fn broken_handler() -> Response {
        (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response()
    }

    async fn html_handler() -> Response {
        (
            [(reqwest::header::CONTENT_TYPE, "text/html")],
            "<html><body>maintenance</body></html>",
        )
            .into_response()
    }

    async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/feed.xml", get(rss_handler))
            .route("/down.xml", get(broken_handler))
            .route("/page.html", get(html_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}"), join_handle)
    }

    fn test_client() -> reqwest::Client {
        build_client(Duration::from_secs(5)).expect("client should build")
    }

    #[tokio::test]
    async fn fetch_feed_returns_body() {
        let (base, server_task) = spawn_test_server().await;

        let body = fetch_feed(&test_client(), &format!("{base}/feed.xml"))
            .await
            .expect("fetch should succeed");

        assert!(body.starts_with(b"<?xml"));

        server_task.abort();
    }

    #[tokio::test]
    async fn fetcher_parses_entries_in_feed_order() {
        let (base, server_task) = spawn_test_server().await;
        let fetcher = HttpFeedFetcher::new(test_client());

        let entries = fetcher
            .fetch_entries(&format!("{base}/feed.xml"))
            .await
            .expect("fetch should succeed");

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].title.as_deref(),
            Some("NASA announces new rocket test")
        );

        server_task.abort();
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (base, server_task) = spawn_test_server().await;
        let fetcher = HttpFeedFetcher::new(test_client());

        let result = fetcher.fetch_entries(&format!("{base}/down.xml")).await;

        assert!(matches!(result, Err(FetchError::HttpStatus(503))));
        server_task.abort();
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let (base, server_task) = spawn_test_server().await;
        let fetcher = HttpFeedFetcher::new(test_client());

        let result = fetcher.fetch_entries(&format!("{base}/page.html")).await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
        server_task.abort();
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        drop(listener);

        let fetcher = HttpFeedFetcher::new(test_client());
        let result = fetcher
            .fetch_entries(&format!("http://{address}/feed.xml"))
            .await;

        assert!(matches!(result, Err(FetchError::Request(_))));
    }
}
