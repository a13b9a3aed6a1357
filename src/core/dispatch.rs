use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("telegram rejected the message ({status}): {description}")]
    Api { status: u16, description: String },
}

/// Destination for rendered messages.
#[allow(async_fn_in_trait)]
pub trait MessageSink {
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Serialize)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

#[derive(Debug, Serialize)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    link_preview_options: LinkPreviewOptions,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends messages to one chat through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramDispatcher {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: i64,
}

impl std::fmt::Debug for TelegramDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramDispatcher")
            .field("api_url", &self.api_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramDispatcher {
    pub fn new(client: reqwest::Client, api_url: &str, token: &str, chat_id: i64) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token)
    }
}

impl MessageSink for TelegramDispatcher {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let params = SendMessageParams {
            chat_id: self.chat_id,
            text,
            parse_mode: "HTML",
            link_preview_options: LinkPreviewOptions { is_disabled: false },
        };
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&params)
            .send()
            .await
            // reqwest errors carry the request URL, which includes the token
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.bytes().await.map_err(reqwest::Error::without_url)?;

        match serde_json::from_slice::<ApiResponse>(&body) {
            Ok(parsed) if parsed.ok && status.is_success() => Ok(()),
            Ok(parsed) => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
            Err(_) => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: String::from_utf8_lossy(&body).chars().take(200).collect(),
            }),
        }
    }
}
