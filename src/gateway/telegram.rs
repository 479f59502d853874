use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, GatewayError};

/// Bot API response envelope: `{"ok": bool, "result": ..., "description": ...}`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Identity of the configured bot as reported by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "first_name")]
    pub name: String,
    #[serde(default)]
    pub can_join_groups: bool,
    #[serde(rename = "can_read_all_group_messages", default)]
    pub can_read_group_messages: bool,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Acknowledgement of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAck {
    pub chat_id: String,
    pub message_id: i64,
}

/// Client for a Telegram-compatible bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    default_chat_id: Option<String>,
}

impl TelegramClient {
    pub fn new(
        api_base: impl Into<String>,
        token: Option<String>,
        default_chat_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            http: http_client(timeout)?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            default_chat_id,
        })
    }

    pub async fn get_identity(&self) -> Result<BotIdentity, GatewayError> {
        let url = self.method_url("getMe")?;
        self.call(self.http.get(url)).await
    }

    /// Send `text` to `chat_id`, or to the configured default recipient.
    pub async fn send_message(
        &self,
        text: &str,
        chat_id: Option<&str>,
    ) -> Result<MessageAck, GatewayError> {
        let target = chat_id
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.default_chat_id.clone())
            .ok_or(GatewayError::NotConfigured("TELEGRAM_USER_ID"))?;

        let url = self.method_url("sendMessage")?;
        let body = json!({
            "chat_id": target,
            "text": text,
            "parse_mode": "Markdown",
        });

        let sent: SentMessage = self.call(self.http.post(url).json(&body)).await?;
        Ok(MessageAck {
            chat_id: target,
            message_id: sent.message_id,
        })
    }

    fn method_url(&self, method: &str) -> Result<String, GatewayError> {
        let token = self
            .token
            .as_deref()
            .ok_or(GatewayError::NotConfigured("TELEGRAM_BOT_TOKEN"))?;
        Ok(format!("{}/bot{token}/{method}", self.api_base))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(GatewayError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(GatewayError::transport)?;

        // The bot API reports failures in the envelope, usually with a non-2xx
        // status; fall back to the status only when the body is unreadable.
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body).map_err(|e| {
            if status.is_success() {
                GatewayError::Decode(e.to_string())
            } else {
                GatewayError::status(status)
            }
        })?;

        if !envelope.ok {
            return Err(GatewayError::Api(
                envelope.description.unwrap_or_else(|| format!("request rejected ({status})")),
            ));
        }

        envelope
            .result
            .ok_or_else(|| GatewayError::Decode("response has no result".into()))
    }
}
