//! HTTP clients for the external APIs the tools relay to.
//!
//! Each client call is exactly one round trip; nothing is retried here.

pub mod signals;
pub mod telegram;

use std::time::Duration;

use reqwest::StatusCode;

pub use signals::{Signal, SignalsClient};
pub use telegram::{BotIdentity, MessageAck, TelegramClient};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("API returned {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("Telegram API error: {0}")]
    Api(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub(crate) fn status(status: StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// Transport failure with the request URL stripped, since messaging
    /// URLs embed the bot credential.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(GatewayError::Client)
}
