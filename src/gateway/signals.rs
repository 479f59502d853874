use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{http_client, GatewayError};

/// Number of signals requested when the caller gives no limit.
pub const DEFAULT_SIGNAL_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub action: String,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    pub confidence: f64,
}

/// Client for the trading-signal query API.
#[derive(Debug, Clone)]
pub struct SignalsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SignalsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `GET /api/signals`, optionally filtered by symbol.
    ///
    /// A limit of zero leaves the limit to the API.
    pub async fn get_signals(
        &self,
        symbol: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Signal>, GatewayError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(symbol) = symbol.filter(|s| !s.is_empty()) {
            query.push(("symbol", symbol.to_string()));
        }
        let limit = limit.unwrap_or(DEFAULT_SIGNAL_LIMIT);
        if limit > 0 {
            query.push(("limit", limit.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/api/signals", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::status(status));
        }

        let body = response.bytes().await.map_err(GatewayError::transport)?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
