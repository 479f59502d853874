use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 ID — may be a number or string per spec.
///
/// Numbers keep their original JSON representation so the id is echoed
/// back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(serde_json::Number),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Requests without an id are notifications and never get a reply.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

/// Telegram chat id as sent by clients: bot API ids are integers, but
/// `@channelname` handles and quoted ids arrive as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Parameters for the `send_telegram_message` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageParams {
    pub message: String,
    pub chat_id: Option<ChatId>,
}

/// Parameters for the `get_trading_signals` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingSignalsParams {
    pub symbol: Option<String>,
    pub limit: Option<f64>,
}

impl TradingSignalsParams {
    /// Requested limit as a whole count; fractions are truncated and
    /// negative or non-finite values fall back to the default.
    pub fn limit(&self) -> Option<u32> {
        self.limit
            .filter(|l| l.is_finite() && *l >= 0.0)
            .map(|l| l.trunc().min(f64::from(u32::MAX)) as u32)
    }
}
