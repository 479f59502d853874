use std::sync::Arc;

use serde_json::Value;

use super::{gateway_failure, parse_args, ToolContext};
use crate::error::ToolError;
use crate::gateway::Signal;
use crate::protocol::{ToolResult, TradingSignalsParams};
use crate::registry::{InputSchema, PrimitiveType, ToolDescriptor};

pub const NAME: &str = "get_trading_signals";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get current trading signals from the AI system",
        InputSchema::empty()
            .property("symbol", PrimitiveType::String, "Trading symbol (optional)")
            .property("limit", PrimitiveType::Integer, "Number of signals to return"),
    )
}

/// Handle a `get_trading_signals` tool call.
pub async fn handle(ctx: Arc<ToolContext>, arguments: Value) -> Result<ToolResult, ToolError> {
    let params: TradingSignalsParams = parse_args(arguments)?;

    match ctx
        .signals
        .get_signals(params.symbol.as_deref(), params.limit())
        .await
    {
        Ok(signals) => Ok(ToolResult::text(render(&signals))),
        Err(e) => Ok(gateway_failure(NAME, "Failed to get trading signals", &e)),
    }
}

fn render(signals: &[Signal]) -> String {
    let body = signals
        .iter()
        .map(|s| {
            format!(
                "Symbol: {}\nAction: {}\nEntry: {}\nTarget: {}\nStop Loss: {}\nConfidence: {}%\n---",
                s.symbol, s.action, s.entry_price, s.target_price, s.stop_loss, s.confidence
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("📊 Trading Signals ({} found):\n\n{body}", signals.len())
}
