use std::sync::Arc;

use serde_json::Value;

use super::{gateway_failure, parse_args, ToolContext};
use crate::error::ToolError;
use crate::protocol::{SendMessageParams, ToolResult};
use crate::registry::{InputSchema, PrimitiveType, ToolDescriptor};

pub const NAME: &str = "send_telegram_message";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Send a message via Telegram bot",
        InputSchema::empty()
            .required_property("message", PrimitiveType::String, "Message to send")
            .property(
                "chat_id",
                PrimitiveType::String,
                "Chat ID (optional, defaults to configured user)",
            ),
    )
}

/// Handle a `send_telegram_message` tool call.
///
/// Blank messages are rejected before any network call is made.
pub async fn handle(ctx: Arc<ToolContext>, arguments: Value) -> Result<ToolResult, ToolError> {
    let params: SendMessageParams = parse_args(arguments)?;
    if params.message.trim().is_empty() {
        return Err(ToolError::Validation("message must not be empty".into()));
    }

    let chat_id = params.chat_id.map(|id| id.to_string());
    match ctx
        .telegram
        .send_message(&params.message, chat_id.as_deref())
        .await
    {
        Ok(ack) => {
            tracing::info!(chat_id = %ack.chat_id, message_id = ack.message_id, "message relayed");
            Ok(ToolResult::text(format!(
                "✅ Message sent successfully to chat {}",
                ack.chat_id
            )))
        }
        Err(e) => Ok(gateway_failure(NAME, "Failed to send message", &e)),
    }
}
