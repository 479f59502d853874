use std::sync::Arc;

use serde_json::Value;

use super::{gateway_failure, ToolContext};
use crate::error::ToolError;
use crate::protocol::ToolResult;
use crate::registry::{InputSchema, ToolDescriptor};

pub const NAME: &str = "get_bot_status";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get current status of the Telegram trading bot",
        InputSchema::empty(),
    )
}

/// Handle a `get_bot_status` tool call via the bot API's `getMe`.
pub async fn handle(ctx: Arc<ToolContext>, _arguments: Value) -> Result<ToolResult, ToolError> {
    let bot = match ctx.telegram.get_identity().await {
        Ok(bot) => bot,
        Err(e) => return Ok(gateway_failure(NAME, "Bot Status Check Failed", &e)),
    };

    Ok(ToolResult::text(format!(
        "✅ Telegram Bot Active\n\n\
         Bot Info:\n\
         - Username: @{}\n\
         - Name: {}\n\
         - ID: {}\n\
         - Can Join Groups: {}\n\
         - Can Read Messages: {}",
        bot.username, bot.name, bot.id, bot.can_join_groups, bot.can_read_group_messages
    )))
}
