use std::sync::Arc;

use serde_json::Value;

use super::ToolContext;
use crate::error::ToolError;
use crate::protocol::ToolResult;
use crate::registry::{InputSchema, ToolDescriptor};

pub const NAME: &str = "get_phone_debug_info";

const ACCESS_METHODS: &[&str] = &[
    "📱 Telegram Bot - Direct messaging",
    "🌐 Web Interface - Browser access",
    "🔌 API Endpoints - Direct API calls",
    "📡 WebSocket - Real-time updates",
];

const TROUBLESHOOTING: &[&str] = &[
    "1. Check if bot responds to /start command",
    "2. Verify user ID in bot logs",
    "3. Test API endpoints from phone browser",
    "4. Check network connectivity to server",
];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get debugging information for phone connection to bot",
        InputSchema::empty(),
    )
}

/// Handle a `get_phone_debug_info` tool call. Reports only whether secrets
/// are set, never their values.
pub async fn handle(ctx: Arc<ToolContext>, _arguments: Value) -> Result<ToolResult, ToolError> {
    let config = &ctx.config;

    Ok(ToolResult::text(format!(
        "📱 Phone Debug Information:\n\n\
         **Bot Configuration:**\n\
         - Token: {}\n\
         - User ID: {}\n\
         - Group ID: {}\n\n\
         **Server Endpoints:**\n\
         - API: {}\n\
         - EA: {}:{}\n\n\
         **Access Methods:**\n{}\n\n\
         **Troubleshooting Steps:**\n{}",
        presence(config.telegram_bot_token.is_some()),
        presence(config.telegram_user_id.is_some()),
        presence(config.telegram_group_id.is_some()),
        config.api_base_url,
        config.ea_server_host,
        config.ea_server_port,
        ACCESS_METHODS.join("\n"),
        TROUBLESHOOTING.join("\n"),
    )))
}

fn presence(configured: bool) -> &'static str {
    if configured {
        "✅ Configured"
    } else {
        "❌ Missing"
    }
}
