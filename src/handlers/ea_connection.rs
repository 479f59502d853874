use std::sync::Arc;

use serde_json::Value;

use super::ToolContext;
use crate::error::ToolError;
use crate::probe;
use crate::protocol::ToolResult;
use crate::registry::{InputSchema, ToolDescriptor};

pub const NAME: &str = "check_ea_connection";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Check connection status to MetaTrader EA",
        InputSchema::empty(),
    )
}

/// Handle a `check_ea_connection` tool call.
pub async fn handle(ctx: Arc<ToolContext>, _arguments: Value) -> Result<ToolResult, ToolError> {
    let config = &ctx.config;
    let outcome = probe::probe(&config.ea_target(), config.probe_timeout).await;

    Ok(ToolResult::text(format!(
        "🔌 MetaTrader EA Connection Status:\n\n\
         {outcome}\n\n\
         Connection Details:\n\
         - Host: {}\n\
         - Port: {}\n\
         - Protocol: TCP Socket",
        config.ea_server_host, config.ea_server_port
    )))
}
