use std::sync::Arc;

use serde_json::Value;

use super::ToolContext;
use crate::error::ToolError;
use crate::probe;
use crate::protocol::ToolResult;
use crate::registry::{InputSchema, ToolDescriptor};

pub const NAME: &str = "get_server_info";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get information about running servers and their status",
        InputSchema::empty(),
    )
}

/// Handle a `get_server_info` tool call.
///
/// All sibling services are probed at once; an unreachable or slow service
/// only affects its own line of the report.
pub async fn handle(ctx: Arc<ToolContext>, _arguments: Value) -> Result<ToolResult, ToolError> {
    let targets = ctx.config.probe_targets();
    let outcomes = probe::probe_all(&targets, ctx.config.probe_timeout).await;

    let lines = outcomes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(ToolResult::text(format!("🖥️ Server Status Report:\n\n{lines}")))
}
