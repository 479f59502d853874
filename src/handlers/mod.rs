pub mod bot_status;
pub mod ea_connection;
pub mod phone_debug;
pub mod send_message;
pub mod server_info;
pub mod trading_signals;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ToolError;
use crate::gateway::{GatewayError, SignalsClient, TelegramClient};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolResult};
use crate::registry::Registry;

/// Read-only state shared by every tool call.
#[derive(Debug)]
pub struct ToolContext {
    pub config: ServerConfig,
    pub telegram: TelegramClient,
    pub signals: SignalsClient,
}

impl ToolContext {
    pub fn new(config: ServerConfig) -> Result<Self, GatewayError> {
        let telegram = TelegramClient::new(
            config.telegram_api_base.clone(),
            config.telegram_bot_token.clone(),
            config.telegram_user_id.clone(),
            config.gateway_timeout,
        )?;
        let signals = SignalsClient::new(config.api_base_url.clone(), config.gateway_timeout)?;
        Ok(Self {
            config,
            telegram,
            signals,
        })
    }
}

/// The tool registration table. Order here is the order of `tools/list`.
pub fn registry() -> Registry {
    Registry::new()
        .register(bot_status::descriptor(), |ctx, args| bot_status::handle(ctx, args).boxed())
        .register(send_message::descriptor(), |ctx, args| send_message::handle(ctx, args).boxed())
        .register(trading_signals::descriptor(), |ctx, args| {
            trading_signals::handle(ctx, args).boxed()
        })
        .register(server_info::descriptor(), |ctx, args| server_info::handle(ctx, args).boxed())
        .register(ea_connection::descriptor(), |ctx, args| {
            ea_connection::handle(ctx, args).boxed()
        })
        .register(phone_debug::descriptor(), |ctx, args| phone_debug::handle(ctx, args).boxed())
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, dispatcher: &Dispatcher) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        method if method.starts_with("notifications/") => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": dispatcher.registry().list() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!("Invalid tools/call params: {e}")),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let arguments = params.arguments.unwrap_or(Value::Null);
            let tool_result = dispatcher.handle(&params.name, arguments).await;
            match serde_json::to_value(&tool_result) {
                Ok(result_json) => Some(JsonRpcResponse::success(req.id.clone(), result_json)),
                Err(e) => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::internal_error(format!("Cannot encode tool result: {e}")),
                )),
            }
        }

        _ if req.is_notification() => None,

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

/// Decode a tool's argument object into its typed parameters.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::Validation(e.to_string()))
}

/// Frame a gateway failure the way each tool reports it: `❌ <headline>: <reason>`.
fn gateway_failure(tool: &str, headline: &str, err: &GatewayError) -> ToolResult {
    tracing::warn!(tool, error = %err, "gateway call failed");
    ToolResult::error(format!("❌ {headline}: {err}"))
}
