//! Dispatcher and tool handler tests.
//!
//! Tools run against mock gateways and loopback listeners; the dispatcher is
//! exercised directly so each test sees the exact `ToolResult` a client gets.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use genx_mcp_server::config::ServerConfig;
use genx_mcp_server::dispatcher::Dispatcher;
use genx_mcp_server::error::ToolError;
use genx_mcp_server::handlers::{self, ToolContext};
use genx_mcp_server::protocol::ToolResult;
use genx_mcp_server::registry::{InputSchema, Registry, ToolDescriptor};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Config whose every external dependency points at a dead loopback port.
async fn offline_config() -> ServerConfig {
    let dead = closed_port().await;
    ServerConfig {
        telegram_api_base: format!("http://127.0.0.1:{dead}"),
        api_base_url: format!("http://127.0.0.1:{dead}"),
        ea_server_host: "127.0.0.1".to_string(),
        ea_server_port: dead,
        probe_timeout: Duration::from_millis(300),
        gateway_timeout: Duration::from_secs(2),
        tool_timeout: Duration::from_secs(10),
        ..ServerConfig::default()
    }
}

fn dispatcher(config: ServerConfig) -> Dispatcher {
    Dispatcher::new(handlers::registry(), ToolContext::new(config).unwrap())
}

fn text(result: &ToolResult) -> &str {
    result.first_text()
}

// ---------------------------------------------------------------------------
// fault boundary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_tool_is_reported_not_raised() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("not_a_real_tool", json!({})).await;

    assert!(result.is_error);
    assert_eq!(
        text(&result),
        "Error executing not_a_real_tool: Unknown tool: not_a_real_tool"
    );
}

#[tokio::test]
async fn every_tool_answers_empty_arguments() {
    let d = dispatcher(offline_config().await);

    for descriptor in handlers::registry().list() {
        let result = d.handle(&descriptor.name, json!({})).await;
        assert_eq!(result.content.len(), 1, "{} produced no content", descriptor.name);
        assert!(!text(&result).is_empty(), "{} produced empty text", descriptor.name);
    }
}

#[tokio::test]
async fn missing_required_argument_fails_validation() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("send_telegram_message", json!({})).await;

    assert!(result.is_error);
    let text = text(&result);
    assert!(text.starts_with("Error executing send_telegram_message: Invalid arguments:"), "{text}");
    assert!(text.contains("message"), "{text}");
}

#[tokio::test]
async fn wrong_argument_type_fails_validation() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("get_trading_signals", json!({ "limit": "two" })).await;

    assert!(result.is_error);
    assert!(text(&result).starts_with("Error executing get_trading_signals: Invalid arguments:"));
}

#[tokio::test]
async fn blank_message_is_rejected_before_sending() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("send_telegram_message", json!({ "message": "   " })).await;

    assert!(result.is_error);
    assert_eq!(
        text(&result),
        "Error executing send_telegram_message: Invalid arguments: message must not be empty"
    );
}

#[tokio::test]
async fn null_arguments_are_treated_as_empty() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("get_phone_debug_info", Value::Null).await;
    assert!(!result.is_error);
}

async fn exploding(_ctx: Arc<ToolContext>, _args: Value) -> Result<ToolResult, ToolError> {
    panic!("handler bug")
}

async fn stalled(_ctx: Arc<ToolContext>, _args: Value) -> Result<ToolResult, ToolError> {
    tokio::time::sleep(Duration::from_secs(60)).await;
    Ok(ToolResult::text("too late"))
}

#[tokio::test]
async fn panicking_handler_becomes_error_result() {
    let registry = Registry::new().register(
        ToolDescriptor::new("explode", "always panics", InputSchema::empty()),
        |ctx, args| exploding(ctx, args).boxed(),
    );
    let d = Dispatcher::new(registry, ToolContext::new(offline_config().await).unwrap());

    let result = d.handle("explode", json!({})).await;
    assert!(result.is_error);
    assert!(text(&result).starts_with("Error executing explode: handler aborted"));
}

#[tokio::test]
async fn slow_handler_is_cut_off_by_tool_timeout() {
    let mut config = offline_config().await;
    config.tool_timeout = Duration::from_millis(100);

    let registry = Registry::new().register(
        ToolDescriptor::new("stall", "never finishes in time", InputSchema::empty()),
        |ctx, args| stalled(ctx, args).boxed(),
    );
    let d = Dispatcher::new(registry, ToolContext::new(config).unwrap());

    let result = d.handle("stall", json!({})).await;
    assert!(result.is_error);
    assert_eq!(text(&result), "Error executing stall: timed out after 100ms");
}

// ---------------------------------------------------------------------------
// messaging tools
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bot_status_reports_identity() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/botTOKEN/getMe");
            then.status(200).json_body(json!({
                "ok": true,
                "result": {
                    "id": 99,
                    "first_name": "GenX",
                    "username": "genx_bot",
                    "can_join_groups": true,
                    "can_read_all_group_messages": true
                }
            }));
        })
        .await;

    let config = ServerConfig {
        telegram_api_base: server.base_url(),
        telegram_bot_token: Some("TOKEN".into()),
        ..offline_config().await
    };
    let result = dispatcher(config).handle("get_bot_status", json!({})).await;

    assert!(!result.is_error);
    let text = text(&result);
    assert!(text.starts_with("✅ Telegram Bot Active"));
    assert!(text.contains("- Username: @genx_bot"));
    assert!(text.contains("- ID: 99"));
}

#[tokio::test]
async fn bot_status_without_token_is_framed_failure() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("get_bot_status", json!({})).await;

    assert!(result.is_error);
    assert_eq!(
        text(&result),
        "❌ Bot Status Check Failed: TELEGRAM_BOT_TOKEN is not configured"
    );
}

#[tokio::test]
async fn send_message_confirms_delivery() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/botTOKEN/sendMessage")
                .json_body_partial(r#"{ "chat_id": "555", "text": "ping from agent" }"#);
            then.status(200).json_body(json!({ "ok": true, "result": { "message_id": 1 } }));
        })
        .await;

    let config = ServerConfig {
        telegram_api_base: server.base_url(),
        telegram_bot_token: Some("TOKEN".into()),
        telegram_user_id: Some("555".into()),
        ..offline_config().await
    };
    let result = dispatcher(config)
        .handle("send_telegram_message", json!({ "message": "ping from agent" }))
        .await;

    mock.assert_async().await;
    assert!(!result.is_error);
    assert_eq!(text(&result), "✅ Message sent successfully to chat 555");
}

#[tokio::test]
async fn send_message_accepts_numeric_chat_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/botTOKEN/sendMessage")
                .json_body_partial(r#"{ "chat_id": "123456789", "text": "hello" }"#);
            then.status(200).json_body(json!({ "ok": true, "result": { "message_id": 9 } }));
        })
        .await;

    let config = ServerConfig {
        telegram_api_base: server.base_url(),
        telegram_bot_token: Some("TOKEN".into()),
        ..offline_config().await
    };
    let result = dispatcher(config)
        .handle("send_telegram_message", json!({ "message": "hello", "chat_id": 123456789 }))
        .await;

    mock.assert_hits_async(1).await;
    assert!(!result.is_error, "{}", text(&result));
    assert_eq!(text(&result), "✅ Message sent successfully to chat 123456789");
}

#[tokio::test]
async fn send_message_api_rejection_is_framed_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/botTOKEN/sendMessage");
            then.status(400).json_body(json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            }));
        })
        .await;

    let config = ServerConfig {
        telegram_api_base: server.base_url(),
        telegram_bot_token: Some("TOKEN".into()),
        ..offline_config().await
    };
    let result = dispatcher(config)
        .handle("send_telegram_message", json!({ "message": "hi", "chat_id": "0" }))
        .await;

    assert!(result.is_error);
    assert_eq!(
        text(&result),
        "❌ Failed to send message: Telegram API error: Bad Request: chat not found"
    );
}

// ---------------------------------------------------------------------------
// signals tool
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trading_signals_render_each_signal() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/signals")
                .query_param("symbol", "EURUSD")
                .query_param("limit", "2");
            then.status(200).json_body(json!([{
                "symbol": "EURUSD",
                "action": "BUY",
                "entry_price": 1.1,
                "target_price": 1.12,
                "stop_loss": 1.08,
                "confidence": 80
            }]));
        })
        .await;

    let config = ServerConfig {
        api_base_url: server.base_url(),
        ..offline_config().await
    };
    let result = dispatcher(config)
        .handle("get_trading_signals", json!({ "symbol": "EURUSD", "limit": 2 }))
        .await;

    assert!(!result.is_error);
    assert_eq!(
        text(&result),
        "📊 Trading Signals (1 found):\n\n\
         Symbol: EURUSD\nAction: BUY\nEntry: 1.1\nTarget: 1.12\nStop Loss: 1.08\nConfidence: 80%\n---"
    );
}

#[tokio::test]
async fn trading_signals_fractional_limit_is_truncated() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signals").query_param("limit", "2");
            then.status(200).json_body(json!([]));
        })
        .await;

    let config = ServerConfig {
        api_base_url: server.base_url(),
        ..offline_config().await
    };
    let result = dispatcher(config)
        .handle("get_trading_signals", json!({ "limit": 2.5 }))
        .await;

    mock.assert_hits_async(1).await;
    assert!(!result.is_error, "{}", text(&result));
}

#[tokio::test]
async fn trading_signals_http_failure_is_framed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/signals");
            then.status(404);
        })
        .await;

    let config = ServerConfig {
        api_base_url: server.base_url(),
        ..offline_config().await
    };
    let result = dispatcher(config).handle("get_trading_signals", json!({})).await;

    assert!(result.is_error);
    assert_eq!(
        text(&result),
        "❌ Failed to get trading signals: API returned 404: Not Found"
    );
}

// ---------------------------------------------------------------------------
// connectivity tools
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_info_lists_every_sibling_service() {
    let d = dispatcher(offline_config().await);
    let result = d.handle("get_server_info", json!({})).await;

    assert!(!result.is_error);
    let lines: Vec<&str> = text(&result).lines().collect();
    assert_eq!(lines[0], "🖥️ Server Status Report:");
    assert!(lines[2].contains("API Server (127.0.0.1:8080)"));
    assert!(lines[3].contains("FastAPI Server (127.0.0.1:8000)"));
    assert!(lines[4].contains("EA Communication Server"));
    assert!(lines[4].ends_with("- OFFLINE"));
    assert!(lines[5].contains("Frontend Server (127.0.0.1:5173)"));
}

#[tokio::test]
async fn ea_connection_reports_online_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = ServerConfig {
        ea_server_port: port,
        ..offline_config().await
    };
    let result = dispatcher(config).handle("check_ea_connection", json!({})).await;

    assert!(!result.is_error);
    let text = text(&result);
    assert!(text.contains(&format!("✅ EA Server (127.0.0.1:{port}) - ONLINE")), "{text}");
    assert!(text.contains(&format!("- Port: {port}")));
    assert!(text.contains("- Protocol: TCP Socket"));
}

#[tokio::test]
async fn ea_connection_reports_offline_listener() {
    let config = offline_config().await;
    let port = config.ea_server_port;
    let result = dispatcher(config).handle("check_ea_connection", json!({})).await;

    assert!(!result.is_error, "an offline EA is a report, not a failure");
    assert!(text(&result).contains(&format!("❌ EA Server (127.0.0.1:{port}) - OFFLINE")));
}

// ---------------------------------------------------------------------------
// debug tool
// ---------------------------------------------------------------------------

#[tokio::test]
async fn phone_debug_reports_presence_without_secrets() {
    let config = ServerConfig {
        telegram_bot_token: Some("123:SUPERSECRET".into()),
        ..offline_config().await
    };
    let result = dispatcher(config).handle("get_phone_debug_info", json!({})).await;

    assert!(!result.is_error);
    let text = text(&result);
    assert!(text.contains("- Token: ✅ Configured"));
    assert!(text.contains("- User ID: ❌ Missing"));
    assert!(text.contains("**Troubleshooting Steps:**"));
    assert!(!text.contains("SUPERSECRET"));
}
