//! MCP server for the GenX trading stack.
//!
//! Exposes bot-status, Telegram relay, trading-signal and service-probe tools
//! over JSON-RPC 2.0 stdio transport, compatible with any MCP-aware AI agent.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod probe;
pub mod protocol;
pub mod registry;
pub mod server;

pub mod schema;
