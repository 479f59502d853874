use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::gateway::GatewayError;
use crate::handlers::{self, ToolContext};
use crate::protocol::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RpcId};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("stdio failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// MCP server that communicates over stdio using newline-delimited JSON-RPC 2.0.
///
/// Requests are handled strictly one at a time, so responses are written in
/// request order.
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Result<Self, GatewayError> {
        let ctx = ToolContext::new(config)?;
        Ok(Self::with_dispatcher(Dispatcher::new(handlers::registry(), ctx)))
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn run(&self) -> Result<(), ServerError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Announce readiness, then answer each input line until end of stream.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(&mut writer, &JsonRpcNotification::initialized()).await?;
        tracing::info!(tools = self.dispatcher.registry().len(), "server ready");

        // One byte past the limit plus the terminator is enough to tell an
        // oversized line apart from one that fits exactly.
        let read_limit = MAX_MESSAGE_BYTES as u64 + 2;
        let mut raw = Vec::new();
        loop {
            raw.clear();
            let n = (&mut reader).take(read_limit).read_until(b'\n', &mut raw).await?;
            if n == 0 {
                break;
            }

            if !raw.ends_with(b"\n") && raw.len() > MAX_MESSAGE_BYTES {
                let bytes = raw.len() + discard_line(&mut reader).await?;
                write_line(&mut writer, &too_large(bytes)).await?;
                continue;
            }

            if let Some(resp) = self.handle_line(&raw).await {
                write_line(&mut writer, &resp).await?;
            }
        }

        tracing::info!("input closed, shutting down");
        Ok(())
    }

    /// Process one raw input line. Returns `None` when no reply is due.
    pub async fn handle_line(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        let body = raw.strip_suffix(b"\n").unwrap_or(raw);
        let body = body.strip_suffix(b"\r").unwrap_or(body);
        if body.len() > MAX_MESSAGE_BYTES {
            return Some(too_large(body.len()));
        }

        let trimmed = match std::str::from_utf8(raw) {
            Ok(s) => s.trim(),
            Err(e) => {
                tracing::warn!(error = %e, "input is not UTF-8");
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::malformed(format!("Invalid UTF-8: {e}")),
                ));
            }
        };

        if trimmed.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "parse error");
                return Some(JsonRpcResponse::error(None, JsonRpcError::malformed(e.to_string())));
            }
        };

        // Salvage the id before the envelope is validated so a structurally
        // bad request can still be answered under its own id.
        let salvaged_id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RpcId>(id.clone()).ok());

        let req: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    salvaged_id,
                    JsonRpcError::invalid_request_with(format!("Invalid Request: {e}")),
                ));
            }
        };

        // Validate jsonrpc version
        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(req.id.clone(), JsonRpcError::invalid_request()));
        }

        tracing::debug!(method = %req.method, "request received");
        handlers::dispatch(&req, &self.dispatcher).await
    }
}

async fn write_line<W, T>(writer: &mut W, message: &T) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let out = serde_json::to_string(message)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

fn too_large(bytes: usize) -> JsonRpcResponse {
    tracing::warn!(bytes, limit = MAX_MESSAGE_BYTES, "message too large");
    JsonRpcResponse::error(
        None,
        JsonRpcError::malformed(format!(
            "Message too large: {bytes} bytes (limit {MAX_MESSAGE_BYTES})"
        )),
    )
}

/// Skip the remainder of the current line without buffering it.
/// Returns the number of bytes dropped, not counting the terminator.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut dropped = 0;
    loop {
        let (used, done) = {
            let buf = reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok(dropped);
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(i) => (i, true),
                None => (buf.len(), false),
            }
        };
        dropped += used;
        if done {
            reader.consume(used + 1);
            return Ok(dropped);
        }
        reader.consume(used);
    }
}
