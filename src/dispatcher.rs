use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::ToolError;
use crate::handlers::ToolContext;
use crate::protocol::ToolResult;
use crate::registry::Registry;
use crate::schema;

/// Resolves and runs tools. This is the one place tool failures are
/// normalized: `handle` always returns a `ToolResult`.
pub struct Dispatcher {
    registry: Registry,
    ctx: Arc<ToolContext>,
    tool_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Registry, ctx: ToolContext) -> Self {
        let tool_timeout = ctx.config.tool_timeout;
        Self {
            registry,
            ctx: Arc::new(ctx),
            tool_timeout,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run tool `name` with `arguments` (`null` is treated as `{}`).
    pub async fn handle(&self, name: &str, arguments: Value) -> ToolResult {
        match self.try_handle(name, arguments).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                ToolResult::error(format!("Error executing {name}: {e}"))
            }
        }
    }

    async fn try_handle(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
        let tool = self.registry.resolve(name)?;

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        schema::validate_arguments(&tool.descriptor.input_schema, &arguments)?;

        tracing::debug!(tool = name, "invoking tool");

        // A separate task turns a panicking handler into a JoinError.
        let mut task = tokio::spawn((tool.handler)(Arc::clone(&self.ctx), arguments));
        match tokio::time::timeout(self.tool_timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ToolError::Internal(format!("handler aborted: {join_err}"))),
            Err(_) => {
                task.abort();
                Err(ToolError::Timeout(self.tool_timeout))
            }
        }
    }
}
