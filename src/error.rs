use std::time::Duration;

use crate::schema::SchemaValidationError;

/// Failures that stop a tool call before it can frame its own result.
///
/// Every variant is turned into an error-tagged `ToolResult` by the
/// dispatcher; none of them reach the session loop.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments: {0}")]
    Validation(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Internal(String),
}

impl From<SchemaValidationError> for ToolError {
    fn from(err: SchemaValidationError) -> Self {
        match err {
            SchemaValidationError::ValidationFailed(_) => Self::Validation(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}
