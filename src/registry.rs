//! Static tool catalog.
//!
//! The registry is built once at startup from the registration table in
//! [`crate::handlers`] and is read-only afterwards. Declaration order is the
//! order clients display tools in, so `list` never reorders.

use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;
use crate::handlers::ToolContext;
use crate::protocol::ToolResult;

/// JSON Schema primitive types a tool property may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PrimitiveType,
    pub description: String,
}

/// Object schema describing a tool's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    pub properties: IndexMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl InputSchema {
    /// Schema for a tool that takes no arguments.
    pub fn empty() -> Self {
        Self {
            schema_type: "object",
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    pub fn property(mut self, name: &str, kind: PrimitiveType, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            PropertySchema {
                kind,
                description: description.to_string(),
            },
        );
        self
    }

    pub fn required_property(mut self, name: &str, kind: PrimitiveType, description: &str) -> Self {
        self.required.push(name.to_string());
        self.property(name, kind, description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, input_schema: InputSchema) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Bound handler: takes the shared context and the raw argument object.
pub type ToolHandler = fn(Arc<ToolContext>, Value) -> BoxFuture<'static, Result<ToolResult, ToolError>>;

pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub handler: ToolHandler,
}

#[derive(Default)]
pub struct Registry {
    tools: Vec<RegisteredTool>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tool. A later registration under an existing name is ignored.
    pub fn register(mut self, descriptor: ToolDescriptor, handler: ToolHandler) -> Self {
        if self.tools.iter().any(|t| t.descriptor.name == descriptor.name) {
            tracing::warn!(tool = %descriptor.name, "duplicate tool registration ignored");
            return self;
        }
        self.tools.push(RegisteredTool { descriptor, handler });
        self
    }

    /// Full catalog in declaration order.
    pub fn list(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<&RegisteredTool, ToolError> {
        self.tools
            .iter()
            .find(|t| t.descriptor.name == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
