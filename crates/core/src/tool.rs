//! Tool trait: the abstraction over agent capabilities.
//!
//! A tool is a named operation with a declared input schema, a declared
//! output schema and an execute step. The [`ToolRegistry`] owns the
//! validation boundary: input is checked before `execute` runs and the
//! produced value is checked before it leaves the registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Direction, ToolError};
use crate::provider::ToolDefinition;
use crate::schema::Schema;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a validated tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// The tool that produced it
    pub tool: String,

    /// Pretty-printed JSON of `data`, suitable for feeding back to the model
    pub output: String,

    /// The structured record, already checked against the output schema
    pub data: serde_json::Value,
}

/// The core Tool trait.
///
/// Implementations only need to produce a value; schema checks are done by
/// the registry, never by the tool itself.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "create-employee").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// Shape of the accepted arguments.
    fn input_schema(&self) -> &Schema;

    /// Shape of the produced record.
    fn output_schema(&self) -> &Schema;

    /// Produce a record from already-validated arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.input_schema().to_json_schema(),
        }
    }
}

/// A registry of available tools, keyed by name.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Look up and execute tools when the LLM requests them
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM), sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call with input and output validation.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        tool.input_schema()
            .validate(&call.arguments)
            .map_err(|source| ToolError::Validation {
                tool: call.name.clone(),
                direction: Direction::Input,
                source,
            })?;

        let data = tool.execute(call.arguments.clone()).await?;

        tool.output_schema()
            .validate(&data)
            .map_err(|source| ToolError::Validation {
                tool: call.name.clone(),
                direction: Direction::Output,
                source,
            })?;

        debug!(tool = %call.name, call_id = %call.id, "Tool output validated");

        Ok(ToolResult {
            call_id: call.id.clone(),
            tool: call.name.clone(),
            output: serde_json::to_string_pretty(&data).map_err(|e| ToolError::ExecutionFailed {
                tool_name: call.name.clone(),
                reason: e.to_string(),
            })?,
            data,
        })
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
