//! Agent configuration and state types.

use serde::{Deserialize, Serialize};

/// Configuration for the assistant's behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name of the assistant
    #[serde(default = "default_name")]
    pub name: String,

    /// Model identifier sent to the provider
    pub model: String,

    #[serde(default = "default_temp")]
    pub temperature: f32,

    /// Maximum tool call iterations per turn (safety limit)
    #[serde(default = "default_max_iterations")]
    pub max_tool_iterations: u32,

    /// Replaces the built-in HR instructions when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

fn default_name() -> String {
    "HR Assistant".into()
}
fn default_temp() -> f32 {
    0.7
}
fn default_max_iterations() -> u32 {
    5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            model: "gpt-4o-mini".into(),
            temperature: default_temp(),
            max_tool_iterations: default_max_iterations(),
            instructions: None,
        }
    }
}

/// Runtime counters for the gateway's `/health` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Number of chat turns processed since startup
    pub requests_processed: u64,

    /// Successful tool executions since startup
    pub tools_executed: u64,

    /// Conversations currently held in memory
    pub active_conversations: usize,
}
