//! The HR assistant: its instructions and how it is assembled from config.

use hrdesk_core::agent::AgentConfig;
use hrdesk_core::event::EventBus;
use hrdesk_core::provider::Provider;
use hrdesk_core::tool::ToolRegistry;
use std::sync::Arc;

use crate::loop_runner::AgentLoop;

/// Instructions sent as the system message of every conversation.
pub const HR_INSTRUCTIONS: &str = "You are a helpful HR assistant that helps manage employees, contracts, and working time.

When users want to:
- Create an employee: use the create-employee tool
- Create a contract: use the create-contract tool
- Check working time: use the check-working-time tool

Always provide brief, professional responses. The data will be displayed visually in cards.";

/// Build the HR assistant described by `config`.
///
/// Instructions from the config replace [`HR_INSTRUCTIONS`]; a blank
/// override is ignored.
pub fn hr_assistant(
    config: &AgentConfig,
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    event_bus: Arc<EventBus>,
) -> AgentLoop {
    let agent = AgentLoop::new(provider, &config.model, config.temperature, tools, event_bus)
        .with_max_iterations(config.max_tool_iterations);

    match config.instructions.as_deref().map(str::trim) {
        Some(custom) if !custom.is_empty() => agent.with_instructions(custom),
        _ => agent,
    }
}
