//! The HR assistant's agent loop.
//!
//! The agent follows a **Plan → Act → Observe** cycle:
//!
//! 1. **Receive** a user message
//! 2. **Send** the conversation, prefixed with the HR instructions, to the LLM
//! 3. **If tool calls**: validate and execute them, append results, loop back to step 2
//! 4. **If text response**: return it along with every tool output of the turn
//!
//! The loop continues until the LLM responds with text only (no tool calls)
//! or the max iteration limit is reached.

pub mod hr;
pub mod loop_runner;
pub mod stream_event;

#[cfg(test)]
mod test_helpers;

pub use hr::{HR_INSTRUCTIONS, hr_assistant};
pub use loop_runner::{AgentLoop, AgentReply, MAX_ITERATIONS_REPLY, ToolOutcome};
pub use stream_event::AgentStreamEvent;
