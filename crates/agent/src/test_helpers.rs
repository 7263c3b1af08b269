//! Shared test helpers for agent tests.

use chrono::{FixedOffset, TimeZone};
use hrdesk_core::error::ProviderError;
use hrdesk_core::message::{Message, MessageToolCall};
use hrdesk_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use hrdesk_core::tool::ToolRegistry;
use hrdesk_tools::{FixedClock, SimulatedSource};
use std::sync::{Arc, Mutex};

/// A mock provider that plays back scripted responses.
///
/// Each call to `complete` returns the next response; once the script runs
/// out the last response repeats. Every request is recorded.
pub struct ScriptedProvider {
    responses: Vec<ProviderResponse>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        assert!(!responses.is_empty(), "ScriptedProvider needs at least one response");
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers with text only.
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// A provider that first calls tools, then answers.
    pub fn tool_then_answer(tool_calls: Vec<MessageToolCall>, answer: &str) -> Self {
        Self::new(vec![
            make_tool_call_response(tool_calls, ""),
            make_text_response(answer),
        ])
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len().min(self.responses.len() - 1);
        requests.push(request);
        Ok(self.responses[index].clone())
    }
}

fn usage() -> Option<Usage> {
    Some(Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    })
}

/// Create a simple text response (no tool calls).
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: usage(),
        model: "mock-model".into(),
    }
}

/// Create a response carrying tool calls.
pub fn make_tool_call_response(tool_calls: Vec<MessageToolCall>, text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant_with_tools(text, tool_calls),
        usage: usage(),
        model: "mock-model".into(),
    }
}

pub fn make_tool_call(id: &str, name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.into(),
        name: name.into(),
        arguments: args.to_string(),
    }
}

/// The three HR tools on a clock stopped at Monday 2024-03-04 14:00 UTC.
pub fn hr_tools() -> ToolRegistry {
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 4, 14, 0, 0)
        .unwrap();
    hrdesk_tools::default_registry(Arc::new(
        SimulatedSource::new()
            .with_clock(FixedClock(now))
            .with_fixed_hours(8),
    ))
}

pub fn jane_smith() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Jane",
        "lastName": "Smith",
        "email": "jane@acme.com",
        "department": "Engineering",
        "position": "Developer",
        "startDate": "2024-01-15",
        "salary": 85000
    })
}
