//! The agent reasoning loop implementation.

use chrono::Utc;
use hrdesk_core::error::ToolError;
use hrdesk_core::event::{DomainEvent, EventBus};
use hrdesk_core::message::{Conversation, Message, MessageToolCall, Role};
use hrdesk_core::provider::{Provider, ProviderRequest, ToolDefinition, Usage};
use hrdesk_core::tool::{ToolCall, ToolRegistry, ToolResult};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::hr::HR_INSTRUCTIONS;
use crate::stream_event::AgentStreamEvent;

/// Reply used when the model keeps calling tools past the iteration limit.
pub const MAX_ITERATIONS_REPLY: &str =
    "I've reached the maximum number of tool call iterations. Please provide further guidance.";

/// What happened to one distinct tool call during a turn.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Succeeded {
        call_id: String,
        tool: String,
        data: serde_json::Value,
    },
    Failed {
        call_id: String,
        tool: String,
        error: String,
        /// The violating field, for schema failures
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },
}

impl ToolOutcome {
    pub fn tool(&self) -> &str {
        match self {
            Self::Succeeded { tool, .. } | Self::Failed { tool, .. } => tool,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The validated record, if the call succeeded.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Succeeded { data, .. } => Some(data),
            Self::Failed { .. } => None,
        }
    }
}

/// The result of one user turn.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    /// The model's final text
    pub text: String,

    /// Every distinct tool call of the turn, in call order
    pub tool_outputs: Vec<ToolOutcome>,

    /// Model round-trips used
    pub iterations: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl AgentReply {
    pub fn successes(&self) -> impl Iterator<Item = &ToolOutcome> {
        self.tool_outputs.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ToolOutcome> {
        self.tool_outputs.iter().filter(|o| !o.is_success())
    }
}

/// The core agent loop that orchestrates LLM calls and tool execution.
///
/// Cheap to clone: every heavy part sits behind an `Arc`.
#[derive(Clone)]
pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    /// Always sent as the first (system) message
    instructions: String,
    /// Maximum model round-trips per turn
    max_iterations: u32,
    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    /// Create a new agent loop with the HR instructions.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            instructions: HR_INSTRUCTIONS.to_string(),
            max_iterations: 5,
            event_bus,
        }
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Replace the instruction string.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Process the conversation's latest user message.
    ///
    /// Loops until the model answers with text only or the iteration limit
    /// is hit. Tool failures never abort the turn; they are reported back
    /// to the model as `Error: ...` so it can ask for what is missing.
    /// Provider failures do abort it.
    pub async fn process(
        &self,
        conversation: &mut Conversation,
    ) -> hrdesk_core::Result<AgentReply> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing conversation"
        );

        self.install_instructions(conversation);
        let definitions = self.tools.definitions();
        let mut outcomes = Vec::new();
        let mut usage = None;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            debug!(conversation_id = %conversation.id, iteration = iterations, "Agent loop iteration");

            let response = match self.provider.complete(self.request(conversation, &definitions)).await {
                Ok(response) => response,
                Err(e) => {
                    self.publish_error(conversation, &e.to_string());
                    return Err(e.into());
                }
            };
            add_usage(&mut usage, response.usage.as_ref());

            if response.message.tool_calls.is_empty() {
                let text = response.message.content.clone();
                conversation.push(response.message);
                self.publish_response(conversation, &response.model, usage.as_ref(), outcomes.len());
                return Ok(AgentReply {
                    text,
                    tool_outputs: outcomes,
                    iterations,
                    usage,
                });
            }

            let calls = response.message.tool_calls.clone();
            conversation.push(response.message);
            outcomes.extend(self.dispatch(conversation, &calls, None).await);
        }

        warn!(conversation_id = %conversation.id, iterations, "Max tool iterations reached");
        conversation.push(Message::assistant(MAX_ITERATIONS_REPLY));
        Ok(AgentReply {
            text: MAX_ITERATIONS_REPLY.into(),
            tool_outputs: outcomes,
            iterations,
            usage,
        })
    }

    /// Streaming variant of [`process`](Self::process).
    ///
    /// Events arrive on the receiver as they happen and always end with
    /// `done` or `error`. The handle yields the updated conversation once
    /// the turn is over.
    pub fn process_stream(
        &self,
        mut conversation: Conversation,
    ) -> (mpsc::Receiver<AgentStreamEvent>, JoinHandle<Conversation>) {
        let (tx, rx) = mpsc::channel(128);
        let agent = self.clone();

        let handle = tokio::spawn(async move {
            if let Err(message) = agent.run_stream(&mut conversation, &tx).await {
                let _ = tx.send(AgentStreamEvent::Error { message }).await;
            }
            conversation
        });

        (rx, handle)
    }

    async fn run_stream(
        &self,
        conversation: &mut Conversation,
        tx: &mpsc::Sender<AgentStreamEvent>,
    ) -> Result<(), String> {
        self.install_instructions(conversation);
        let definitions = self.tools.definitions();
        let mut usage = None;
        let mut iterations = 0;
        let mut tool_calls_made = 0;

        loop {
            if iterations >= self.max_iterations {
                warn!(conversation_id = %conversation.id, iterations, "Max tool iterations reached");
                let _ = tx
                    .send(AgentStreamEvent::Chunk {
                        content: MAX_ITERATIONS_REPLY.into(),
                    })
                    .await;
                conversation.push(Message::assistant(MAX_ITERATIONS_REPLY));
                break;
            }
            iterations += 1;

            let mut stream_rx = match self.provider.stream(self.request(conversation, &definitions)).await {
                Ok(rx) => rx,
                Err(e) => {
                    self.publish_error(conversation, &e.to_string());
                    return Err(format!("Provider error: {e}"));
                }
            };

            let mut content = String::new();
            let mut calls: Vec<MessageToolCall> = Vec::new();

            while let Some(chunk) = stream_rx.recv().await {
                let chunk = chunk.map_err(|e| format!("Stream error: {e}"))?;

                if let Some(text) = chunk.content.filter(|t| !t.is_empty()) {
                    content.push_str(&text);
                    let _ = tx.send(AgentStreamEvent::Chunk { content: text }).await;
                }

                for tc in chunk.tool_calls {
                    match calls.iter_mut().find(|c| c.id == tc.id) {
                        Some(existing) => existing.arguments.push_str(&tc.arguments),
                        None => calls.push(tc),
                    }
                }

                add_usage(&mut usage, chunk.usage.as_ref());
            }

            if calls.is_empty() {
                conversation.push(Message::assistant(content));
                self.publish_response(conversation, &self.model, usage.as_ref(), tool_calls_made);
                break;
            }

            conversation.push(Message::assistant_with_tools(content, calls.clone()));
            tool_calls_made += self.dispatch(conversation, &calls, Some(tx)).await.len();
        }

        let _ = tx
            .send(AgentStreamEvent::Done {
                conversation_id: conversation.id.to_string(),
                usage,
                iterations,
                tool_calls_made,
            })
            .await;
        Ok(())
    }

    /// Make the instruction string the first message.
    fn install_instructions(&self, conversation: &mut Conversation) {
        match conversation.messages.first_mut() {
            Some(first) if first.role == Role::System => {
                first.content.clone_from(&self.instructions);
            }
            _ => conversation
                .messages
                .insert(0, Message::system(self.instructions.clone())),
        }
    }

    fn request(
        &self,
        conversation: &Conversation,
        definitions: &[ToolDefinition],
    ) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: conversation.messages.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: definitions.to_vec(),
        }
    }

    /// Execute one model response's tool calls and append their results.
    ///
    /// Calls with the same tool and the same arguments run once; the
    /// repeats are answered with the first call's result.
    async fn dispatch(
        &self,
        conversation: &mut Conversation,
        calls: &[MessageToolCall],
        events: Option<&mpsc::Sender<AgentStreamEvent>>,
    ) -> Vec<ToolOutcome> {
        debug!(tool_count = calls.len(), "Executing tool calls");
        let mut answered: HashMap<(String, String), String> = HashMap::new();
        let mut outcomes = Vec::new();

        for tc in calls {
            let arguments = parse_arguments(&tc.arguments);
            let key = (
                tc.name.clone(),
                arguments
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|_| tc.arguments.clone()),
            );

            if let Some(content) = answered.get(&key) {
                debug!(tool = %tc.name, call_id = %tc.id, "Duplicate tool call answered from first result");
                conversation.push(Message::tool_result(&tc.id, content));
                continue;
            }

            if let Some(tx) = events {
                let input = arguments.as_ref().cloned().unwrap_or(serde_json::Value::Null);
                let _ = tx
                    .send(AgentStreamEvent::ToolCall {
                        id: tc.id.clone(),
                        name: tc.name.clone(),
                        input,
                    })
                    .await;
            }

            let start = std::time::Instant::now();
            let result = match arguments {
                Ok(arguments) => {
                    self.tools
                        .execute(&ToolCall {
                            id: tc.id.clone(),
                            name: tc.name.clone(),
                            arguments,
                        })
                        .await
                }
                Err(e) => Err(e),
            };
            let duration_ms = start.elapsed().as_millis() as u64;

            let (content, outcome) = self.observe(tc, result, duration_ms);

            if let Some(tx) = events {
                let (success, data, error) = match &outcome {
                    ToolOutcome::Succeeded { data, .. } => (true, Some(data.clone()), None),
                    ToolOutcome::Failed { error, .. } => (false, None, Some(error.clone())),
                };
                let _ = tx
                    .send(AgentStreamEvent::ToolResult {
                        id: tc.id.clone(),
                        name: tc.name.clone(),
                        success,
                        data,
                        error,
                    })
                    .await;
            }

            conversation.push(Message::tool_result(&tc.id, &content));
            answered.insert(key, content);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Turn a tool result into the text the model sees and the outcome the
    /// caller sees, publishing the matching domain event.
    fn observe(
        &self,
        tc: &MessageToolCall,
        result: Result<ToolResult, ToolError>,
        duration_ms: u64,
    ) -> (String, ToolOutcome) {
        match result {
            Ok(tool_result) => {
                self.event_bus.publish(DomainEvent::ToolExecuted {
                    tool_name: tc.name.clone(),
                    call_id: tc.id.clone(),
                    duration_ms,
                    timestamp: Utc::now(),
                });
                (
                    tool_result.output,
                    ToolOutcome::Succeeded {
                        call_id: tc.id.clone(),
                        tool: tc.name.clone(),
                        data: tool_result.data,
                    },
                )
            }
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool call rejected");
                let field = e.validation().map(|v| v.field.clone());
                self.event_bus.publish(DomainEvent::ToolRejected {
                    tool_name: tc.name.clone(),
                    field: field.clone(),
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                (
                    format!("Error: {e}"),
                    ToolOutcome::Failed {
                        call_id: tc.id.clone(),
                        tool: tc.name.clone(),
                        error: e.to_string(),
                        field,
                    },
                )
            }
        }
    }

    fn publish_response(
        &self,
        conversation: &Conversation,
        model: &str,
        usage: Option<&Usage>,
        tool_calls: usize,
    ) {
        self.event_bus.publish(DomainEvent::ResponseGenerated {
            conversation_id: conversation.id.to_string(),
            model: model.to_string(),
            tokens_used: usage.map_or(0, |u| u.total_tokens),
            tool_calls,
            timestamp: Utc::now(),
        });
    }

    fn publish_error(&self, conversation: &Conversation, message: &str) {
        warn!(conversation_id = %conversation.id, error = %message, "Provider call failed");
        self.event_bus.publish(DomainEvent::ErrorOccurred {
            context: format!("conversation {}", conversation.id),
            error_message: message.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// Parse the model's argument string. An empty string means no arguments.
fn parse_arguments(raw: &str) -> Result<serde_json::Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw)
        .map_err(|e| ToolError::InvalidArguments(format!("arguments are not valid JSON: {e}")))
}

fn add_usage(total: &mut Option<Usage>, usage: Option<&Usage>) {
    if let Some(u) = usage {
        let t = total.get_or_insert(Usage {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
        });
        t.prompt_tokens += u.prompt_tokens;
        t.completion_tokens += u.completion_tokens;
        t.total_tokens += u.total_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use hrdesk_core::error::ProviderError;
    use hrdesk_core::provider::ProviderResponse;

    fn agent(provider: Arc<dyn Provider>) -> (AgentLoop, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        let agent = AgentLoop::new(provider, "gpt-4o-mini", 0.2, Arc::new(hr_tools()), bus.clone());
        (agent, bus)
    }

    fn user(text: &str) -> Conversation {
        let mut conv = Conversation::new();
        conv.push(Message::user(text));
        conv
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(ScriptedProvider::single_text("Hello! How can I help?"));
        let (agent, _) = agent(provider.clone());

        let mut conv = user("Hello!");
        let reply = agent.process(&mut conv).await.unwrap();

        assert_eq!(reply.text, "Hello! How can I help?");
        assert!(reply.tool_outputs.is_empty());
        assert_eq!(reply.iterations, 1);
        // System + User + Assistant
        assert_eq!(conv.messages.len(), 3);
        assert_eq!(conv.messages[0].role, Role::System);
        assert_eq!(conv.messages[0].content, HR_INSTRUCTIONS);

        let requests = provider.requests();
        assert_eq!(requests[0].tools.len(), 3);
        assert_eq!(requests[0].model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn tool_output_is_surfaced() {
        let provider = Arc::new(ScriptedProvider::tool_then_answer(
            vec![make_tool_call("call_1", "create-employee", jane_smith())],
            "Jane Smith has been added.",
        ));
        let (agent, _) = agent(provider.clone());

        let mut conv = user("Add Jane Smith to Engineering");
        let reply = agent.process(&mut conv).await.unwrap();

        assert_eq!(reply.text, "Jane Smith has been added.");
        assert_eq!(reply.iterations, 2);
        assert_eq!(reply.tool_outputs.len(), 1);
        let data = reply.tool_outputs[0].data().unwrap();
        assert_eq!(data["firstName"], "Jane");
        assert_eq!(data["status"], "active");
        assert!(data["employeeId"].as_str().unwrap().starts_with("EMP-"));
        assert_eq!(reply.usage.as_ref().unwrap().total_tokens, 30);

        // The second model call saw the tool result
        let second = &provider.requests()[1];
        let tool_msg = second.messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_msg.content.contains("Engineering"));
    }

    #[tokio::test]
    async fn validation_failure_is_fed_back_to_the_model() {
        let mut args = jane_smith();
        args["email"] = serde_json::json!("not-an-email");
        let provider = Arc::new(ScriptedProvider::tool_then_answer(
            vec![make_tool_call("call_1", "create-employee", args)],
            "Could you give me a valid email address?",
        ));
        let (agent, bus) = agent(provider.clone());
        let mut events = bus.subscribe();

        let mut conv = user("Add Jane");
        let reply = agent.process(&mut conv).await.unwrap();

        assert_eq!(reply.failures().count(), 1);
        match &reply.tool_outputs[0] {
            ToolOutcome::Failed { field, tool, .. } => {
                assert_eq!(tool, "create-employee");
                assert_eq!(field.as_deref(), Some("email"));
            }
            other => panic!("expected failure, got {other:?}"),
        }

        let tool_msg = conv.messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert!(tool_msg.content.starts_with("Error:"));
        assert!(tool_msg.content.contains("email"));

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind(), "tool_rejected");
    }

    #[tokio::test]
    async fn unparseable_arguments_are_rejected() {
        let bad = MessageToolCall {
            id: "call_1".into(),
            name: "check-working-time".into(),
            arguments: "{employeeId: EMP-1".into(),
        };
        let provider = Arc::new(ScriptedProvider::tool_then_answer(vec![bad], "Sorry."));
        let (agent, _) = agent(provider);

        let reply = agent.process(&mut user("hours?")).await.unwrap();
        match &reply.tool_outputs[0] {
            ToolOutcome::Failed { error, field, .. } => {
                assert!(error.contains("not valid JSON"));
                assert!(field.is_none());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_calls_run_once() {
        let args = serde_json::json!({"employeeId": "EMP-1"});
        let provider = Arc::new(ScriptedProvider::tool_then_answer(
            vec![
                make_tool_call("call_a", "check-working-time", args.clone()),
                make_tool_call("call_b", "check-working-time", args),
            ],
            "John is working.",
        ));
        let (agent, bus) = agent(provider);
        let mut events = bus.subscribe();

        let mut conv = user("Is EMP-1 at work?");
        let reply = agent.process(&mut conv).await.unwrap();

        assert_eq!(reply.tool_outputs.len(), 1);
        let tool_msgs: Vec<_> = conv.messages.iter().filter(|m| m.role == Role::Tool).collect();
        assert_eq!(tool_msgs.len(), 2);
        assert_eq!(tool_msgs[0].content, tool_msgs[1].content);
        assert_eq!(tool_msgs[1].tool_call_id.as_deref(), Some("call_b"));

        // One execution, then the final response
        assert_eq!(events.recv().await.unwrap().kind(), "tool_executed");
        assert_eq!(events.recv().await.unwrap().kind(), "response_generated");
    }

    #[tokio::test]
    async fn iteration_limit_stops_the_loop() {
        let looping = make_tool_call_response(
            vec![make_tool_call("call_x", "check-working-time", serde_json::json!({"employeeId": "EMP-1"}))],
            "",
        );
        let provider = Arc::new(ScriptedProvider::new(vec![looping]));
        let (agent, _) = agent(provider.clone());
        let agent = agent.with_max_iterations(3);

        let reply = agent.process(&mut user("loop")).await.unwrap();
        assert_eq!(reply.text, MAX_ITERATIONS_REPLY);
        assert_eq!(reply.iterations, 3);
        assert_eq!(provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn custom_instructions_replace_existing_system_message() {
        let provider = Arc::new(ScriptedProvider::single_text("ok"));
        let (agent, _) = agent(provider.clone());
        let agent = agent.with_instructions("Answer in French.");

        let mut conv = Conversation::new();
        conv.push(Message::system("stale"));
        conv.push(Message::user("Bonjour"));
        agent.process(&mut conv).await.unwrap();

        assert_eq!(conv.messages[0].content, "Answer in French.");
        assert_eq!(conv.messages.iter().filter(|m| m.role == Role::System).count(), 1);
        assert_eq!(provider.requests()[0].messages[0].content, "Answer in French.");
    }

    struct DownProvider;

    #[async_trait::async_trait]
    impl Provider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn provider_errors_abort_the_turn() {
        let (agent, bus) = agent(Arc::new(DownProvider));
        let mut events = bus.subscribe();

        let err = agent.process(&mut user("hi")).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(events.recv().await.unwrap().kind(), "error_occurred");
    }

    #[tokio::test]
    async fn stream_text_only() {
        let provider = Arc::new(ScriptedProvider::single_text("Final answer"));
        let (agent, _) = agent(provider);

        let (mut rx, handle) = agent.process_stream(user("Hello"));
        let mut events = vec![];
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert!(matches!(&events[0], AgentStreamEvent::Chunk { content } if content == "Final answer"));
        match events.last().unwrap() {
            AgentStreamEvent::Done { iterations, tool_calls_made, .. } => {
                assert_eq!(*iterations, 1);
                assert_eq!(*tool_calls_made, 0);
            }
            other => panic!("Expected Done, got {other:?}"),
        }

        let conv = handle.await.unwrap();
        assert_eq!(conv.messages.last().unwrap().content, "Final answer");
    }

    #[tokio::test]
    async fn stream_with_tool_calls() {
        let provider = Arc::new(ScriptedProvider::tool_then_answer(
            vec![make_tool_call(
                "call_1",
                "create-contract",
                serde_json::json!({
                    "employeeId": "EMP-1",
                    "contractType": "full-time",
                    "startDate": "2024-01-01",
                    "salary": 90000,
                    "workingHours": 40
                }),
            )],
            "Contract created.",
        ));
        let (agent, _) = agent(provider);

        let (mut rx, handle) = agent.process_stream(user("Contract for EMP-1"));
        let mut events = vec![];
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        let names: Vec<_> = events.iter().map(|e| e.event_type()).collect();
        assert!(names.contains(&"tool_call"));
        assert!(names.contains(&"tool_result"));
        assert_eq!(names.last(), Some(&"done"));

        let data = events
            .iter()
            .find_map(|e| match e {
                AgentStreamEvent::ToolResult { success: true, data, .. } => data.clone(),
                _ => None,
            })
            .unwrap();
        assert_eq!(data["contractType"], "full-time");

        let conv = handle.await.unwrap();
        assert!(conv.messages.iter().any(|m| m.role == Role::Tool));
    }

    #[tokio::test]
    async fn stream_reports_provider_errors() {
        let (agent, _) = agent(Arc::new(DownProvider));
        let (mut rx, _handle) = agent.process_stream(user("hi"));
        match rx.recv().await.unwrap() {
            AgentStreamEvent::Error { message } => assert!(message.contains("connection refused")),
            other => panic!("Expected Error, got {other:?}"),
        }
    }
}
