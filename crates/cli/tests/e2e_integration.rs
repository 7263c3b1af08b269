//! End-to-end tests for the HR assistant.
//!
//! These run the full pipeline from a user message to rendered cards:
//! agent loop, tool validation, simulated records, and the HTTP gateway.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{FixedOffset, TimeZone};
use hrdesk_agent::{AgentLoop, MAX_ITERATIONS_REPLY, ToolOutcome, hr_assistant};
use hrdesk_cards::{CardLocale, render_html, render_text, render_tool_output};
use hrdesk_config::AppConfig;
use hrdesk_core::error::ProviderError;
use hrdesk_core::event::EventBus;
use hrdesk_core::message::{Conversation, Message, MessageToolCall, Role};
use hrdesk_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use hrdesk_gateway::api::ChatResponse;
use hrdesk_gateway::{Assistant, GatewayState, build_router};
use hrdesk_tools::{FixedClock, SimulatedSource, default_registry};
use http_body_util::BodyExt;
use tower::ServiceExt;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence.
struct ScriptedProvider {
    responses: Vec<ProviderResponse>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn tool_then_text(tool_calls: Vec<MessageToolCall>, answer: &str) -> Self {
        Self::new(vec![tool_response(tool_calls), text_response(answer)])
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, n: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let n = requests.len();
        requests.push(request);
        assert!(
            n < self.responses.len(),
            "ScriptedProvider exhausted: call #{n}, have {}",
            self.responses.len()
        );
        Ok(self.responses[n].clone())
    }
}

fn usage() -> Option<Usage> {
    Some(Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    })
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: usage(),
        model: "mock".into(),
    }
}

fn tool_response(tool_calls: Vec<MessageToolCall>) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant_with_tools("", tool_calls),
        usage: usage(),
        model: "mock".into(),
    }
}

fn make_tool_call(id: &str, name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: args.to_string(),
    }
}

fn jane() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Jane",
        "lastName": "Smith",
        "email": "jane.smith@acme.com",
        "department": "Engineering",
        "position": "Developer",
        "startDate": "2024-01-15",
        "salary": 85000
    })
}

fn utc_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.display.utc_offset_minutes = Some(0);
    config
}

/// An agent whose tools see Monday 2024-03-04 14:00 UTC.
fn agent_at_two_pm(provider: Arc<ScriptedProvider>, event_bus: Arc<EventBus>) -> AgentLoop {
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 4, 14, 0, 0)
        .unwrap();
    let source = SimulatedSource::new()
        .with_clock(FixedClock(now))
        .with_fixed_hours(8);
    let tools = Arc::new(default_registry(Arc::new(source)));
    hr_assistant(&utc_config().agent_config(), provider, tools, event_bus)
}

// ── E2E: Agent to card ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_create_employee_renders_card() {
    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![make_tool_call("call_1", "create-employee", jane())],
        "Jane Smith has been added to Engineering.",
    ));
    let assistant = Assistant::with_provider(&utc_config(), provider.clone(), "mock");

    let mut conv = Conversation::new();
    conv.push(Message::user("Add Jane Smith to Engineering as a developer"));
    let reply = assistant.agent.process(&mut conv).await.unwrap();

    assert_eq!(reply.text, "Jane Smith has been added to Engineering.");
    assert_eq!(reply.iterations, 2);
    assert_eq!(provider.calls(), 2);

    let outcome = reply.successes().next().expect("one successful tool call");
    let data = outcome.data().unwrap();
    assert_eq!(data["status"], "active");
    assert!(data["employeeId"].as_str().unwrap().starts_with("EMP-"));

    let card = render_tool_output(outcome.tool(), data, &assistant.locale).unwrap();
    let text = render_text(&card);
    assert!(text.contains("Jane Smith"));
    assert!(text.contains("$85,000"));
    assert!(text.contains("January 15, 2024"));

    // The model saw the record as a tool message on its second call
    let second = provider.request(1);
    let tool_msg = second
        .messages
        .iter()
        .find(|m| m.role == Role::Tool)
        .expect("tool result fed back");
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
    assert!(tool_msg.content.contains("jane.smith@acme.com"));
}

#[tokio::test]
async fn e2e_working_time_card_shows_live_status() {
    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![make_tool_call(
            "call_wt",
            "check-working-time",
            serde_json::json!({"employeeId": "EMP-42"}),
        )],
        "EMP-42 is currently working.",
    ));
    let agent = agent_at_two_pm(provider, Arc::new(EventBus::default()));

    let mut conv = Conversation::new();
    conv.push(Message::user("Is EMP-42 at work?"));
    let reply = agent.process(&mut conv).await.unwrap();

    let data = reply.tool_outputs[0].data().unwrap();
    assert_eq!(data["status"], "working");
    assert_eq!(data["totalHours"], 5.0);

    let card = render_tool_output("check-working-time", data, &CardLocale::utc()).unwrap();
    assert_eq!(card.find_tile("Clock In"), Some("9:00 AM"));
    let html = render_html(&card);
    assert!(html.contains("animate-pulse"));
    assert!(html.contains("EMP-42"));
}

#[tokio::test]
async fn e2e_missing_field_then_clarified_in_same_conversation() {
    let mut incomplete = jane();
    incomplete.as_object_mut().unwrap().remove("salary");

    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![make_tool_call("call_a", "create-employee", incomplete)]),
        text_response("What is Jane's annual salary?"),
        tool_response(vec![make_tool_call("call_b", "create-employee", jane())]),
        text_response("Done. Jane is on the payroll."),
    ]));
    let event_bus = Arc::new(EventBus::default());
    let mut events = event_bus.subscribe();
    let agent = agent_at_two_pm(provider.clone(), event_bus);

    let mut conv = Conversation::new();
    conv.push(Message::user("Hire Jane Smith as a developer"));
    let first = agent.process(&mut conv).await.unwrap();
    assert_eq!(first.text, "What is Jane's annual salary?");
    match &first.tool_outputs[0] {
        ToolOutcome::Failed { field, .. } => assert_eq!(field.as_deref(), Some("salary")),
        other => panic!("expected a validation failure, got {other:?}"),
    }

    conv.push(Message::user("85k"));
    let second = agent.process(&mut conv).await.unwrap();
    assert_eq!(second.successes().count(), 1);
    assert_eq!(second.text, "Done. Jane is on the payroll.");

    // The clarifying turn carried the full history
    let last = provider.request(3);
    assert!(last.messages.iter().any(|m| m.content.contains("85k")));
    assert!(
        last.messages
            .iter()
            .any(|m| m.role == Role::Tool && m.content.starts_with("Error:"))
    );

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(event.kind());
    }
    assert!(kinds.contains(&"tool_rejected"));
    assert!(kinds.contains(&"tool_executed"));
}

#[tokio::test]
async fn e2e_contract_and_employee_in_one_turn() {
    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![
            make_tool_call("call_e", "create-employee", jane()),
            make_tool_call(
                "call_c",
                "create-contract",
                serde_json::json!({
                    "employeeId": "EMP-1",
                    "contractType": "full-time",
                    "startDate": "2024-01-15",
                    "salary": 85000,
                    "workingHours": 40
                }),
            ),
        ],
        "Jane is hired with a permanent full-time contract.",
    ));
    let agent = agent_at_two_pm(provider, Arc::new(EventBus::default()));

    let mut conv = Conversation::new();
    conv.push(Message::user("Hire Jane and give her a contract"));
    let reply = agent.process(&mut conv).await.unwrap();

    let tools: Vec<&str> = reply.tool_outputs.iter().map(|o| o.tool()).collect();
    assert_eq!(tools, vec!["create-employee", "create-contract"]);

    let contract = reply.tool_outputs[1].data().unwrap();
    assert_eq!(contract["status"], "active");
    let card = render_tool_output("create-contract", contract, &CardLocale::utc()).unwrap();
    assert_eq!(card.find_tile("End Date"), Some("Permanent"));
    assert!(render_text(&card).contains("40 hrs/week"));
}

#[tokio::test]
async fn e2e_runaway_tool_calls_stop_at_limit() {
    let looping = tool_response(vec![make_tool_call(
        "call_x",
        "check-working-time",
        serde_json::json!({"employeeId": "EMP-7"}),
    )]);
    let provider = Arc::new(ScriptedProvider::new(vec![looping; 3]));
    let agent = agent_at_two_pm(provider.clone(), Arc::new(EventBus::default()))
        .with_max_iterations(3);

    let mut conv = Conversation::new();
    conv.push(Message::user("check EMP-7 forever"));
    let reply = agent.process(&mut conv).await.unwrap();

    assert_eq!(reply.text, MAX_ITERATIONS_REPLY);
    assert_eq!(provider.calls(), 3);
}

// ── E2E: Gateway ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_gateway_chat_returns_cards() {
    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![make_tool_call("call_1", "create-employee", jane())],
        "Created.",
    ));
    let assistant = Assistant::with_provider(&utc_config(), provider, "mock");
    let state = GatewayState::new(assistant, 10);
    let app = build_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"message":"Add Jane Smith"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let chat: ChatResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(chat.response, "Created.");
    assert!(chat.errors.is_empty());
    let card = chat.tool_calls[0].card_html.as_deref().unwrap();
    assert!(card.contains("Jane Smith"));
    assert!(card.contains("data-lucide"));

    assert!(
        state
            .conversations
            .read()
            .await
            .contains_key(&chat.conversation_id)
    );
}

#[tokio::test]
async fn e2e_assistant_uses_configured_instructions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_model = "mock"

[agent]
instructions = "Only answer questions about payroll."
max_tool_iterations = 2

[display]
utc_offset_minutes = 60
"#,
    )
    .unwrap();
    let config = AppConfig::load_from(&path).unwrap();

    let provider = Arc::new(ScriptedProvider::new(vec![text_response("Payroll only.")]));
    let assistant = Assistant::with_provider(&config, provider.clone(), "mock");
    assert_eq!(assistant.locale, CardLocale::from_offset_minutes(60).unwrap());

    let mut conv = Conversation::new();
    conv.push(Message::user("hello"));
    assistant.agent.process(&mut conv).await.unwrap();

    let request = provider.request(0);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content, "Only answer questions about payroll.");
    assert_eq!(request.tools.len(), 3);
}
