//! The chat and tool API.
//!
//! Endpoints:
//!
//! - `POST /chat`                 : send a message, get the reply and cards
//! - `POST /chat/stream`          : send a message, get an SSE stream
//! - `GET  /conversations/{id}`   : a conversation's messages
//! - `GET  /tools`                : tool definitions with JSON Schemas
//! - `POST /tools/{name}`         : invoke a tool directly

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    response::sse::{Event as SseEvent, Sse},
    routing::{get, post},
};
use chrono::Utc;
use hrdesk_agent::{AgentStreamEvent, ToolOutcome};
use hrdesk_cards::{CardLocale, render_html, render_tool_output};
use hrdesk_core::error::ToolError;
use hrdesk_core::event::DomainEvent;
use hrdesk_core::message::{Conversation, ConversationId, Message, Role};
use hrdesk_core::tool::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::SharedState;

/// Build the API router. State is supplied by the caller.
pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/stream", post(chat_stream_handler))
        .route("/conversations/{id}", get(get_conversation_handler))
        .route("/tools", get(list_tools_handler))
        .route("/tools/{name}", post(invoke_tool_handler))
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    /// Existing conversation ID (omit to start a new one).
    #[serde(default)]
    conversation_id: Option<String>,
    message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub response: String,
    pub iterations: u32,
    pub tool_calls: Vec<ToolCallDto>,
    pub errors: Vec<ToolErrorDto>,
}

/// A successful tool call and its card.
#[derive(Serialize, Deserialize)]
pub struct ToolCallDto {
    pub tool: String,
    pub data: serde_json::Value,
    /// Absent when the record has no card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_html: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ToolErrorDto {
    pub tool: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDto>,
    pub count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ToolDto {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
pub struct ToolInvocationResponse {
    pub tool: String,
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_html: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ConversationDetailResponse {
    pub id: String,
    pub messages: Vec<MessageDto>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// The violating field, for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            field: None,
        }),
    )
}

// ── Conversations ─────────────────────────────────────────────────────────

/// Copy out the conversation for `id`, or start a new one.
///
/// The agent works on the copy so no lock is held across model calls.
async fn checkout(state: &SharedState, id: Option<String>) -> Conversation {
    let conversations = state.conversations.read().await;
    match id {
        Some(id) => conversations
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Conversation::with_id(ConversationId::from(id.as_str()))),
        None => Conversation::new(),
    }
}

/// Store a conversation, evicting the oldest when at capacity.
async fn store(state: &SharedState, conversation: Conversation) {
    let mut conversations = state.conversations.write().await;
    let id = conversation.id.to_string();
    evict_oldest(&mut conversations, state.max_conversations, &id);
    conversations.insert(id, conversation);
}

fn evict_oldest(conversations: &mut HashMap<String, Conversation>, max: usize, incoming: &str) {
    if conversations.len() >= max && !conversations.contains_key(incoming) {
        if let Some(oldest_key) = conversations
            .iter()
            .min_by_key(|(_, c)| c.created_at)
            .map(|(k, _)| k.clone())
        {
            info!(conversation_id = %oldest_key, "Evicting oldest conversation");
            conversations.remove(&oldest_key);
        }
    }
}

fn card_html(tool: &str, data: &serde_json::Value, locale: &CardLocale) -> Option<String> {
    match render_tool_output(tool, data, locale) {
        Ok(node) => Some(render_html(&node)),
        Err(e) => {
            warn!(tool = %tool, error = %e, "No card for tool output");
            None
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message must not be empty"));
    }

    let mut conversation = checkout(&state, payload.conversation_id).await;
    info!(conversation_id = %conversation.id, "chat request");
    conversation.push(Message::user(&payload.message));

    let reply = state
        .agent
        .process(&mut conversation)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Agent error: {e}")))?;

    let conversation_id = conversation.id.to_string();
    store(&state, conversation).await;

    let mut tool_calls = Vec::new();
    let mut errors = Vec::new();
    for outcome in reply.tool_outputs {
        match outcome {
            ToolOutcome::Succeeded { tool, data, .. } => {
                let card_html = card_html(&tool, &data, &state.locale);
                tool_calls.push(ToolCallDto { tool, data, card_html });
            }
            ToolOutcome::Failed { tool, error, field, .. } => {
                errors.push(ToolErrorDto { tool, error, field });
            }
        }
    }

    Ok(Json(ChatResponse {
        conversation_id,
        response: reply.text,
        iterations: reply.iterations,
        tool_calls,
        errors,
    }))
}

/// `POST /chat/stream`: the agent's events as SSE.
///
/// Successful `tool_result` events carry the rendered card in `card_html`.
async fn chat_stream_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message must not be empty"));
    }

    let mut conversation = checkout(&state, payload.conversation_id).await;
    info!(conversation_id = %conversation.id, "chat/stream SSE request");
    conversation.push(Message::user(&payload.message));

    let (rx, handle) = state.agent.process_stream(conversation);

    let store_state = state.clone();
    tokio::spawn(async move {
        match handle.await {
            Ok(conversation) => store(&store_state, conversation).await,
            Err(e) => warn!(error = %e, "Streaming turn panicked; conversation not stored"),
        }
    });

    let locale = state.locale;
    let stream = ReceiverStream::new(rx).map(move |event| {
        Ok(sse_event(&event, &locale).unwrap_or_else(|e| {
            warn!(error = %e, event = event.event_type(), "Stream event not encodable");
            SseEvent::default()
                .event("error")
                .data(serde_json::json!({ "type": "error", "message": e.to_string() }).to_string())
        }))
    });

    Ok(Sse::new(stream))
}

fn sse_event(event: &AgentStreamEvent, locale: &CardLocale) -> hrdesk_core::Result<SseEvent> {
    let mut data = serde_json::to_value(event)?;
    if let AgentStreamEvent::ToolResult {
        name,
        data: Some(record),
        ..
    } = event
    {
        if let Some(html) = card_html(name, record, locale) {
            data["card_html"] = serde_json::Value::String(html);
        }
    }
    Ok(SseEvent::default().event(event.event_type()).data(data.to_string()))
}

async fn get_conversation_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationDetailResponse>, StatusCode> {
    let conversations = state.conversations.read().await;
    let conv = conversations.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ConversationDetailResponse {
        id: conv.id.to_string(),
        messages: conv
            .messages
            .iter()
            .map(|m| MessageDto {
                id: m.id.clone(),
                role: m.role.clone(),
                content: m.content.clone(),
                tool_call_id: m.tool_call_id.clone(),
                timestamp: m.timestamp.to_rfc3339(),
            })
            .collect(),
        created_at: conv.created_at.to_rfc3339(),
        updated_at: conv.updated_at.to_rfc3339(),
    }))
}

async fn list_tools_handler(State(state): State<SharedState>) -> Json<ToolListResponse> {
    let defs = state.tools.definitions();
    let count = defs.len();

    Json(ToolListResponse {
        tools: defs
            .into_iter()
            .map(|d| ToolDto {
                name: d.name,
                description: d.description,
                parameters: d.parameters,
            })
            .collect(),
        count,
    })
}

/// `POST /tools/{name}`: run one tool on the request body, no model involved.
async fn invoke_tool_handler(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Json(arguments): Json<serde_json::Value>,
) -> Result<Json<ToolInvocationResponse>, ApiError> {
    let call = ToolCall {
        id: format!("direct_{}", uuid::Uuid::new_v4().simple()),
        name,
        arguments,
    };
    let start = std::time::Instant::now();

    match state.tools.execute(&call).await {
        Ok(result) => {
            state.event_bus.publish(DomainEvent::ToolExecuted {
                tool_name: call.name.clone(),
                call_id: call.id.clone(),
                duration_ms: start.elapsed().as_millis() as u64,
                timestamp: Utc::now(),
            });
            let card_html = card_html(&result.tool, &result.data, &state.locale);
            Ok(Json(ToolInvocationResponse {
                tool: result.tool,
                data: result.data,
                card_html,
            }))
        }
        Err(e) => {
            let field = e.validation().map(|v| v.field.clone());
            state.event_bus.publish(DomainEvent::ToolRejected {
                tool_name: call.name.clone(),
                field: field.clone(),
                reason: e.to_string(),
                timestamp: Utc::now(),
            });
            let status = match e {
                ToolError::NotFound(_) => StatusCode::NOT_FOUND,
                ToolError::InvalidArguments(_) | ToolError::Validation { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ToolError::ExecutionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                    field,
                }),
            ))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
