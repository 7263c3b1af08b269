//! HTTP gateway for the HR assistant.
//!
//! Serves the chat API, direct tool invocation and the embedded web
//! frontend that renders tool results as cards.
//!
//! Built on Axum.

pub mod api;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, extract::State, http::HeaderValue, response::Json, routing::get};
use hrdesk_agent::{AgentLoop, hr_assistant};
use hrdesk_cards::CardLocale;
use hrdesk_config::{AppConfig, DisplayConfig, GatewayConfig};
use hrdesk_core::agent::AgentState;
use hrdesk_core::event::{DomainEvent, EventBus};
use hrdesk_core::message::Conversation;
use hrdesk_core::provider::Provider;
use hrdesk_core::tool::ToolRegistry;
use hrdesk_tools::{SimulatedSource, default_registry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// The assembled assistant: agent, tools and where cards display times.
pub struct Assistant {
    pub agent: AgentLoop,
    pub tools: Arc<ToolRegistry>,
    pub event_bus: Arc<EventBus>,
    pub locale: CardLocale,
}

impl Assistant {
    /// Build the assistant with the provider the config names.
    pub fn from_config(config: &AppConfig) -> hrdesk_core::Result<Self> {
        config.validate()?;
        let router = hrdesk_providers::build_from_config(config);
        let (provider, model) = router.resolve(&config.default_model).ok_or_else(|| {
            hrdesk_core::Error::config(format!("no provider can serve model '{}'", config.default_model))
        })?;
        Ok(Self::with_provider(config, provider, model))
    }

    /// Build the assistant around an explicit provider.
    pub fn with_provider(config: &AppConfig, provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        let source = Arc::new(SimulatedSource::from_config(&config.simulation));
        let tools = Arc::new(default_registry(source));
        let event_bus = Arc::new(EventBus::default());

        let mut agent_config = config.agent_config();
        agent_config.model = model.into();
        let agent = hr_assistant(&agent_config, provider, tools.clone(), event_bus.clone())
            .with_max_tokens(config.default_max_tokens);

        Self {
            agent,
            tools,
            event_bus,
            locale: card_locale(&config.display),
        }
    }
}

/// Card display offset: the configured one, else the host's.
pub fn card_locale(display: &DisplayConfig) -> CardLocale {
    match display.utc_offset_minutes {
        Some(minutes) => CardLocale::from_offset_minutes(minutes).unwrap_or_else(|| {
            warn!(minutes, "Display offset out of range, using UTC");
            CardLocale::utc()
        }),
        None => CardLocale::local(),
    }
}

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: AgentLoop,
    pub tools: Arc<ToolRegistry>,
    pub event_bus: Arc<EventBus>,
    pub locale: CardLocale,
    pub conversations: RwLock<HashMap<String, Conversation>>,
    /// Conversations kept before the oldest is evicted
    pub max_conversations: usize,
    pub stats: RwLock<AgentState>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(assistant: Assistant, max_conversations: usize) -> SharedState {
        Arc::new(Self {
            agent: assistant.agent,
            tools: assistant.tools,
            event_bus: assistant.event_bus,
            locale: assistant.locale,
            conversations: RwLock::new(HashMap::new()),
            max_conversations: max_conversations.max(1),
            stats: RwLock::new(AgentState::default()),
            start_time: chrono::Utc::now(),
        })
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::api_router())
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Only the gateway's own origin may call the API from a browser.
fn cors_layer(gateway: &GatewayConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    match format!("http://{}:{}", gateway.host, gateway.port).parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => cors,
    }
}

/// Log domain events and keep the `/health` counters current.
pub fn spawn_event_listener(state: SharedState) -> JoinHandle<()> {
    let mut rx = state.event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event listener lagging, events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            match event.as_ref() {
                DomainEvent::ToolExecuted {
                    tool_name,
                    call_id,
                    duration_ms,
                    ..
                } => {
                    info!(event = event.kind(), tool = %tool_name, call_id = %call_id, duration_ms, "Tool executed");
                    state.stats.write().await.tools_executed += 1;
                }
                DomainEvent::ToolRejected {
                    tool_name,
                    field,
                    reason,
                    ..
                } => {
                    warn!(event = event.kind(), tool = %tool_name, field = ?field, reason = %reason, "Tool call rejected");
                }
                DomainEvent::ResponseGenerated {
                    conversation_id,
                    model,
                    tokens_used,
                    tool_calls,
                    ..
                } => {
                    info!(
                        event = event.kind(),
                        conversation_id = %conversation_id,
                        model = %model,
                        tokens_used,
                        tool_calls,
                        "Response generated"
                    );
                    state.stats.write().await.requests_processed += 1;
                }
                DomainEvent::ErrorOccurred {
                    context,
                    error_message,
                    ..
                } => {
                    error!(event = event.kind(), context = %context, error = %error_message, "Agent error");
                }
            }
        }
    })
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    if let Some(provider) = hrdesk_providers::missing_api_key(&config) {
        warn!(provider = %provider, "No API key configured; model calls will fail until one is set");
    }

    let assistant = Assistant::from_config(&config)?;
    let state = GatewayState::new(assistant, config.gateway.max_conversations);
    spawn_event_listener(state.clone());

    let app = build_router(state.clone()).layer(cors_layer(&config.gateway));

    info!(addr = %addr, model = %state.agent.model(), tools = state.tools.len(), "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub tools: Vec<String>,
    pub uptime_secs: i64,
    #[serde(flatten)]
    pub stats: AgentState,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let mut stats = state.stats.read().await.clone();
    stats.active_conversations = state.conversations.read().await.len();

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        model: state.agent.model().into(),
        tools: state.tools.names().into_iter().map(String::from).collect(),
        uptime_secs: (chrono::Utc::now() - state.start_time).num_seconds(),
        stats,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use hrdesk_core::error::ProviderError;
    use hrdesk_core::message::{Message, MessageToolCall};
    use hrdesk_core::provider::{ProviderRequest, ProviderResponse, Usage};
    use std::sync::Mutex;

    /// Mock provider playing back scripted replies; the last one repeats.
    pub struct MockProvider {
        replies: Vec<Message>,
        calls: Mutex<usize>,
    }

    impl MockProvider {
        pub fn text(text: &str) -> Self {
            Self::script(vec![Message::assistant(text)])
        }

        /// One tool call, then a text answer.
        pub fn tool_then_text(tool: &str, arguments: serde_json::Value, text: &str) -> Self {
            Self::script(vec![
                Message::assistant_with_tools(
                    "",
                    vec![MessageToolCall {
                        id: "call_1".into(),
                        name: tool.into(),
                        arguments: arguments.to_string(),
                    }],
                ),
                Message::assistant(text),
            ])
        }

        fn script(replies: Vec<Message>) -> Self {
            Self {
                replies,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            let mut calls = self.calls.lock().unwrap();
            let reply = self.replies[(*calls).min(self.replies.len() - 1)].clone();
            *calls += 1;
            Ok(ProviderResponse {
                message: reply,
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "mock-model".into(),
            })
        }
    }

    pub fn state_with(provider: MockProvider) -> SharedState {
        let mut config = AppConfig::default();
        config.display.utc_offset_minutes = Some(0);
        let assistant = Assistant::with_provider(&config, Arc::new(provider), "mock-model");
        GatewayState::new(assistant, 2)
    }
}
