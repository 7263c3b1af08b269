//! The model boundary.
//!
//! The agent loop talks to a model only through [`Provider`]. The shipped
//! implementation speaks the OpenAI chat-completions dialect; tests plug in
//! scripted providers.

use crate::error::ProviderError;
use crate::message::{Message, MessageToolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One model call: the whole conversation plus the tools on offer.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub tools: Vec<ToolDefinition>,
}

/// A tool as the model sees it: name, prose, and the JSON Schema of its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Assistant text, tool calls, or both
    pub message: Message,
    pub usage: Option<Usage>,
    /// The model that answered, which routers may change
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An incremental piece of a streamed reply.
///
/// Tool calls arrive whole in the chunk that completes them; `usage` is
/// usually only set on the last chunk.
#[derive(Debug, Clone, Default)]
pub struct StreamChunk {
    pub content: Option<String>,
    pub tool_calls: Vec<MessageToolCall>,
    pub done: bool,
    pub usage: Option<Usage>,
}

pub type ChunkReceiver = mpsc::Receiver<Result<StreamChunk, ProviderError>>;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Short backend name, e.g. `openai` or `ollama`.
    fn name(&self) -> &str;

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Stream a reply. Backends without streaming answer in one final chunk.
    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        let response = self.complete(request).await?;
        let (tx, rx) = mpsc::channel(1);
        let chunk = StreamChunk {
            content: Some(response.message.content),
            tool_calls: response.message.tool_calls,
            done: true,
            usage: response.usage,
        };
        // The receiver is returned below, so this send cannot fail.
        let _ = tx.send(Ok(chunk)).await;
        Ok(rx)
    }

    /// Whether the backend is reachable with the configured credentials.
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}
