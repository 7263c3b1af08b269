//! # HRDesk Core
//!
//! Domain types, traits, and error definitions for the HRDesk assistant.
//! Record shapes, the schema type that guards the tool boundary, and the
//! traits every other crate implements against all live here.
//!
//! ## Layout
//!
//! - [`schema`]: field-level record descriptions and validation
//! - [`record`]: the employee, contract and working-time records
//! - [`tool`]: the `Tool` trait and the validating `ToolRegistry`
//! - [`provider`]: the LLM backend abstraction
//! - [`event`]: domain events on a broadcast bus

pub mod error;
pub mod message;
pub mod provider;
pub mod schema;
pub mod record;
pub mod tool;
pub mod agent;
pub mod event;

// Re-export key types at crate root for ergonomics
pub use error::{Direction, Error, ProviderError, Result, ToolError};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolDefinition};
pub use schema::{FieldKind, FieldSpec, Schema, ValidationError, ValidationIssue};
pub use record::{BreakInterval, Contract, ContractType, Employee, RecordStatus, WorkStatus, WorkingTimeRecord};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
pub use agent::{AgentConfig, AgentState};
pub use event::{DomainEvent, EventBus};
