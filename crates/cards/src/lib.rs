//! Presentational cards for HR records.
//!
//! Each tool's record maps to a [`Node`] tree with no I/O involved. The
//! tree renders either to HTML for the browser ([`render_html`]) or to a
//! boxed block for the terminal ([`render_text`]).
//!
//! Cards are forgiving about optional data: a missing end date, clock-in
//! or clock-out becomes a placeholder, and a date that does not parse is
//! shown as written.

pub mod contract;
pub mod employee;
pub mod format;
pub mod html;
pub mod node;
pub mod text;
pub mod working_time;

use chrono::{FixedOffset, Local, Offset, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use html::render_html;
pub use node::{Badge, Emphasis, Icon, ListRow, Node, Theme};
pub use text::render_text;

/// Errors raised while turning tool output into a card.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("No card for tool: {0}")]
    UnknownTool(String),

    #[error("{tool} output does not match its card: {reason}")]
    Shape { tool: String, reason: String },
}

/// Where times on a card are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocale {
    pub offset: FixedOffset,
}

impl CardLocale {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// A fixed offset east of UTC. Out-of-range values yield `None`.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    /// The host's current UTC offset.
    pub fn local() -> Self {
        Self {
            offset: Local::now().offset().fix(),
        }
    }
}

impl Default for CardLocale {
    fn default() -> Self {
        Self::utc()
    }
}

/// Build the card for a tool's output.
pub fn render_tool_output(
    tool: &str,
    data: &serde_json::Value,
    locale: &CardLocale,
) -> Result<Node, CardError> {
    match tool {
        "create-employee" => Ok(employee::card(&view(tool, data)?, locale)),
        "create-contract" => Ok(contract::card(&view(tool, data)?, locale)),
        "check-working-time" => Ok(working_time::card(&view(tool, data)?, locale)),
        other => Err(CardError::UnknownTool(other.to_string())),
    }
}

fn view<T: DeserializeOwned>(tool: &str, data: &serde_json::Value) -> Result<T, CardError> {
    T::deserialize(data).map_err(|e| CardError::Shape {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
