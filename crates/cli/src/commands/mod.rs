pub mod agent;
pub mod doctor;
pub mod gateway;
pub mod onboard;
pub mod tool;

use hrdesk_cards::{CardLocale, render_text, render_tool_output};
use hrdesk_config::AppConfig;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load().map_err(|e| format!("Failed to load config: {e}").into())
}

/// Print a record as a terminal card, or as JSON when it has none.
pub(crate) fn print_card(tool: &str, data: &serde_json::Value, locale: &CardLocale) {
    match render_tool_output(tool, data, locale) {
        Ok(node) => {
            for line in render_text(&node).lines() {
                println!("  {line}");
            }
        }
        Err(e) => {
            tracing::warn!(tool, error = %e, "No card for tool output");
            println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
        }
    }
}
