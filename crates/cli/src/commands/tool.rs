//! `hrdesk tool` and `hrdesk tools`: run the HR tools without a model.

use hrdesk_core::tool::{ToolCall, ToolRegistry};
use hrdesk_gateway::card_locale;
use hrdesk_tools::{SimulatedSource, default_registry};
use std::sync::Arc;

use super::{load_config, print_card};

fn registry(config: &hrdesk_config::AppConfig) -> ToolRegistry {
    default_registry(Arc::new(SimulatedSource::from_config(&config.simulation)))
}

/// Print every tool with its input fields.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let tools = registry(&config);

    println!();
    for def in tools.definitions() {
        println!("  {}", def.name);
        println!("      {}", def.description);
        if let Some(props) = def.parameters["properties"].as_object() {
            let required = def.parameters["required"].as_array();
            for (field, schema) in props {
                let mark = if required.is_some_and(|r| r.iter().any(|v| v == field)) {
                    "*"
                } else {
                    " "
                };
                let description = schema["description"].as_str().unwrap_or("");
                println!("      {mark} {field:<14} {description}");
            }
        }
        println!();
    }
    Ok(())
}

/// Validate `input`, run the tool and print the card (or the record).
pub async fn run(name: &str, input: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let tools = registry(&config);

    let arguments: serde_json::Value =
        serde_json::from_str(input).map_err(|e| format!("Tool input is not valid JSON: {e}"))?;

    let result = tools
        .execute(&ToolCall {
            id: "cli".into(),
            name: name.into(),
            arguments,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.data)?);
    } else {
        print_card(&result.tool, &result.data, &card_locale(&config.display));
    }
    Ok(())
}
