//! `hrdesk agent`: interactive or single-message chat.

use hrdesk_agent::{AgentReply, ToolOutcome};
use hrdesk_cards::CardLocale;
use hrdesk_config::AppConfig;
use hrdesk_core::message::{Conversation, Message};
use hrdesk_gateway::Assistant;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{load_config, print_card};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    if let Some(provider) = hrdesk_providers::missing_api_key(&config) {
        eprintln!();
        eprintln!("  ERROR: No API key configured for provider '{provider}'!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    HRDESK_API_KEY      (generic)");
        eprintln!("    OPENAI_API_KEY      (OpenAI direct)");
        eprintln!("    OPENROUTER_API_KEY  (OpenRouter)");
        eprintln!();
        eprintln!("  Local servers need no key: set default_provider = \"ollama\".");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let assistant = Assistant::from_config(&config)?;
    let agent = &assistant.agent;

    if let Some(msg) = message {
        let mut conv = Conversation::new();
        conv.push(Message::user(msg));

        eprint!("  Thinking...");
        let reply = agent.process(&mut conv).await;
        eprint!("\r              \r");
        print_reply(&reply?, &assistant.locale);
        return Ok(());
    }

    println!();
    println!("  HRDesk Assistant (interactive)");
    println!("  ------------------------------");
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", agent.model());
    println!("  Tools:     {}", assistant.tools.names().join(", "));
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut conv = Conversation::new();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        conv.push(Message::user(line));
        eprint!("  ...");
        match agent.process(&mut conv).await {
            Ok(reply) => {
                eprint!("\r     \r");
                println!();
                print_reply(&reply, &assistant.locale);
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn print_reply(reply: &AgentReply, locale: &CardLocale) {
    for outcome in &reply.tool_outputs {
        match outcome {
            ToolOutcome::Succeeded { tool, data, .. } => print_card(tool, data, locale),
            ToolOutcome::Failed { tool, error, .. } => {
                println!("  [{tool}] {error}");
            }
        }
    }
    for line in reply.text.lines() {
        println!("  Assistant > {line}");
    }
}
