//! `hrdesk gateway`: start the HTTP server and web chat.

use super::load_config;

pub async fn run(
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    println!("HRDesk Gateway");
    println!("   Web chat:  http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.default_model);

    hrdesk_gateway::start(config).await?;

    Ok(())
}
