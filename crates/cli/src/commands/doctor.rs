//! `hrdesk doctor`: diagnose the setup.

use hrdesk_config::AppConfig;
use hrdesk_providers::{build_from_config, missing_api_key};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("HRDesk Doctor");
    println!("=============\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  [ok]   Config file: {}", config_path.display());
    } else {
        println!("  [warn] No config file, using defaults. Run `hrdesk onboard`");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   Config valid");
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            println!("\n  {} issue(s) found.", issues + 1);
            return Ok(());
        }
    };

    let missing_key = missing_api_key(&config);
    match &missing_key {
        None => println!("  [ok]   API key configured (or not needed)"),
        Some(provider) => {
            println!("  [warn] No API key for {provider}. Set HRDESK_API_KEY or api_key in config.toml");
            issues += 1;
        }
    }

    let router = build_from_config(&config);
    match router.resolve(&config.default_model) {
        Some((provider, model)) => {
            println!("  [ok]   Provider {} serves model {model}", provider.name());
            if missing_key.is_none() {
                match provider.health_check().await {
                    Ok(true) => println!("  [ok]   Provider reachable"),
                    Ok(false) => {
                        println!("  [warn] Provider answered but reported unhealthy");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  [fail] Provider unreachable: {e}");
                        issues += 1;
                    }
                }
            }
        }
        None => {
            println!("  [fail] No provider for model {}", config.default_model);
            issues += 1;
        }
    }

    let sim = &config.simulation;
    println!(
        "  [ok]   Simulated workday {:02}:00-{:02}:00, {}-{} hours",
        sim.workday_start_hour, sim.workday_end_hour, sim.min_hours_worked, sim.max_hours_worked
    );

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
