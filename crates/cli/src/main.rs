//! HRDesk CLI: the main entry point.
//!
//! Commands:
//! - `onboard`     : write a default config
//! - `agent`       : interactive chat or single-message mode
//! - `gateway`     : start the HTTP server and web chat
//! - `tools`       : list the HR tools
//! - `tool`        : run one tool directly and print its card
//! - `doctor`      : diagnose the setup
//! - `completions` : shell completion script

use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "hrdesk",
    about = "HRDesk: manage employees, contracts and working time by chat",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Onboard,

    /// Chat with the HR assistant
    Agent {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Start the HTTP gateway and web chat
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// List the available tools
    Tools,

    /// Run a tool directly, without the model
    Tool {
        /// Tool name, e.g. create-employee
        name: String,

        /// Tool input as a JSON object
        #[arg(default_value = "{}")]
        input: String,

        /// Print the raw record instead of the card
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and provider health
    Doctor,

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Agent { message } => commands::agent::run(message).await?,
        Commands::Gateway { port, host } => commands::gateway::run(port, host).await?,
        Commands::Tools => commands::tool::list().await?,
        Commands::Tool { name, input, json } => commands::tool::run(&name, &input, json).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "hrdesk", &mut std::io::stdout());
        }
    }

    Ok(())
}
