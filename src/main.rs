use anyhow::Result;
use clap::Parser;
use portfolio_chat::{
    backend::HttpBackend,
    chat::ChatClient,
    config, repl,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "portfolio-chat",
    version,
    about = "Ask the portfolio AI assistant about Sriram"
)]
struct Cli {
    /// Path to YAML config file (defaults to $CONFIG_PATH, then config.yaml)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Backend base URL (overrides $PORTFOLIO_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Ask a single question and exit instead of starting a chat
    #[arg(value_name = "QUESTION")]
    question: Vec<String>,
}

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging setup)
    let config = match config::load(cli.config, cli.api_url).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // stdout carries the conversation, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Using backend {}", config.backend.base_url);

    let backend = HttpBackend::new(&config.backend)?;
    let mut client = ChatClient::new(Arc::new(backend));

    if !cli.question.is_empty() {
        match client.ask(&cli.question.join(" ")).await {
            Ok(reply) => println!("{}", reply),
            Err(e) => {
                eprintln!("{}", repl::render_error(&e.user_message()));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    repl::run(
        &mut client,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    Ok(())
}
