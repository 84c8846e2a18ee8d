//! ContentGuard - content compliance screening service
//!
//! Runs the HTTP API, or screens a single text from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use contentguard::{
    api,
    config::ContentGuardConfig,
    screening::{ComplianceMode, ScanMode, ScreeningService},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "contentguard")]
#[command(author = "ContentGuard Team")]
#[command(version)]
#[command(about = "Content compliance screening and personal-information scanning")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONTENTGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Sensitive-term dictionary (overrides config)
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },

    /// Run a compliance check on one text
    Check {
        /// Text to check
        text: String,

        /// loose, moderate or strict
        #[arg(short, long, default_value = "moderate")]
        mode: String,
    },

    /// Scan one text for ID-card and phone numbers
    Scan {
        /// Text to scan
        text: String,

        /// rules, llm or both
        #[arg(short = 's', long, default_value = "rules")]
        scan_mode: String,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let mut config = match &cli.config {
        Some(path) => ContentGuardConfig::from_file(path)?,
        None => ContentGuardConfig::default(),
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            dictionary,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(path) = dictionary {
                config.dictionary.path = path;
            }
            tracing::info!("Starting ContentGuard");
            api::serve(config).await?;
        }
        Commands::Check { text, mode } => {
            let service = ScreeningService::from_config(&config)?;
            let result = service
                .check_compliance(&text, ComplianceMode::from(mode.as_str()), None)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Scan { text, scan_mode } => {
            let service = ScreeningService::from_config(&config)?;
            let result = service
                .scan_personal_info(&text, ScanMode::from(scan_mode.as_str()), None)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("contentguard={},tower_http={}", log_level, log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn show_config(config: Option<&ContentGuardConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
