//! Talos feed connector CLI
//!
//! Local execution entry point. For AWS Lambda, use `talos-feed-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use talos_feed::{
    error::Result,
    models::{Config, FetchParams, OutputMode},
    pipeline::{self, Operation, OperationContext},
};

/// talos-feed - Talos IP blacklist connector
#[derive(Parser, Debug)]
#[command(name = "talos-feed", version, about = "Talos IP blacklist feed connector")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "talos-feed.toml")]
    config: PathBuf,

    /// Override connector.server_url
    #[arg(long)]
    server_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the blacklist and print or forward the indicators
    Fetch {
        /// Output mode selector, e.g. "Create as Feed Records in FortiSOAR"
        #[arg(long)]
        output_mode: Option<String>,

        /// Playbook id handed to the ingest forwarder
        #[arg(long)]
        playbook_id: Option<String>,
    },

    /// Check that the feed server answers
    Health,

    /// Validate the configuration file
    Validate,

    /// Run a registered operation with JSON params
    Run {
        /// Operation name (e.g. fetch_indicators)
        operation: String,

        /// Operation params as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

/// Initialize logging based on the verbosity flag and configured level.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    if let Some(url) = cli.server_url {
        config.connector.server_url = url;
    }

    log::debug!("Feed server: {}", config.connector.base_url());

    let ctx = OperationContext::from_config(&config);

    match cli.command {
        Command::Fetch {
            output_mode,
            playbook_id,
        } => {
            let params = FetchParams {
                output_mode: output_mode.map(OutputMode::from),
                create_pb_id: playbook_id,
            };
            let output = pipeline::fetch_indicators(&config.connector, &params, &ctx).await?;
            print_json(&output)?;
        }

        Command::Health => {
            pipeline::check_health(&config.connector).await?;
            log::info!("✓ Feed server is reachable");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Run { operation, params } => {
            let params: serde_json::Value = serde_json::from_str(&params)?;
            if Operation::from_name(&operation).is_none() {
                log::error!(
                    "Registered operations: {}",
                    Operation::ALL
                        .iter()
                        .map(|op| op.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            let output = pipeline::execute(&operation, &config.connector, params, &ctx).await?;
            print_json(&output)?;
        }
    }

    Ok(())
}
