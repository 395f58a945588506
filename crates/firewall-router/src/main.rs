//! image-firewall: run the moderation router against one notification or an
//! SQS queue.
//!
//! Configuration comes from the environment (or a `.env` file).

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use firewall_core::config::log_format_from_env;
use firewall_core::Config;
use firewall_router::{build_router, handle_notification, init_telemetry, QueueTrigger};

#[derive(Parser)]
#[command(name = "image-firewall", about = "Route uploaded images to allowed or quarantine storage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a single notification document
    Handle {
        /// Path to the notification JSON; read from stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Long-poll the configured SQS queue until interrupted
    Poll,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(&log_format_from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Invalid configuration");
            return Err(e.context("Failed to load configuration"));
        }
    };

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting image-firewall"
    );

    let router = build_router(&config).await?;

    match cli.command {
        Commands::Handle { event } => {
            let body = read_event(event.as_ref())?;
            match handle_notification(&router, &body).await? {
                Some(outcome) => {
                    let summary = serde_json::to_string_pretty(&outcome.decision())?;
                    println!("{}", summary);
                }
                None => println!("null"),
            }
        }
        Commands::Poll => {
            let queue_url = config
                .sqs_queue_url
                .clone()
                .context("SQS_QUEUE_URL must be set to poll a queue")?;
            let trigger = QueueTrigger::new(
                config.aws_region.clone(),
                queue_url,
                config.sqs_wait_time_seconds,
            )
            .await;

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
            };
            trigger.run(&router, shutdown).await?;
        }
    }

    Ok(())
}

fn read_event(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read event from stdin")?;
            Ok(body)
        }
    }
}
