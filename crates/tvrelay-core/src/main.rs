//! tvrelay CLI
//!
//! Command-line interface for the tvrelay webhook server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use tvrelay::config::{LogFormat, LoggingConfig};
use tvrelay::prelude::*;
use tvrelay::prompt::build_prompt;

/// tvrelay - trade alerts with a second opinion
#[derive(Parser)]
#[command(name = "tvrelay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TVRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// HTTP port, overrides PORT from the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show how an alert file would be normalized, sized and prompted
    Preview {
        /// JSON file containing one alert payload
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check the health endpoint of a running server
    Health {
        /// Base URL of the server
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port } => run_serve(cli.config.as_deref(), port, cli.verbose).await,
        Commands::Preview { file, format } => {
            init_logging(&LoggingConfig::default(), cli.verbose);
            run_preview(&file, format)
        }
        Commands::Health { url } => {
            init_logging(&LoggingConfig::default(), cli.verbose);
            run_health(&url).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let log_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn run_serve(
    config_path: Option<&Path>,
    port: Option<u16>,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load(config_path).context("loading configuration")?;
    if let Some(port) = port {
        config.server.port = port;
    }
    init_logging(&config.logging, verbose);

    let evaluator = OpenAiEvaluator::new(&config.evaluation)?;
    info!(model = evaluator.model(), "Evaluation service ready");
    let notifier = TwilioNotifier::new(&config.notification)?;

    let relay = AlertRelay::from_config(&config, Arc::new(evaluator), Arc::new(notifier));
    let server = HttpServer::new(Arc::new(relay));

    info!("Starting tvrelay on {}", config.server.bind_addr());
    server.serve(&config.server.bind_addr()).await?;

    Ok(())
}

fn run_preview(file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let alert = Alert::from_payload(&payload);
    let sizing = PositionSize::compute(alert.close, alert.stop);
    let prompt = build_prompt(&alert, &sizing);

    match format {
        OutputFormat::Json => {
            let preview = serde_json::json!({
                "alert": alert,
                "sizing": sizing,
                "prompt": prompt,
            });
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        OutputFormat::Text => {
            println!("Header:   {}", alert.headline());
            println!("Close:    {}", format_price(alert.close));
            println!("Stop:     {}", format_price(alert.stop));
            println!("Distance: {}", format_price(sizing.distance));
            println!("Size:     {}", sizing.display_size());
            println!();
            println!("{prompt}");
        }
    }

    Ok(())
}

async fn run_health(url: &str) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));
    let response = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?
        .get(&endpoint)
        .send()
        .await
        .with_context(|| format!("requesting {endpoint}"))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("{endpoint} returned {status}: {body}");
    }

    println!("Healthy: {endpoint} -> {body}");
    Ok(())
}
