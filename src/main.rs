//! IDMatrix SOAP client binary.
//!
//! Run with: `idmatrix-soap --config config.yaml --request request.json`

use anyhow::{Context, Result};
use clap::Parser;
use idmatrix_soap::{ClientConfig, IdMatrixClient, IdMatrixRequest};
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Submit an identity verification request to IDMatrix.
///
/// The request is read as JSON, wrapped in a SOAP envelope with WS-Security
/// credentials, and the decoded response is printed as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the JSON request
    #[arg(short, long)]
    request: PathBuf,

    /// Service endpoint (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// WS-Security username (overrides config)
    #[arg(long, env = "IDMATRIX_USERNAME")]
    username: Option<String>,

    /// WS-Security password (overrides config)
    #[arg(long, env = "IDMATRIX_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print the SOAP envelope instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the result
    let log_level = args.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = load_config(&args).await?;
    info!(
        endpoint = %config.endpoint,
        timeout_secs = config.timeout_secs,
        "Configuration loaded"
    );

    let client = IdMatrixClient::new(config).context("Invalid client configuration")?;

    let json = tokio::fs::read_to_string(&args.request)
        .await
        .with_context(|| format!("Failed to read request file {}", args.request.display()))?;
    let request: IdMatrixRequest =
        serde_json::from_str(&json).context("Failed to parse request JSON")?;

    if args.dry_run {
        println!("{}", client.build_envelope(&request));
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, cancelling request");
        on_signal.cancel();
    });

    let response = client
        .send_request_with_cancel(&request, &cancel)
        .await
        .context("IDMatrix request failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to encode response")?
    );
    Ok(())
}

/// Merge the optional config file with command-line overrides.
async fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Config file: {}", path.display());
            let content = tokio::fs::read_to_string(path)
                .await
                .context("Failed to read config file")?;
            serde_yaml::from_str(&content).context("Failed to parse config file")?
        }
        None => ClientConfig::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(username) = &args.username {
        config.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }

    Ok(config)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
