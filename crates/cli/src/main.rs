//! Task bridge entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: flags with environment fallbacks, see
//!    `taskbridge --help`. Missing API keys abort start-up.
//! 2. **Wire observability**: configure `tracing-subscriber` with a JSON (or
//!    text) layer and, when an endpoint is given, an OpenTelemetry OTLP
//!    exporter. All `tracing` spans and events emitted by every crate in the
//!    workspace flow through this layer.
//! 3. **Construct infrastructure**: create the `ClickUpClient` and
//!    `JulesClient` adapters and inject them into a `TaskProcessor`.
//! 4. **Serve**: bind the webhook listener and run until Ctrl-C or SIGTERM.

mod config;
mod observability;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use clickup::ClickUpClient;
use jules::JulesClient;
use processor::TaskProcessor;
use tracing::{error, info};

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CliConfig::parse();
    let telemetry = observability::init(config.log_format, config.otlp_endpoint.as_deref())?;

    let result = run(config).await;
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "taskbridge exited with an error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: CliConfig) -> Result<()> {
    let credentials = config
        .credentials()
        .context("set --clickup-api-key/CLICKUP_API_KEY and --jules-api-key/JULES_API_KEY")?;
    let timeout = config.request_timeout();

    let source = ClickUpClient::new(&config.clickup_api_base, &credentials, timeout)
        .context("failed to configure the ClickUp client")?;
    let target = JulesClient::new(&config.jules_api_base, &credentials, timeout)
        .context("failed to configure the Jules client")?;
    let processor = TaskProcessor::new(Arc::new(source), Arc::new(target));

    info!(
        clickup_api_base = %config.clickup_api_base,
        jules_api_base = %config.jules_api_base,
        request_timeout_ms = config.request_timeout_ms,
        "Starting taskbridge"
    );

    let socket = listener::bind(config.bind_addr()).await?;
    listener::serve(socket, Arc::new(processor), shutdown_signal()).await?;
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
