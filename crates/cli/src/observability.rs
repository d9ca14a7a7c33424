//! Tracing subscriber and OpenTelemetry export wiring.
//!
//! Every crate in the workspace emits `tracing` spans and events; this module
//! decides where they go. Logs are written to stdout as JSON (or compact text)
//! filtered by `RUST_LOG`. When an OTLP endpoint is configured, spans are also
//! exported through a batch exporter on the Tokio runtime.

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::TracerProvider;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

const TRACER_NAME: &str = "taskbridge";

/// Keeps the exporter alive; call [`Telemetry::shutdown`] before exit so
/// buffered spans are flushed.
pub(crate) struct Telemetry {
    tracer_provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Flushes and stops the span exporter, if one was installed.
    pub(crate) fn shutdown(self) {
        if let Some(provider) = self.tracer_provider {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to flush trace exporter: {e}");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// Must be called once, from inside the Tokio runtime.
pub(crate) fn init(format: LogFormat, otlp_endpoint: Option<&str>) -> Result<Telemetry> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let tracer_provider = otlp_endpoint.map(build_tracer_provider).transpose()?;
    let otel_layer = tracer_provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(TRACER_NAME)));

    let (json_layer, text_layer) = match format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
            None,
        ),
        LogFormat::Text => (None, Some(fmt::layer().compact().with_target(false))),
    };

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(Telemetry { tracer_provider })
}

fn build_tracer_provider(endpoint: &str) -> Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .with_context(|| format!("failed to build OTLP span exporter for '{endpoint}'"))?;

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .build())
}
