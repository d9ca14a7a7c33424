//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use translation::{BridgeError, ServiceCredentials};

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Compact human-readable lines.
    Text,
}

/// Forwards newly created ClickUp tasks to Jules as agent sessions.
#[derive(Debug, Parser)]
#[command(name = "taskbridge", version, about)]
pub(crate) struct CliConfig {
    /// Port the webhook listener binds to.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub(crate) port: u16,

    /// Interface the webhook listener binds to.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub(crate) bind_host: IpAddr,

    /// ClickUp personal API token.
    #[arg(long, env = "CLICKUP_API_KEY", hide_env_values = true)]
    pub(crate) clickup_api_key: Option<String>,

    /// Jules API key.
    #[arg(long, env = "JULES_API_KEY", hide_env_values = true)]
    pub(crate) jules_api_key: Option<String>,

    /// ClickUp API root.
    #[arg(long, env = "CLICKUP_API_BASE", default_value = clickup::DEFAULT_API_BASE)]
    pub(crate) clickup_api_base: String,

    /// Jules API root.
    #[arg(long, env = "JULES_API_BASE", default_value = jules::DEFAULT_API_BASE)]
    pub(crate) jules_api_base: String,

    /// Timeout applied to each outbound request, in milliseconds.
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub(crate) request_timeout_ms: u64,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub(crate) log_format: LogFormat,

    /// OTLP gRPC endpoint for trace export. Tracing export is off when unset.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub(crate) otlp_endpoint: Option<String>,
}

impl CliConfig {
    /// Address the webhook listener binds to.
    pub(crate) fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }

    /// Per-request timeout for both service adapters.
    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validated credentials for both services.
    pub(crate) fn credentials(&self) -> Result<ServiceCredentials, BridgeError> {
        ServiceCredentials::new(
            self.clickup_api_key.clone().unwrap_or_default(),
            self.jules_api_key.clone().unwrap_or_default(),
        )
    }
}
