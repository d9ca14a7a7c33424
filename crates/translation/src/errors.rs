//! Error types shared across the bridge.
//!
//! The translation functions themselves never fail; absent or malformed
//! input degrades to defaults. Errors arise only at the edges:
//!
//! - [`TransportError`]: a call to one of the external services failed.
//!   Produced by the service adapters; the processor abandons the current
//!   task and reports it on the diagnostic log.
//! - [`BridgeError`]: the process itself cannot start.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

/// A failed call to an external service.
///
/// Every variant names the service so a single log line identifies which leg
/// of the fetch → submit flow broke. Transport failures are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or no response arrived (connection
    /// refused, DNS failure, timeout).
    #[error("{service} request failed: {message}")]
    Request {
        /// Human-readable service label (e.g. `"ClickUp"`).
        service: &'static str,
        /// Underlying client error.
        message: String,
    },

    /// The service answered with a non-success status code.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        /// Human-readable service label.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The service answered successfully but the body could not be decoded.
    #[error("{service} response could not be decoded: {message}")]
    Decode {
        /// Human-readable service label.
        service: &'static str,
        /// Decoder error.
        message: String,
    },
}

/// Longest response body carried in [`TransportError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 512;

impl TransportError {
    /// Builds a [`TransportError::Status`], truncating `body` for logging.
    pub fn from_status(service: &'static str, status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        Self::Status {
            service,
            status,
            body,
        }
    }

    /// Returns the label of the service that failed.
    pub fn service(&self) -> &'static str {
        match self {
            Self::Request { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. } => service,
        }
    }

    /// Returns the HTTP status code, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Process-level errors
// ---------------------------------------------------------------------------

/// Errors that prevent the bridge from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The runtime configuration is invalid.
    ///
    /// Produced at start-up; the listener never binds with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
