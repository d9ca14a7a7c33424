//! Task bridge webhook event source.
//!
//! Binds an HTTP server and receives ClickUp webhook payloads on
//! [`WEBHOOK_ENDPOINT`]. Every well-formed call is acknowledged immediately;
//! `taskCreated` events are handed to a [`TaskDispatcher`] before the response
//! is written, and the dispatcher runs the actual work in the background.
//!
//! | Payload | Response | Effect |
//! |---------|----------|--------|
//! | `taskCreated` with `task_id` | `200` | task dispatched |
//! | any other event, or no `task_id` | `200` | ignored |
//! | missing, non-JSON, `null`, `{}` or non-object body | `400` | none |
//!
//! Inbound calls are not authenticated.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport details and payload parsing live here. The
//! [`translation`] crate sees only [`TaskDispatcher`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use translation::{TaskDispatcher, TaskId};

/// Path the webhook is registered on.
pub const WEBHOOK_ENDPOINT: &str = "/webhook";

/// Event name ClickUp sends when a task is created.
pub const TASK_CREATED_EVENT: &str = "taskCreated";

const RECEIVED_MESSAGE: &str = "Webhook received";
const NO_DATA_MESSAGE: &str = "No data received";

/// Errors raised by the listener itself (never by individual requests).
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listening socket could not be opened.
    #[error("failed to bind webhook listener on {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("webhook listener exited unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A parsed webhook payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A task was created. `task_id` is `None` when the payload carried no
    /// usable identifier.
    TaskCreated {
        /// Identifier of the new task.
        task_id: Option<TaskId>,
    },

    /// Any other event type; acknowledged and ignored.
    Other {
        /// Event name, if the payload had one.
        event: Option<String>,
    },
}

impl WebhookEvent {
    /// Parses a raw request body.
    ///
    /// Returns `None` when the body carries no data: empty, not JSON, or not
    /// a non-empty JSON object.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let object = value.as_object().filter(|object| !object.is_empty())?;

        let event = object.get("event").and_then(Value::as_str);
        if event == Some(TASK_CREATED_EVENT) {
            let task_id = object
                .get("task_id")
                .and_then(Value::as_str)
                .and_then(TaskId::new);
            return Some(Self::TaskCreated { task_id });
        }
        Some(Self::Other {
            event: event.map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize)]
struct WebhookReply {
    message: &'static str,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct ListenerState {
    dispatcher: Arc<dyn TaskDispatcher>,
}

/// Builds the webhook router.
pub fn build_router(dispatcher: Arc<dyn TaskDispatcher>) -> Router {
    Router::new()
        .route(WEBHOOK_ENDPOINT, post(handle_webhook))
        .with_state(ListenerState { dispatcher })
}

/// Opens the listening socket.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { addr, source })
}

/// Serves webhooks on `listener` until `shutdown` resolves.
///
/// In-flight requests are drained before returning. Background work already
/// handed to `dispatcher` is not awaited.
pub async fn serve<F>(
    listener: TcpListener,
    dispatcher: Arc<dyn TaskDispatcher>,
    shutdown: F,
) -> Result<(), ListenerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    match listener.local_addr() {
        Ok(addr) => info!(%addr, endpoint = WEBHOOK_ENDPOINT, "Webhook listener started"),
        Err(e) => warn!(error = %e, "Webhook listener started on an unknown address"),
    }

    axum::serve(listener, build_router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ListenerError::Serve)?;

    info!("Webhook listener stopped");
    Ok(())
}

async fn handle_webhook(State(state): State<ListenerState>, body: Bytes) -> Response {
    let Some(event) = WebhookEvent::parse(&body) else {
        warn!(bytes = body.len(), "Rejected webhook without data");
        return reply(StatusCode::BAD_REQUEST, NO_DATA_MESSAGE);
    };

    match event {
        WebhookEvent::TaskCreated {
            task_id: Some(task_id),
        } => {
            info!(task_id = %task_id, "Dispatching created task");
            state.dispatcher.dispatch(task_id);
        }
        WebhookEvent::TaskCreated { task_id: None } => {
            warn!("Ignoring task creation event without task_id");
        }
        WebhookEvent::Other { event } => {
            debug!(
                event = event.as_deref().unwrap_or("<missing>"),
                "Ignoring webhook event"
            );
        }
    }

    reply(StatusCode::OK, RECEIVED_MESSAGE)
}

fn reply(status: StatusCode, message: &'static str) -> Response {
    (status, Json(WebhookReply { message })).into_response()
}
