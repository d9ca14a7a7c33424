//! Task bridge processing pipeline.
//!
//! [`TaskProcessor`] runs the three steps for one task identifier:
//!
//! 1. fetch the task record from the [`TaskSource`];
//! 2. [`translate`] it into a [`SessionRequest`](translation::SessionRequest);
//! 3. submit the request to the [`SessionTarget`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The processor sequences calls between the pure
//! translation functions and the infrastructure ports. It contains no domain
//! rules of its own.
//!
//! ## Failure handling
//!
//! A transport failure on either leg abandons the task. There is no retry and
//! no queue; the failure is reported on the `tracing` error channel only,
//! because the webhook that triggered the work has already been acknowledged.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};
use translation::{
    translate, ProcessingRunId, SessionAck, SessionTarget, TaskDispatcher, TaskId, TaskSource,
    TransportError,
};

/// Why processing of a single task was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// The task record could not be fetched.
    #[error("failed to fetch task: {0}")]
    FetchTask(TransportError),

    /// The session request was rejected or never reached the service.
    #[error("failed to create session: {0}")]
    CreateSession(TransportError),
}

impl ProcessingError {
    /// Returns the underlying transport failure.
    pub fn transport(&self) -> &TransportError {
        match self {
            Self::FetchTask(e) | Self::CreateSession(e) => e,
        }
    }
}

/// Fetch → translate → submit pipeline shared by all dispatched tasks.
///
/// Cloning is cheap; clones share the same adapter instances and nothing else.
#[derive(Clone)]
pub struct TaskProcessor {
    source: Arc<dyn TaskSource>,
    target: Arc<dyn SessionTarget>,
}

impl TaskProcessor {
    /// Creates a processor over the given adapters.
    pub fn new(source: Arc<dyn TaskSource>, target: Arc<dyn SessionTarget>) -> Self {
        Self { source, target }
    }

    /// Processes `task_id` to completion on the current task.
    pub async fn process_task(&self, task_id: &TaskId) -> Result<SessionAck, ProcessingError> {
        info!("Processing task");

        let task = self
            .source
            .fetch_task(task_id)
            .await
            .map_err(ProcessingError::FetchTask)?;

        let request = translate(&task);
        info!(
            title = %request.title,
            source = request
                .source_context
                .as_ref()
                .map(|context| context.source.as_str())
                .unwrap_or("<none>"),
            "Translated task into session request"
        );

        let ack = self
            .target
            .create_session(&request)
            .await
            .map_err(ProcessingError::CreateSession)?;

        info!(
            session = ack.session_name().unwrap_or("<unnamed>"),
            response = %ack,
            "Created session"
        );
        Ok(ack)
    }

    /// Spawns processing of `task_id` as an independent Tokio task.
    ///
    /// Failures are logged, never returned. Must be called from within a
    /// Tokio runtime.
    pub fn spawn(&self, task_id: TaskId) -> JoinHandle<()> {
        let processor = self.clone();
        let run_id = ProcessingRunId::new_random();
        let span = info_span!("process_task", task_id = %task_id, run_id = %run_id);

        tokio::spawn(
            async move {
                if let Err(e) = processor.process_task(&task_id).await {
                    let transport = e.transport();
                    error!(
                        error = %e,
                        service = transport.service(),
                        status = transport.status(),
                        "Abandoned task"
                    );
                }
            }
            .instrument(span),
        )
    }
}

impl TaskDispatcher for TaskProcessor {
    fn dispatch(&self, task_id: TaskId) {
        // Detached: the handle is dropped and the task runs to completion.
        drop(self.spawn(task_id));
    }
}
