//! Port traits implemented outside this crate.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`TaskSource`] | `clickup::ClickUpClient` |
//! | [`SessionTarget`] | `jules::JulesClient` |
//! | [`TaskDispatcher`] | `processor::TaskProcessor` |

use async_trait::async_trait;

use crate::{SessionAck, SessionRequest, TaskId, TaskRecord, TransportError};

/// Supplies task records by identifier.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetches the full record of `task_id`.
    async fn fetch_task(&self, task_id: &TaskId) -> Result<TaskRecord, TransportError>;
}

/// Accepts session requests.
#[async_trait]
pub trait SessionTarget: Send + Sync {
    /// Submits `request` and returns the service's acknowledgment.
    async fn create_session(&self, request: &SessionRequest)
        -> Result<SessionAck, TransportError>;
}

/// Hands a task off for background processing.
///
/// Implementations must return without waiting for the processing to finish;
/// the webhook acknowledgment is sent as soon as this call returns.
pub trait TaskDispatcher: Send + Sync {
    /// Schedules processing of `task_id`.
    fn dispatch(&self, task_id: TaskId);
}
