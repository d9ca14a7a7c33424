//! Core translation domain for the task bridge.
//!
//! This crate turns a task record fetched from the project-management service
//! into a session request for the agent service. It also defines the port
//! traits the infrastructure crates implement; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TaskId`, `SourceId`, `BranchName`, etc.) |
//! | [`types`] | Inbound and outbound value types (`TaskRecord`, `SessionRequest`, etc.) |
//! | [`extract`] | Case-insensitive custom field lookup |
//! | [`normalize`] | Repository reference → source identifier heuristics |
//! | [`translate`] | `TaskRecord` → `SessionRequest` mapping |
//! | [`config`] | Explicit service credentials handed to the adapters |
//! | [`ports`] | Traits implemented by the adapters and the processor |
//! | [`errors`] | Transport and configuration error types |

pub mod config;
pub mod errors;
pub mod extract;
pub mod identifiers;
pub mod normalize;
pub mod ports;
pub mod translate;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::ServiceCredentials;
pub use errors::{BridgeError, TransportError};
pub use extract::extract;
pub use identifiers::{BranchName, ProcessingRunId, RepositoryRef, SourceId, TaskId};
pub use normalize::normalize;
pub use ports::{SessionTarget, TaskDispatcher, TaskSource};
pub use translate::translate;
pub use types::{
    CustomField, GithubRepoContext, SessionAck, SessionRequest, SourceContext, TaskRecord,
};
