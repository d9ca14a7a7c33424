//! Value types exchanged with the two external services.
//!
//! [`TaskRecord`] mirrors the loosely-typed task returned by the
//! project-management service: every consumed key is optional and unknown
//! keys are ignored. [`SessionRequest`] is the outbound payload and is
//! serialised in the camelCase shape the agent service expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{BranchName, SourceId};

// ---------------------------------------------------------------------------
// Inbound: task record
// ---------------------------------------------------------------------------

/// A task as supplied by the project-management service.
///
/// Missing, `null` or wrongly typed attributes deserialise to their empty
/// defaults; they are never treated as fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task title.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// Free-text task description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    /// Custom fields in the order the service returned them. Entries that
    /// are not JSON objects are skipped.
    #[serde(default, deserialize_with = "lenient_custom_fields")]
    pub custom_fields: Vec<CustomField>,
}

/// A named attribute attached to a task.
///
/// Only `name` and `value` are consumed; the service's type metadata is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    /// Field name as configured in the project-management service.
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,

    /// Field value. `Value::Null` when the field is unset.
    #[serde(default)]
    pub value: Value,
}

impl CustomField {
    /// Creates a field with the given name and value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Decodes `T`, substituting its default when the value is `null` or has the
/// wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_custom_fields<'de, D>(deserializer: D) -> Result<Vec<CustomField>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(fields)
}

// ---------------------------------------------------------------------------
// Outbound: session request
// ---------------------------------------------------------------------------

/// Request to create a new agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// Session title (the task name).
    pub title: String,

    /// Instructions for the agent (the task description).
    pub prompt: String,

    /// Repository the session works against. Omitted from the payload
    /// entirely when the task names no repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SourceContext>,
}

/// Repository binding of a [`SessionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    /// Normalised source identifier.
    pub source: SourceId,

    /// GitHub-specific settings.
    pub github_repo_context: GithubRepoContext,
}

/// GitHub-specific settings of a [`SourceContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoContext {
    /// Branch the agent starts from.
    pub starting_branch: BranchName,
}

// ---------------------------------------------------------------------------

/// Opaque acknowledgment returned by the agent service.
///
/// The bridge never interprets it beyond logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionAck(Value);

impl SessionAck {
    /// Wraps a raw acknowledgment body.
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// Returns the raw acknowledgment body.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns the session resource name (e.g. `"sessions/123"`) when the
    /// service included one.
    pub fn session_name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

impl std::fmt::Display for SessionAck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
