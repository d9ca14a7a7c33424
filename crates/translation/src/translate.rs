//! Task record → session request mapping.

use serde_json::Value;
use tracing::debug;

use crate::{
    extract, normalize, BranchName, GithubRepoContext, RepositoryRef, SessionRequest,
    SourceContext, TaskRecord,
};

/// Custom field names consulted for the repository reference, in priority order.
const REPOSITORY_FIELD_NAMES: [&str; 2] = ["Repository", "Repo"];

/// Builds the session request for `task`.
///
/// Never fails: a missing name or description becomes an empty string, and a
/// task without a usable repository reference yields a request without a
/// source context.
pub fn translate(task: &TaskRecord) -> SessionRequest {
    // Sessions always start from `main`, whatever the repository's default branch is.
    let source_context = repository_reference(task).map(|reference| {
        let source = normalize(&reference);
        debug!(reference = %reference, source = %source, "Resolved repository source");
        SourceContext {
            source,
            github_repo_context: GithubRepoContext {
                starting_branch: BranchName::main(),
            },
        }
    });

    SessionRequest {
        title: task.name.clone().unwrap_or_default(),
        prompt: task.description.clone().unwrap_or_default(),
        source_context,
    }
}

/// Finds the repository reference, falling back through
/// [`REPOSITORY_FIELD_NAMES`]. Unset, empty, `false` and zero values fall
/// through to the next name.
fn repository_reference(task: &TaskRecord) -> Option<RepositoryRef> {
    REPOSITORY_FIELD_NAMES
        .iter()
        .find_map(|name| extract(task, name).and_then(reference_from_value))
}

fn reference_from_value(value: &Value) -> Option<RepositoryRef> {
    match value {
        Value::String(text) => RepositoryRef::new(text.as_str()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Number(number) => RepositoryRef::new(number.to_string()),
        Value::Bool(true) => RepositoryRef::new("true"),
        Value::Null | Value::Bool(false) | Value::Array(_) | Value::Object(_) => None,
    }
}
