//! Newtype domain identifiers.
//!
//! Every concept that has an identity is a distinct newtype wrapping a
//! primitive. This prevents accidentally passing, for example, a raw
//! repository reference where a normalised [`SourceId`] is expected, even
//! though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one background processing unit (fetch → translate → submit).
///
/// Generated fresh for every dispatched task and recorded on its tracing span
/// so all log records of a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessingRunId(Uuid);

impl ProcessingRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ProcessingRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a task in the project-management service.
    ///
    /// Taken verbatim from the `task_id` field of a webhook event.
    TaskId
}

string_id! {
    /// A free-form repository reference read from a task's custom field.
    ///
    /// Anything goes: a GitHub URL, an `owner/repo` pair, or an opaque token.
    /// Only non-emptiness is guaranteed.
    RepositoryRef
}

string_id! {
    /// Source identifier understood by the agent service
    /// (e.g. `"sources/github/owner/repo"`).
    ///
    /// Produced by [`crate::normalize`]; no further validation is applied.
    SourceId
}

string_id! {
    /// A Git branch name (e.g. `"main"`).
    BranchName
}

impl SourceId {
    /// Wraps a value produced by the normaliser from a non-empty reference.
    pub(crate) fn from_normalized(value: String) -> Self {
        debug_assert!(!value.is_empty());
        Self(value)
    }
}

impl BranchName {
    /// The `main` branch.
    pub fn main() -> Self {
        Self(String::from("main"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(TaskId::new("").is_none());
        assert!(RepositoryRef::new(String::new()).is_none());
        assert_eq!(TaskId::new("86c0abc").unwrap().as_str(), "86c0abc");
    }

    #[test]
    fn string_ids_serialise_as_plain_strings() {
        let source = SourceId::from_normalized("sources/github/a/b".to_string());
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            serde_json::json!("sources/github/a/b")
        );
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(ProcessingRunId::new_random(), ProcessingRunId::new_random());
    }
}
