//! Repository reference normalisation.
//!
//! Best-effort heuristics; the agent service tolerates imperfect source
//! strings, so nothing here validates the result. SSH remotes, trailing
//! slashes, query strings and percent-encoding pass through untouched.

use crate::{RepositoryRef, SourceId};

const GITHUB_HOST_MARKER: &str = "github.com/";
const GIT_SUFFIX: &str = ".git";
const GITHUB_SOURCE_PREFIX: &str = "sources/github/";

/// Converts a free-form repository reference into a source identifier.
///
/// Rules, first match wins:
///
/// 1. Contains `github.com/`: keep what follows the last occurrence, drop a
///    single trailing `.git`, prefix with `sources/github/`.
/// 2. Contains `/`: treat as `owner/repo` and prefix with `sources/github/`.
/// 3. Otherwise: returned unchanged.
pub fn normalize(reference: &RepositoryRef) -> SourceId {
    let raw = reference.as_str();
    let normalized = if let Some(index) = raw.rfind(GITHUB_HOST_MARKER) {
        let path = &raw[index + GITHUB_HOST_MARKER.len()..];
        let path = path.strip_suffix(GIT_SUFFIX).unwrap_or(path);
        format!("{GITHUB_SOURCE_PREFIX}{path}")
    } else if raw.contains('/') {
        format!("{GITHUB_SOURCE_PREFIX}{raw}")
    } else {
        raw.to_string()
    };
    SourceId::from_normalized(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize_str(raw: &str) -> String {
        normalize(&RepositoryRef::new(raw).unwrap()).to_string()
    }

    #[test]
    fn github_url_becomes_source_identifier() {
        assert_eq!(
            normalize_str("https://github.com/owner/repo"),
            "sources/github/owner/repo"
        );
    }

    #[test]
    fn git_suffix_is_stripped_once() {
        assert_eq!(
            normalize_str("https://github.com/owner/repo.git"),
            "sources/github/owner/repo"
        );
        assert_eq!(
            normalize_str("https://github.com/owner/repo.git.git"),
            "sources/github/owner/repo.git"
        );
    }

    #[test]
    fn owner_repo_pair_is_prefixed() {
        assert_eq!(normalize_str("owner/repo"), "sources/github/owner/repo");
    }

    #[test]
    fn opaque_token_passes_through() {
        assert_eq!(normalize_str("opaque-token"), "opaque-token");
    }

    #[test]
    fn path_after_last_host_marker_is_used() {
        assert_eq!(
            normalize_str("https://github.com/redirect/github.com/owner/repo"),
            "sources/github/owner/repo"
        );
    }

    #[test]
    fn permissive_inputs_are_not_cleaned_up() {
        assert_eq!(
            normalize_str("https://github.com/owner/repo/"),
            "sources/github/owner/repo/"
        );
        assert_eq!(
            normalize_str("git@github.com:owner/repo.git"),
            "sources/github/git@github.com:owner/repo.git"
        );
        assert_eq!(normalize_str("a/b/c"), "sources/github/a/b/c");
    }
}
