//! Explicit credentials for the two external services.

use crate::BridgeError;

/// API keys for the task source and the session target.
///
/// Built once by the composition root and handed to the adapter
/// constructors. The translation functions never see it.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    source_service_api_key: String,
    target_service_api_key: String,
}

impl ServiceCredentials {
    /// Creates a credential set, rejecting blank keys.
    ///
    /// Surrounding whitespace is trimmed from both keys.
    pub fn new(
        source_service_api_key: impl Into<String>,
        target_service_api_key: impl Into<String>,
    ) -> Result<Self, BridgeError> {
        let source = source_service_api_key.into().trim().to_string();
        let target = target_service_api_key.into().trim().to_string();
        if source.is_empty() {
            return Err(BridgeError::Configuration {
                message: "task source API key is not set".to_string(),
            });
        }
        if target.is_empty() {
            return Err(BridgeError::Configuration {
                message: "session target API key is not set".to_string(),
            });
        }
        Ok(Self {
            source_service_api_key: source,
            target_service_api_key: target,
        })
    }

    /// Key sent to the project-management service.
    pub fn source_service_api_key(&self) -> &str {
        &self.source_service_api_key
    }

    /// Key sent to the agent service.
    pub fn target_service_api_key(&self) -> &str {
        &self.target_service_api_key
    }
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("source_service_api_key", &"<redacted>")
            .field("target_service_api_key", &"<redacted>")
            .finish()
    }
}
