//! Task bridge Jules adapter.
//!
//! Implements [`translation::SessionTarget`] against the Jules session API
//! (`POST /sessions`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request formatting, API-key headers and response
//! handling live here. The [`translation`] crate sees only
//! [`translation::SessionTarget`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use translation::{ServiceCredentials, SessionAck, SessionRequest, SessionTarget, TransportError};

/// Default Jules API root.
pub const DEFAULT_API_BASE: &str = "https://jules.googleapis.com/v1alpha";

const SERVICE_NAME: &str = "Jules";
const CLIENT_USER_AGENT: &str = "task-bridge";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors raised while constructing a [`JulesClient`].
#[derive(Debug, Error)]
pub enum JulesClientError {
    /// The API base is not an absolute hierarchical URL.
    #[error("invalid Jules API base '{url}': {message}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The API key contains characters that cannot appear in a header.
    #[error("Jules API key is not a valid header value")]
    InvalidApiKey,

    /// The underlying HTTP client could not be built.
    #[error("failed to build Jules HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client for the Jules session API.
#[derive(Debug, Clone)]
pub struct JulesClient {
    http: reqwest::Client,
    sessions_url: Url,
}

impl JulesClient {
    /// Creates a client for `api_base` authenticated with the session target
    /// key of `credentials`.
    ///
    /// `request_timeout` bounds each call end to end.
    pub fn new(
        api_base: &str,
        credentials: &ServiceCredentials,
        request_timeout: Duration,
    ) -> Result<Self, JulesClientError> {
        let sessions_url = sessions_url(api_base)?;

        let mut api_key = HeaderValue::from_str(credentials.target_service_api_key())
            .map_err(|_| JulesClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, sessions_url })
    }
}

fn sessions_url(api_base: &str) -> Result<Url, JulesClientError> {
    let invalid = |message: String| JulesClientError::InvalidBaseUrl {
        url: api_base.to_string(),
        message,
    };
    let mut url = Url::parse(api_base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .push("sessions");
    Ok(url)
}

/// Decodes a success body. The acknowledgment is opaque, so an empty body
/// becomes `null` and a non-JSON body is kept as a string.
fn decode_ack(body: &str) -> SessionAck {
    if body.trim().is_empty() {
        return SessionAck::new(Value::Null);
    }
    SessionAck::new(
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())),
    )
}

#[async_trait]
impl SessionTarget for JulesClient {
    #[instrument(skip_all, fields(title = %request.title, has_source = request.source_context.is_some()))]
    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionAck, TransportError> {
        debug!(url = %self.sessions_url, "Creating session");

        // `.json()` also sets `Content-Type: application/json`.
        let response = self
            .http
            .post(self.sessions_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                service: SERVICE_NAME,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::from_status(
                SERVICE_NAME,
                status.as_u16(),
                &body,
            ));
        }

        let body = response.text().await.map_err(|e| TransportError::Decode {
            service: SERVICE_NAME,
            message: e.to_string(),
        })?;
        Ok(decode_ack(&body))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use translation::{BranchName, GithubRepoContext, SourceContext, SourceId};

    use super::*;

    fn client(server: &MockServer) -> JulesClient {
        let credentials =
            ServiceCredentials::new("test_clickup_key", "test_jules_key").expect("credentials");
        JulesClient::new(&server.url("/v1alpha"), &credentials, Duration::from_secs(5))
            .expect("client")
    }

    fn request_with_source() -> SessionRequest {
        SessionRequest {
            title: "Implement Login".to_string(),
            prompt: "Create a login page using Flask.".to_string(),
            source_context: Some(SourceContext {
                source: SourceId::new("sources/github/myuser/myrepo").expect("source"),
                github_repo_context: GithubRepoContext {
                    starting_branch: BranchName::main(),
                },
            }),
        }
    }

    #[tokio::test]
    async fn create_session_posts_payload_with_api_key() {
        let server = MockServer::start();
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/v1alpha/sessions")
                .header("x-goog-api-key", "test_jules_key")
                .header("content-type", "application/json")
                .json_body(json!({
                    "title": "Implement Login",
                    "prompt": "Create a login page using Flask.",
                    "sourceContext": {
                        "source": "sources/github/myuser/myrepo",
                        "githubRepoContext": { "startingBranch": "main" }
                    }
                }));
            then.status(200).json_body(json!({ "name": "sessions/123" }));
        });

        let ack = client(&server)
            .create_session(&request_with_source())
            .await
            .expect("create session");

        assert_eq!(ack.session_name(), Some("sessions/123"));
        create.assert_calls(1);
    }

    #[tokio::test]
    async fn create_session_without_source_omits_source_context() {
        let server = MockServer::start();
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/v1alpha/sessions")
                .json_body(json!({ "title": "Write docs", "prompt": "" }));
            then.status(200).json_body(json!({ "name": "sessions/456" }));
        });

        let request = SessionRequest {
            title: "Write docs".to_string(),
            prompt: String::new(),
            source_context: None,
        };
        client(&server)
            .create_session(&request)
            .await
            .expect("create session");

        create.assert_calls(1);
    }

    #[tokio::test]
    async fn create_session_surfaces_error_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1alpha/sessions");
            then.status(400).json_body(json!({
                "error": { "code": 400, "message": "Requested entity was not found: source" }
            }));
        });

        let error = client(&server)
            .create_session(&request_with_source())
            .await
            .expect_err("400 must fail");

        assert_eq!(error.status(), Some(400));
        assert!(error.to_string().contains("Requested entity was not found"));
    }

    #[tokio::test]
    async fn create_session_reports_status_when_error_body_is_truncated() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let socket = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = socket.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (mut stream, _) = socket.accept().await.expect("accept");
            let mut buf = vec![0u8; 8192];
            let _ = stream.read(&mut buf).await;
            // Advertises more body than is sent, then closes the connection.
            let _ = stream
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 64\r\n\r\npartial")
                .await;
        });

        let credentials =
            ServiceCredentials::new("test_clickup_key", "test_jules_key").expect("credentials");
        let client = JulesClient::new(
            &format!("http://{addr}/v1alpha"),
            &credentials,
            Duration::from_secs(5),
        )
        .expect("client");

        let error = client
            .create_session(&request_with_source())
            .await
            .expect_err("502 must fail");

        assert_eq!(error.status(), Some(502));
    }

    #[test]
    fn ack_decoding_is_lenient() {
        assert_eq!(decode_ack("").as_value(), &Value::Null);
        assert_eq!(decode_ack("accepted").as_value(), &json!("accepted"));
        assert_eq!(
            decode_ack("{\"name\":\"sessions/9\"}").session_name(),
            Some("sessions/9")
        );
    }

    #[test]
    fn sessions_url_is_appended_to_base() {
        assert_eq!(
            sessions_url("https://jules.googleapis.com/v1alpha/")
                .expect("url")
                .as_str(),
            "https://jules.googleapis.com/v1alpha/sessions"
        );
        assert!(sessions_url("jules").is_err());
    }
}
