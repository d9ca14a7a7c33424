//! Task bridge ClickUp adapter.
//!
//! Implements [`translation::TaskSource`] against the ClickUp v2 REST API
//! (`GET /task/{task_id}`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Authentication,
//! URL construction and status handling live here; the [`translation`] crate
//! sees only [`translation::TaskSource`].
//!
//! ## Authentication
//!
//! ClickUp personal tokens are sent verbatim in the `Authorization` header,
//! without a `Bearer` scheme.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, instrument};
use translation::{ServiceCredentials, TaskId, TaskRecord, TaskSource, TransportError};

/// Default ClickUp API root.
pub const DEFAULT_API_BASE: &str = "https://api.clickup.com/api/v2";

const SERVICE_NAME: &str = "ClickUp";
const CLIENT_USER_AGENT: &str = "task-bridge";

/// Errors raised while constructing a [`ClickUpClient`].
#[derive(Debug, Error)]
pub enum ClickUpClientError {
    /// The API base is not an absolute hierarchical URL.
    #[error("invalid ClickUp API base '{url}': {message}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The API key contains characters that cannot appear in a header.
    #[error("ClickUp API key is not a valid header value")]
    InvalidApiKey,

    /// The underlying HTTP client could not be built.
    #[error("failed to build ClickUp HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client for the ClickUp task API.
#[derive(Debug, Clone)]
pub struct ClickUpClient {
    http: reqwest::Client,
    api_base: Url,
}

impl ClickUpClient {
    /// Creates a client for `api_base` authenticated with the task source key
    /// of `credentials`.
    ///
    /// `request_timeout` bounds each call end to end.
    pub fn new(
        api_base: &str,
        credentials: &ServiceCredentials,
        request_timeout: Duration,
    ) -> Result<Self, ClickUpClientError> {
        let api_base = parse_api_base(api_base)?;

        let mut authorization = HeaderValue::from_str(credentials.source_service_api_key())
            .map_err(|_| ClickUpClientError::InvalidApiKey)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, api_base })
    }

    fn task_url(&self, task_id: &TaskId) -> Result<Url, TransportError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Request {
                service: SERVICE_NAME,
                message: format!("cannot append a path to '{}'", self.api_base),
            })?
            .pop_if_empty()
            .push("task")
            .push(task_id.as_str());
        Ok(url)
    }
}

fn parse_api_base(api_base: &str) -> Result<Url, ClickUpClientError> {
    let url = Url::parse(api_base).map_err(|e| ClickUpClientError::InvalidBaseUrl {
        url: api_base.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClickUpClientError::InvalidBaseUrl {
            url: api_base.to_string(),
            message: "URL cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

#[async_trait]
impl TaskSource for ClickUpClient {
    #[instrument(skip_all, fields(task_id = %task_id))]
    async fn fetch_task(&self, task_id: &TaskId) -> Result<TaskRecord, TransportError> {
        let url = self.task_url(task_id)?;
        debug!(url = %url, "Fetching task");

        let response = self
            .http
            .get(url)
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

        let task = response
            .json::<TaskRecord>()
            .await
            .map_err(|e| TransportError::Decode {
                service: SERVICE_NAME,
                message: e.to_string(),
            })?;
        debug!(
            custom_fields = task.custom_fields.len(),
            "Fetched task"
        );
        Ok(task)
    }
}
