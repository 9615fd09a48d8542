//! HTTP client for the OpenReplay API.
//!
//! Provides the [`OpenReplayClient`] that executes outbound requests built
//! by the dispatch layer. Each tool invocation maps to at most one
//! [`ApiRequest`]; the client attempts it exactly once, with no retries.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;

use super::auth::AuthMode;
use super::ApiError;
use crate::config::Config;

/// Timeout for establishing a connection (30 seconds).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the entire request including response (120 seconds).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ==================== Outbound request shape ====================

/// A single outbound API call derived from a tool invocation.
///
/// Constructed deterministically by the dispatch layer and never mutated
/// afterwards. `PartialEq` lets tests assert shape identity directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    /// Query string pairs (GET endpoints).
    pub query: Vec<(String, String)>,
    /// JSON body (POST endpoints).
    pub body: Option<Value>,
}

// ==================== Client ====================

/// API client holding the immutable per-process connection settings.
#[derive(Debug, Clone)]
pub struct OpenReplayClient {
    /// HTTP client instance.
    http: Client,
    /// Base URL of the OpenReplay service.
    base_url: String,
    /// API credential; empty when unset, in which case calls fail remotely.
    credential: String,
    /// Project identifier interpolated into paths.
    project: String,
    /// Active authentication mode.
    mode: AuthMode,
}

impl OpenReplayClient {
    /// Creates a client from the resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credential: config.credential.clone().unwrap_or_default(),
            project: config.project.clone().unwrap_or_default(),
            mode: config.mode,
        }
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured project identifier.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the active authentication mode.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Executes one outbound request and returns the parsed response body.
    ///
    /// Any failure — network error, non-2xx status, or a body that is not
    /// JSON — comes back as an [`ApiError`] for the caller to fold into a
    /// textual tool result.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, %url, "forwarding to OpenReplay API");

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header("Authorization", self.mode.authorization(&self.credential))
            .header("Content-Type", "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))
    }
}
