//! OpenReplay API access for the MCP server.
//!
//! Provides the HTTP client and auth-mode strategy used to forward tool
//! invocations to the OpenReplay analytics API.
//!
//! # Submodules
//!
//! - `auth` - authentication-mode descriptor and tool availability
//! - `client` - HTTP client and outbound request shape

pub mod auth;
pub mod client;

pub use auth::{AuthMode, ToolKind};
pub use client::{ApiRequest, OpenReplayClient};

/// Default OpenReplay API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openreplay.com";

/// Custom error type for remote API operations.
///
/// Every variant is recovered at the dispatch call site and converted into
/// a textual tool result; none of these ever surface as protocol faults.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network-level failure (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Server returned a non-2xx response.
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Response body could not be parsed as JSON.
    #[error("Malformed response body: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_request_failed() {
        let err = ApiError::RequestFailed("ECONNRESET".to_string());
        assert!(err.to_string().contains("ECONNRESET"));
    }

    #[test]
    fn test_api_error_display_server_error() {
        let err = ApiError::ServerError {
            status: 500,
            message: "Internal error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal error"));
    }

    #[test]
    fn test_api_error_display_parse_error() {
        let err = ApiError::ParseError("expected value at line 1".to_string());
        assert!(err.to_string().contains("Malformed response body"));
    }

    #[test]
    fn test_default_api_url() {
        assert_eq!(DEFAULT_API_URL, "https://api.openreplay.com");
    }
}
