//! MCP server implementation for the OpenReplay adapter.
//!
//! Runs an MCP server on stdio transport. Every tool call follows the same
//! path: gate on the active auth mode, translate the arguments into one
//! outbound API request, execute it once, and wrap whatever comes back —
//! response body, remote error, or unsupported-mode notice — into a text
//! content result. Business failures never surface as protocol faults; the
//! only protocol error left to the router is an unknown tool name.

use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorData as McpError, Implementation, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
    transport::stdio,
    ServerHandler, ServiceExt,
};
use serde_json::Value;

use crate::api::auth::{AuthMode, ToolKind};
use crate::api::client::{ApiRequest, OpenReplayClient};
use crate::config::Config;
use crate::mcp::dispatch;
use crate::mcp::tools::*;

/// The OpenReplay MCP server.
///
/// Holds the immutable API client; no state is carried between
/// invocations.
#[derive(Debug, Clone)]
pub struct OpenReplayServer {
    client: OpenReplayClient,
    tool_router: ToolRouter<OpenReplayServer>,
}

impl OpenReplayServer {
    /// Creates a server for the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            client: OpenReplayClient::from_config(&config),
            tool_router: Self::tool_router(),
        }
    }

    /// Returns the fixed notice result when the active auth mode does not
    /// serve the tool; `None` means the call may proceed.
    fn gate(&self, tool: ToolKind) -> Option<CallToolResult> {
        let mode = self.client.mode();
        if mode.supports(tool) {
            None
        } else {
            Some(CallToolResult::success(vec![Content::text(
                dispatch::unsupported_message(tool, mode),
            )]))
        }
    }

    /// Executes a planned request and wraps the outcome into a text result.
    ///
    /// A planning failure (bad date argument, missing conditional field)
    /// and a remote failure are both folded into content here so the
    /// calling model always receives something to reason about.
    async fn forward(&self, planned: Result<ApiRequest>) -> Result<CallToolResult, McpError> {
        let request = match planned {
            Ok(request) => request,
            Err(e) => {
                return Ok(CallToolResult::error(vec![Content::text(e.to_string())]));
            }
        };

        match self.client.execute(&request).await {
            Ok(body) => Ok(CallToolResult::success(vec![Content::text(render_json(
                &body,
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

/// Pretty-prints a response body for the text content envelope.
fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("Error serializing response: {e}"))
}

#[tool_router]
impl OpenReplayServer {
    /// Search sessions by filter set within a date range.
    #[tool(description = "Search OpenReplay sessions with filters, pagination, and sorting. \
        Defaults to the last 7 days, newest first.")]
    async fn search_sessions(
        &self,
        Parameters(params): Parameters<SearchSessionsParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::SearchSessions) {
            return Ok(notice);
        }
        let mode = self.client.mode();
        if mode == AuthMode::Organization && params.user_id.is_none() {
            return Ok(CallToolResult::success(vec![Content::text(
                dispatch::unsupported_message(ToolKind::SearchSessions, mode),
            )]));
        }
        self.forward(dispatch::search_sessions(
            mode,
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Fetch the full record of one session.
    #[tool(description = "Get the full OpenReplay session record by session ID")]
    async fn get_session_details(
        &self,
        Parameters(params): Parameters<GetSessionDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetSessionDetails) {
            return Ok(notice);
        }
        self.forward(dispatch::get_session_details(
            self.client.mode(),
            self.client.project(),
            &params,
        ))
        .await
    }

    /// Fetch a session's event stream.
    #[tool(description = "Get a session's event stream, optionally filtered by event type \
        or time window")]
    async fn get_session_events(
        &self,
        Parameters(params): Parameters<GetSessionEventsParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetSessionEvents) {
            return Ok(notice);
        }
        self.forward(dispatch::get_session_events(
            self.client.mode(),
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Aggregate session metrics grouped by dimensions.
    #[tool(description = "Compute aggregate session metrics grouped by dimensions over a \
        date range (default: last 7 days)")]
    async fn aggregate_sessions(
        &self,
        Parameters(params): Parameters<AggregateSessionsParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::AggregateSessions) {
            return Ok(notice);
        }
        self.forward(dispatch::aggregate_sessions(
            self.client.mode(),
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Fetch a user's session history.
    #[tool(description = "Get a user's session history. Default window is 7 days with a \
        full-access key, 30 days with an organization key.")]
    async fn get_user_journey(
        &self,
        Parameters(params): Parameters<GetUserJourneyParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetUserJourney) {
            return Ok(notice);
        }
        self.forward(dispatch::get_user_journey(
            self.client.mode(),
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Fetch grouped error records.
    #[tool(description = "Get grouped error records for the project (default: last 7 days, \
        grouped by message)")]
    async fn get_errors_issues(
        &self,
        Parameters(params): Parameters<GetErrorsIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetErrorsIssues) {
            return Ok(notice);
        }
        self.forward(dispatch::get_errors_issues(
            self.client.mode(),
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Compute funnel conversion statistics.
    #[tool(description = "Compute funnel conversion statistics for an ordered list of steps \
        (default: last 7 days)")]
    async fn get_funnel_analysis(
        &self,
        Parameters(params): Parameters<GetFunnelAnalysisParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetFunnelAnalysis) {
            return Ok(notice);
        }
        self.forward(dispatch::get_funnel_analysis(
            self.client.mode(),
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Fetch performance percentile metrics.
    #[tool(description = "Get performance percentile metrics (default percentiles: 50, 75, \
        90, 95, 99 over the last 7 days)")]
    async fn get_performance_metrics(
        &self,
        Parameters(params): Parameters<GetPerformanceMetricsParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetPerformanceMetrics) {
            return Ok(notice);
        }
        self.forward(dispatch::get_performance_metrics(
            self.client.mode(),
            self.client.project(),
            &params,
            chrono::Utc::now(),
        ))
        .await
    }

    /// Pass a custom query through to the analytics store.
    #[tool(description = "Execute a custom analytics query with named parameters; the query \
        is passed through verbatim")]
    async fn execute_custom_query(
        &self,
        Parameters(params): Parameters<ExecuteCustomQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::ExecuteCustomQuery) {
            return Ok(notice);
        }
        self.forward(dispatch::execute_custom_query(
            self.client.mode(),
            self.client.project(),
            &params,
        ))
        .await
    }

    /// Enumerate accessible projects (organization keys only).
    #[tool(description = "List the projects accessible to the organization API key")]
    async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::ListProjects) {
            return Ok(notice);
        }
        self.forward(dispatch::list_projects()).await
    }

    /// Fetch all sessions for one user (organization keys only).
    #[tool(description = "Get all sessions recorded for one user ID")]
    async fn get_user_sessions(
        &self,
        Parameters(params): Parameters<GetUserSessionsParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(notice) = self.gate(ToolKind::GetUserSessions) {
            return Ok(notice);
        }
        self.forward(dispatch::get_user_sessions(
            self.client.mode(),
            self.client.project(),
            &params,
        ))
        .await
    }
}

#[tool_handler]
impl ServerHandler for OpenReplayServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "OpenReplay records user sessions in web applications. Use these tools to \
                 search and inspect sessions, follow a user's journey, and pull error, \
                 funnel, and performance analytics for the configured project. Results are \
                 the raw OpenReplay API responses."
                    .to_string(),
            ),
        }
    }
}

/// Runs the MCP server on stdio transport.
///
/// This is a blocking call that processes MCP requests until the client
/// disconnects or an error occurs.
pub async fn run_server() -> Result<()> {
    let config = Config::from_env();
    tracing::info!(mode = %config.mode, url = %config.api_url, "starting OpenReplay MCP server");

    let service = OpenReplayServer::new(config).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn organization_server() -> OpenReplayServer {
        OpenReplayServer::new(Config {
            api_url: "https://api.openreplay.com".to_string(),
            credential: Some("org-key".to_string()),
            project: Some("abcdef".to_string()),
            mode: AuthMode::Organization,
        })
    }

    #[test]
    fn test_render_json_is_pretty_printed_verbatim() {
        let body = json!({"total": 3});
        assert_eq!(render_json(&body), "{\n  \"total\": 3\n}");
    }

    #[test]
    fn test_router_lists_every_declared_tool() {
        let router = OpenReplayServer::tool_router();
        let names: std::collections::HashSet<String> = router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        assert_eq!(names.len(), ToolKind::ALL.len());
        for tool in ToolKind::ALL {
            assert!(names.contains(tool.name()), "missing tool: {tool}");
        }
    }

    #[tokio::test]
    async fn test_gated_tool_short_circuits_before_any_outbound_call() {
        let server = organization_server();
        let params: AggregateSessionsParams =
            serde_json::from_value(json!({"metrics": ["sessionCount"]})).unwrap();

        // The gate sits in front of the client, so this returns the fixed
        // notice without touching the network.
        let result = server
            .aggregate_sessions(Parameters(params))
            .await
            .expect("gated call must not be a protocol fault");

        let rendered = serde_json::to_value(&result).unwrap().to_string();
        assert!(rendered.contains("aggregate_sessions is not available"));
        assert!(rendered.contains("OPENREPLAY_API_KEY"));
    }

    #[tokio::test]
    async fn test_unfiltered_search_is_gated_under_organization_mode() {
        let server = organization_server();
        let params: SearchSessionsParams = serde_json::from_value(json!({})).unwrap();

        let result = server
            .search_sessions(Parameters(params))
            .await
            .expect("gated call must not be a protocol fault");

        let rendered = serde_json::to_value(&result).unwrap().to_string();
        assert!(rendered.contains("user_id"));
    }
}
