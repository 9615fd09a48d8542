//! Authentication-mode strategy for the OpenReplay API.
//!
//! OpenReplay credentials come in two flavors with different capabilities:
//! a full-access API key scoped to one project, and an organization API key
//! that can only reach the public organization endpoints. The [`AuthMode`]
//! descriptor answers, for the active credential type, which tools are
//! served, how the authorization header is shaped, where project-scoped
//! paths are rooted, and how wide the default user-journey window is.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

// ==================== Tool names ====================

/// The closed set of tools exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SearchSessions,
    GetSessionDetails,
    GetSessionEvents,
    AggregateSessions,
    GetUserJourney,
    GetErrorsIssues,
    GetFunnelAnalysis,
    GetPerformanceMetrics,
    ExecuteCustomQuery,
    ListProjects,
    GetUserSessions,
}

impl ToolKind {
    /// Every declared tool, in registry order.
    pub const ALL: [ToolKind; 11] = [
        ToolKind::SearchSessions,
        ToolKind::GetSessionDetails,
        ToolKind::GetSessionEvents,
        ToolKind::AggregateSessions,
        ToolKind::GetUserJourney,
        ToolKind::GetErrorsIssues,
        ToolKind::GetFunnelAnalysis,
        ToolKind::GetPerformanceMetrics,
        ToolKind::ExecuteCustomQuery,
        ToolKind::ListProjects,
        ToolKind::GetUserSessions,
    ];

    /// The tool's registered name.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SearchSessions => "search_sessions",
            ToolKind::GetSessionDetails => "get_session_details",
            ToolKind::GetSessionEvents => "get_session_events",
            ToolKind::AggregateSessions => "aggregate_sessions",
            ToolKind::GetUserJourney => "get_user_journey",
            ToolKind::GetErrorsIssues => "get_errors_issues",
            ToolKind::GetFunnelAnalysis => "get_funnel_analysis",
            ToolKind::GetPerformanceMetrics => "get_performance_metrics",
            ToolKind::ExecuteCustomQuery => "execute_custom_query",
            ToolKind::ListProjects => "list_projects",
            ToolKind::GetUserSessions => "get_user_sessions",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==================== Auth mode ====================

/// The configuration-selected credential type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Project-scoped full-access API key (bearer token).
    FullAccess,
    /// Organization API key (raw key header), limited to the public
    /// organization endpoints.
    Organization,
}

impl AuthMode {
    /// Whether the given tool is served under this mode.
    ///
    /// Tools outside the table get a fixed explanatory text result instead
    /// of an outbound call. `search_sessions` is listed as supported under
    /// organization mode but additionally requires a `user_id` argument
    /// there; that parameter-dependent check lives in the tool handler.
    pub fn supports(&self, tool: ToolKind) -> bool {
        match self {
            AuthMode::FullAccess => !matches!(
                tool,
                ToolKind::ListProjects | ToolKind::GetUserSessions
            ),
            AuthMode::Organization => matches!(
                tool,
                ToolKind::SearchSessions
                    | ToolKind::GetSessionEvents
                    | ToolKind::GetUserJourney
                    | ToolKind::ListProjects
                    | ToolKind::GetUserSessions
            ),
        }
    }

    /// Shapes the `Authorization` header value for this mode.
    pub fn authorization(&self, credential: &str) -> String {
        match self {
            AuthMode::FullAccess => format!("Bearer {credential}"),
            AuthMode::Organization => credential.to_string(),
        }
    }

    /// Root path segment for project-scoped endpoints.
    ///
    /// Full-access keys address the project API directly; organization keys
    /// go through the versioned public API keyed by project key.
    pub fn project_root(&self, project: &str) -> String {
        match self {
            AuthMode::FullAccess => format!("/api/{project}"),
            AuthMode::Organization => format!("/api/v1/{project}"),
        }
    }

    /// Default date window for `get_user_journey`.
    pub fn journey_window(&self) -> Duration {
        match self {
            AuthMode::FullAccess => Duration::days(7),
            AuthMode::Organization => Duration::days(30),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::FullAccess => write!(f, "full-access"),
            AuthMode::Organization => write!(f, "organization"),
        }
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-access" | "full_access" | "full" => Ok(AuthMode::FullAccess),
            "organization" | "org" => Ok(AuthMode::Organization),
            other => Err(format!(
                "Unknown auth mode: '{other}'. Expected one of: full-access, organization"
            )),
        }
    }
}
