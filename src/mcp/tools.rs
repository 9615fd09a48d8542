//! Tool parameter types for the OpenReplay MCP server.
//!
//! Each struct describes one tool's argument schema; `schemars` derives the
//! JSON schema served through `tools/list`. Required arguments are
//! non-`Option` fields so deserialization rejects a call missing them
//! before dispatch. Fields the remote API treats as free-form (filters,
//! funnel steps, custom-query parameters) stay `serde_json::Value` and are
//! forwarded untouched.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

/// Parameters for the search_sessions tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchSessionsParams {
    /// Restrict the search to one user's sessions.
    #[schemars(description = "Filter to sessions belonging to this user ID \
        (required with an organization API key)")]
    pub user_id: Option<String>,

    /// Start of the date range.
    #[schemars(description = "Range start (ISO 8601 or relative like 7d, 2w, 1m; default: 7d ago)")]
    pub start_date: Option<String>,

    /// End of the date range.
    #[schemars(description = "Range end (ISO 8601 or relative; default: now)")]
    pub end_date: Option<String>,

    /// Maximum number of sessions to return.
    #[schemars(description = "Maximum number of sessions (default: 50)")]
    pub limit: Option<usize>,

    /// Pagination offset.
    #[schemars(description = "Pagination offset (default: 0)")]
    pub offset: Option<usize>,

    /// Sort field.
    #[schemars(description = "Sort field (default: startedAt)")]
    pub sort: Option<String>,

    /// Sort direction.
    #[schemars(description = "Sort direction, asc or desc (default: desc)")]
    pub order: Option<String>,

    /// Filter objects forwarded verbatim to the search endpoint.
    #[schemars(description = "Filter objects passed through to the session search API")]
    pub filters: Option<Vec<Value>>,
}

/// Parameters for the get_session_details tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSessionDetailsParams {
    /// Session to fetch.
    #[schemars(description = "Session ID")]
    pub session_id: String,
}

/// Parameters for the get_session_events tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSessionEventsParams {
    /// Session whose event stream to fetch.
    #[schemars(description = "Session ID")]
    pub session_id: String,

    /// Optional event type filter.
    #[schemars(description = "Filter to one event type (e.g. CLICK, INPUT, LOCATION)")]
    pub event_type: Option<String>,

    /// Optional window start.
    #[schemars(description = "Only events after this time (ISO 8601 or relative)")]
    pub start_date: Option<String>,

    /// Optional window end.
    #[schemars(description = "Only events before this time (ISO 8601 or relative)")]
    pub end_date: Option<String>,
}

/// Parameters for the aggregate_sessions tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AggregateSessionsParams {
    /// Metrics to compute.
    #[schemars(description = "Metric names to aggregate (e.g. sessionCount, avgDuration)")]
    pub metrics: Vec<String>,

    /// Dimensions to group by.
    #[schemars(description = "Dimensions to group by (default: none)")]
    pub group_by: Option<Vec<String>>,

    #[schemars(description = "Range start (ISO 8601 or relative; default: 7d ago)")]
    pub start_date: Option<String>,

    #[schemars(description = "Range end (ISO 8601 or relative; default: now)")]
    pub end_date: Option<String>,
}

/// Parameters for the get_user_journey tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetUserJourneyParams {
    /// User whose session history to fetch.
    #[schemars(description = "User ID")]
    pub user_id: String,

    #[schemars(description = "Range start (default: 7d ago with a full-access key, \
        30d ago with an organization key)")]
    pub start_date: Option<String>,

    #[schemars(description = "Range end (default: now)")]
    pub end_date: Option<String>,
}

/// Parameters for the get_errors_issues tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetErrorsIssuesParams {
    #[schemars(description = "Range start (ISO 8601 or relative; default: 7d ago)")]
    pub start_date: Option<String>,

    #[schemars(description = "Range end (ISO 8601 or relative; default: now)")]
    pub end_date: Option<String>,

    /// Minimum occurrence count for an error group to be included.
    #[schemars(description = "Minimum occurrences per error group (default: 1)")]
    pub min_occurrences: Option<u32>,

    /// Grouping dimension.
    #[schemars(description = "Grouping dimension (default: message)")]
    pub group_by: Option<String>,
}

/// Parameters for the get_funnel_analysis tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFunnelAnalysisParams {
    /// Ordered funnel steps, forwarded verbatim.
    #[schemars(description = "Ordered funnel step objects passed through to the funnel API")]
    pub steps: Vec<Value>,

    #[schemars(description = "Range start (ISO 8601 or relative; default: 7d ago)")]
    pub start_date: Option<String>,

    #[schemars(description = "Range end (ISO 8601 or relative; default: now)")]
    pub end_date: Option<String>,

    /// Additional filters, forwarded verbatim.
    #[schemars(description = "Filter objects applied before the funnel (default: none)")]
    pub filters: Option<Vec<Value>>,
}

/// Parameters for the get_performance_metrics tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPerformanceMetricsParams {
    /// Performance metrics to fetch.
    #[schemars(description = "Metric names (e.g. pageLoad, ttfb, domBuildTime)")]
    pub metrics: Vec<String>,

    /// Dimensions to group by.
    #[schemars(description = "Dimensions to group by (default: none)")]
    pub group_by: Option<Vec<String>>,

    /// Percentiles to compute.
    #[schemars(description = "Percentiles to compute (default: 50, 75, 90, 95, 99)")]
    pub percentiles: Option<Vec<u8>>,

    #[schemars(description = "Range start (ISO 8601 or relative; default: 7d ago)")]
    pub start_date: Option<String>,

    #[schemars(description = "Range end (ISO 8601 or relative; default: now)")]
    pub end_date: Option<String>,
}

/// Parameters for the execute_custom_query tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteCustomQueryParams {
    /// Query text, forwarded verbatim.
    #[schemars(description = "Query to execute against the analytics store")]
    pub query: String,

    /// Named query parameters.
    #[schemars(description = "Named parameters for the query (default: {})")]
    pub parameters: Option<Value>,
}

/// Parameters for the get_user_sessions tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetUserSessionsParams {
    /// User whose sessions to fetch.
    #[schemars(description = "User ID")]
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_params_all_optional() {
        let params: SearchSessionsParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.user_id.is_none());
        assert!(params.limit.is_none());
        assert!(params.filters.is_none());
    }

    #[test]
    fn test_session_details_requires_session_id() {
        let result: Result<GetSessionDetailsParams, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());

        let params: GetSessionDetailsParams =
            serde_json::from_value(json!({"session_id": "abc"})).unwrap();
        assert_eq!(params.session_id, "abc");
    }

    #[test]
    fn test_funnel_steps_pass_through_untyped() {
        let params: GetFunnelAnalysisParams = serde_json::from_value(json!({
            "steps": [
                {"type": "LOCATION", "value": "/checkout"},
                {"type": "CLICK", "value": "Buy"}
            ]
        }))
        .unwrap();
        assert_eq!(params.steps.len(), 2);
        assert_eq!(params.steps[0]["type"], "LOCATION");
    }

    #[test]
    fn test_custom_query_parameters_accept_any_shape() {
        let params: ExecuteCustomQueryParams = serde_json::from_value(json!({
            "query": "SELECT count(*) FROM sessions",
            "parameters": {"country": "DE", "min_duration": 1000}
        }))
        .unwrap();
        assert_eq!(params.parameters.unwrap()["country"], "DE");
    }
}
