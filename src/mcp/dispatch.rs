//! Request translation for OpenReplay tool calls.
//!
//! Each builder maps one tool's argument struct to exactly one
//! [`ApiRequest`]: it fills defaults (date ranges, pagination, sort order),
//! interpolates the configured project identifier into the path, and shapes
//! the payload as query parameters (GET) or a JSON body (POST). Builders
//! are pure functions of `(mode, project, params, now)` — the invocation's
//! wall-clock time is threaded in explicitly, so identical arguments at the
//! same instant always produce identical requests.

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::json;

use crate::api::auth::{AuthMode, ToolKind};
use crate::api::client::ApiRequest;
use crate::mcp::tools::*;

/// Default session search page size.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Default date window for range-based tools.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

const DEFAULT_SORT_FIELD: &str = "startedAt";
const DEFAULT_SORT_ORDER: &str = "desc";
const DEFAULT_ERROR_GROUP_BY: &str = "message";
const DEFAULT_PERCENTILES: [u8; 5] = [50, 75, 90, 95, 99];

// ==================== Date handling ====================

/// Parses a date argument (ISO 8601 or relative like 7d, 2w, 1m) against
/// the invocation time.
fn parse_date(date_str: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let date_str = date_str.trim().to_lowercase();

    // Try relative format first (e.g., "7d", "2w", "1m")
    if date_str.ends_with('d') {
        let days: i64 = date_str[..date_str.len() - 1].parse()?;
        return Ok(now - Duration::days(days));
    }

    if date_str.ends_with('w') {
        let weeks: i64 = date_str[..date_str.len() - 1].parse()?;
        return Ok(now - Duration::weeks(weeks));
    }

    if date_str.ends_with('m') {
        let months: i64 = date_str[..date_str.len() - 1].parse()?;
        return Ok(now - Duration::days(months * 30));
    }

    // Try ISO 8601 format
    if let Ok(dt) = DateTime::parse_from_rfc3339(&date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try date-only format
    if let Ok(date) = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
        let datetime = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("Invalid date"))?;
        return Ok(datetime.and_utc());
    }

    anyhow::bail!("Invalid date format: {date_str}")
}

/// Resolves a start/end argument pair to epoch-millisecond bounds,
/// defaulting to a window ending at the invocation time.
fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    window: Duration,
    now: DateTime<Utc>,
) -> anyhow::Result<(i64, i64)> {
    let start = match start {
        Some(s) => parse_date(s, now)?.timestamp_millis(),
        None => (now - window).timestamp_millis(),
    };
    let end = match end {
        Some(s) => parse_date(s, now)?.timestamp_millis(),
        None => now.timestamp_millis(),
    };
    Ok((start, end))
}

fn default_window() -> Duration {
    Duration::days(DEFAULT_RANGE_DAYS)
}

// ==================== Request builders ====================

/// Builds the session search request.
///
/// Full-access keys search the project's session index; organization keys
/// can only reach the per-user sessions endpoint, so a `user_id` is
/// mandatory there (the tool handler returns the fixed notice when it is
/// absent, this error is a backstop).
pub fn search_sessions(
    mode: AuthMode,
    project: &str,
    params: &SearchSessionsParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let (start, end) = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        default_window(),
        now,
    )?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let sort = params.sort.as_deref().unwrap_or(DEFAULT_SORT_FIELD);
    let order = params.order.as_deref().unwrap_or(DEFAULT_SORT_ORDER);

    match mode {
        AuthMode::FullAccess => {
            let mut body = json!({
                "startDate": start,
                "endDate": end,
                "limit": limit,
                "offset": offset,
                "sort": sort,
                "order": order,
                "filters": params.filters.clone().unwrap_or_default(),
            });
            if let Some(user_id) = &params.user_id {
                body["userId"] = json!(user_id);
            }
            Ok(ApiRequest {
                method: Method::POST,
                path: format!("{}/sessions/search", mode.project_root(project)),
                query: Vec::new(),
                body: Some(body),
            })
        }
        AuthMode::Organization => {
            let user_id = params.user_id.as_deref().ok_or_else(|| {
                anyhow!("search_sessions requires a user_id with an organization API key")
            })?;
            Ok(ApiRequest {
                method: Method::GET,
                path: format!("{}/users/{user_id}/sessions", mode.project_root(project)),
                query: vec![
                    ("startDate".to_string(), start.to_string()),
                    ("endDate".to_string(), end.to_string()),
                    ("limit".to_string(), limit.to_string()),
                    ("offset".to_string(), offset.to_string()),
                    ("sort".to_string(), sort.to_string()),
                    ("order".to_string(), order.to_string()),
                ],
                body: None,
            })
        }
    }
}

/// Builds the session details request.
pub fn get_session_details(
    mode: AuthMode,
    project: &str,
    params: &GetSessionDetailsParams,
) -> anyhow::Result<ApiRequest> {
    Ok(ApiRequest {
        method: Method::GET,
        path: format!(
            "{}/sessions/{}",
            mode.project_root(project),
            params.session_id
        ),
        query: Vec::new(),
        body: None,
    })
}

/// Builds the session event-stream request. Type and time-window filters
/// are optional and carry no defaults.
pub fn get_session_events(
    mode: AuthMode,
    project: &str,
    params: &GetSessionEventsParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let mut query = Vec::new();
    if let Some(event_type) = &params.event_type {
        query.push(("type".to_string(), event_type.clone()));
    }
    if let Some(start) = params.start_date.as_deref() {
        let ts = parse_date(start, now)?.timestamp_millis();
        query.push(("startDate".to_string(), ts.to_string()));
    }
    if let Some(end) = params.end_date.as_deref() {
        let ts = parse_date(end, now)?.timestamp_millis();
        query.push(("endDate".to_string(), ts.to_string()));
    }
    Ok(ApiRequest {
        method: Method::GET,
        path: format!(
            "{}/sessions/{}/events",
            mode.project_root(project),
            params.session_id
        ),
        query,
        body: None,
    })
}

/// Builds the session aggregation request.
pub fn aggregate_sessions(
    mode: AuthMode,
    project: &str,
    params: &AggregateSessionsParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let (start, end) = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        default_window(),
        now,
    )?;
    Ok(ApiRequest {
        method: Method::POST,
        path: format!("{}/sessions/aggregate", mode.project_root(project)),
        query: Vec::new(),
        body: Some(json!({
            "metrics": params.metrics,
            "groupBy": params.group_by.clone().unwrap_or_default(),
            "startDate": start,
            "endDate": end,
        })),
    })
}

/// Builds the user journey request. The default window depends on the auth
/// mode: 7 days with a full-access key, 30 with an organization key.
pub fn get_user_journey(
    mode: AuthMode,
    project: &str,
    params: &GetUserJourneyParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let (start, end) = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        mode.journey_window(),
        now,
    )?;
    Ok(ApiRequest {
        method: Method::GET,
        path: format!(
            "{}/users/{}/sessions",
            mode.project_root(project),
            params.user_id
        ),
        query: vec![
            ("startDate".to_string(), start.to_string()),
            ("endDate".to_string(), end.to_string()),
        ],
        body: None,
    })
}

/// Builds the grouped-errors request.
pub fn get_errors_issues(
    mode: AuthMode,
    project: &str,
    params: &GetErrorsIssuesParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let (start, end) = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        default_window(),
        now,
    )?;
    Ok(ApiRequest {
        method: Method::GET,
        path: format!("{}/errors/search", mode.project_root(project)),
        query: vec![
            ("startDate".to_string(), start.to_string()),
            ("endDate".to_string(), end.to_string()),
            (
                "minOccurrences".to_string(),
                params.min_occurrences.unwrap_or(1).to_string(),
            ),
            (
                "groupBy".to_string(),
                params
                    .group_by
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ERROR_GROUP_BY.to_string()),
            ),
        ],
        body: None,
    })
}

/// Builds the funnel analysis request.
pub fn get_funnel_analysis(
    mode: AuthMode,
    project: &str,
    params: &GetFunnelAnalysisParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let (start, end) = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        default_window(),
        now,
    )?;
    Ok(ApiRequest {
        method: Method::POST,
        path: format!("{}/funnels/analyze", mode.project_root(project)),
        query: Vec::new(),
        body: Some(json!({
            "steps": params.steps,
            "filters": params.filters.clone().unwrap_or_default(),
            "startDate": start,
            "endDate": end,
        })),
    })
}

/// Builds the performance metrics request.
pub fn get_performance_metrics(
    mode: AuthMode,
    project: &str,
    params: &GetPerformanceMetricsParams,
    now: DateTime<Utc>,
) -> anyhow::Result<ApiRequest> {
    let (start, end) = resolve_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        default_window(),
        now,
    )?;
    Ok(ApiRequest {
        method: Method::POST,
        path: format!("{}/metrics/performance", mode.project_root(project)),
        query: Vec::new(),
        body: Some(json!({
            "metrics": params.metrics,
            "groupBy": params.group_by.clone().unwrap_or_default(),
            "percentiles": params.percentiles.clone().unwrap_or_else(|| DEFAULT_PERCENTILES.to_vec()),
            "startDate": start,
            "endDate": end,
        })),
    })
}

/// Builds the custom query request. The query and its parameters are
/// forwarded verbatim.
pub fn execute_custom_query(
    mode: AuthMode,
    project: &str,
    params: &ExecuteCustomQueryParams,
) -> anyhow::Result<ApiRequest> {
    Ok(ApiRequest {
        method: Method::POST,
        path: format!("{}/query", mode.project_root(project)),
        query: Vec::new(),
        body: Some(json!({
            "query": params.query,
            "parameters": params.parameters.clone().unwrap_or_else(|| json!({})),
        })),
    })
}

/// Builds the project enumeration request. Organization-scoped, so the
/// path carries no project segment.
pub fn list_projects() -> anyhow::Result<ApiRequest> {
    Ok(ApiRequest {
        method: Method::GET,
        path: "/api/v1/projects".to_string(),
        query: Vec::new(),
        body: None,
    })
}

/// Builds the per-user sessions request.
pub fn get_user_sessions(
    mode: AuthMode,
    project: &str,
    params: &GetUserSessionsParams,
) -> anyhow::Result<ApiRequest> {
    Ok(ApiRequest {
        method: Method::GET,
        path: format!(
            "{}/users/{}/sessions",
            mode.project_root(project),
            params.user_id
        ),
        query: Vec::new(),
        body: None,
    })
}

// ==================== Unsupported-mode notices ====================

/// Fixed explanatory text returned when a tool is not served under the
/// active credential type. Always a plain text result, never an error.
pub fn unsupported_message(tool: ToolKind, mode: AuthMode) -> String {
    match (mode, tool) {
        (AuthMode::Organization, ToolKind::SearchSessions) => {
            "Unfiltered search_sessions is not available with an organization API key; \
             the organization API can only list sessions for a known user. Pass a user_id \
             argument, or configure a full-access key (OPENREPLAY_API_KEY) to search the \
             whole project."
                .to_string()
        }
        (AuthMode::Organization, _) => format!(
            "{tool} is not available with an organization API key. Configure a full-access \
             key (OPENREPLAY_API_KEY with OPENREPLAY_PROJECT_ID) to enable it. With the \
             current credentials you can still use list_projects, get_user_sessions, \
             get_user_journey, or search_sessions with a user_id."
        ),
        (AuthMode::FullAccess, _) => format!(
            "{tool} is only available with an organization API key \
             (OPENREPLAY_ORG_API_KEY with OPENREPLAY_PROJECT_KEY). With a full-access key, \
             use search_sessions to query sessions in the configured project instead."
        ),
    }
}
