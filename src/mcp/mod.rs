//! MCP (Model Context Protocol) server for OpenReplay.
//!
//! Exposes OpenReplay session analytics to AI tools via the Model Context
//! Protocol. Every tool forwards to the OpenReplay HTTP API; nothing is
//! computed or cached locally.
//!
//! The server runs on stdio transport and implements the following tools:
//! - `search_sessions`: search sessions by filter set
//! - `get_session_details`: fetch one full session record
//! - `get_session_events`: fetch a session's event stream
//! - `aggregate_sessions`: aggregate metrics grouped by dimensions
//! - `get_user_journey`: fetch a user's session history
//! - `get_errors_issues`: fetch grouped error records
//! - `get_funnel_analysis`: compute funnel conversion stats
//! - `get_performance_metrics`: fetch performance percentiles
//! - `execute_custom_query`: pass a query through to the analytics store
//! - `list_projects`: enumerate accessible projects (organization keys)
//! - `get_user_sessions`: fetch one user's sessions (organization keys)

pub mod dispatch;
pub mod tools;

mod server;

pub use server::{run_server, OpenReplayServer};
