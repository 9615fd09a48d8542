//! OpenReplay MCP - session analytics for AI assistants
//!
//! A protocol adapter that exposes OpenReplay's session-analytics API as a
//! set of MCP tools over stdio. Each tool call is translated into exactly
//! one outbound HTTP request; all aggregation and filtering happens
//! remotely.

pub mod api;
pub mod config;
pub mod mcp;
