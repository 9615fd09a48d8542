use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "openreplay-mcp")]
#[command(version)]
#[command(about = "MCP server for OpenReplay session analytics")]
#[command(long_about = "Starts an MCP (Model Context Protocol) server on stdio that forwards\n\
    analytics tool calls to the OpenReplay API.\n\n\
    Configuration is read from the environment:\n    \
    OPENREPLAY_API_URL       API base URL (default: https://api.openreplay.com)\n    \
    OPENREPLAY_API_KEY       full-access API key (bearer)\n    \
    OPENREPLAY_PROJECT_ID    project ID for the full-access key\n    \
    OPENREPLAY_ORG_API_KEY   organization API key\n    \
    OPENREPLAY_PROJECT_KEY   project key for the organization API\n    \
    OPENREPLAY_AUTH_MODE     explicit mode override (full-access | organization)")]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    // Initialize logging. Stdout belongs to the MCP transport, so log
    // output goes to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openreplay_mcp=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(openreplay_mcp::mcp::run_server())
}
