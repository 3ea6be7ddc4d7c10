//! mcp-core CLI
//!
//! Command-line entry point for the MCP core server: picks a transport,
//! wires up the ambient demo provider, and runs until a shutdown signal
//! arrives.

mod demo;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mcp_core::registry::{PromptRegistry, ResourceRegistry, ToolRegistry};
use mcp_core::server::{McpServer, ServerConfig, TransportSelection, DEFAULT_SHUTDOWN_DEADLINE};
use tracing_subscriber::EnvFilter;

/// mcp-core Server
#[derive(Parser, Debug)]
#[command(name = "mcp-server")]
#[command(version)]
#[command(about = "Model Context Protocol JSON-RPC server")]
struct Args {
    /// Transport to run: stdio, sse, or streamable-http
    #[arg(long, default_value = "stdio")]
    transport: String,

    /// Port to listen on (ignored by the stdio transport)
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Log level passed to `tracing_subscriber`'s `EnvFilter`
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let transport = match args.transport.as_str() {
        "stdio" => TransportSelection::Stdio,
        "sse" => TransportSelection::Sse { port: args.port },
        "streamable-http" => TransportSelection::StreamableHttp { port: args.port },
        other => {
            eprintln!("Warning: unknown transport '{other}', falling back to stdio");
            TransportSelection::Stdio
        }
    };

    let tools = Arc::new(ToolRegistry::new());
    tools.register(Arc::new(demo::EchoTool)).await;

    let prompts = Arc::new(PromptRegistry::new());
    prompts.register(Arc::new(demo::GreetingPrompt)).await;

    let resources = Arc::new(ResourceRegistry::new());
    resources.register(Arc::new(demo::WelcomeResource)).await;

    let server = Arc::new(McpServer::new(
        tools,
        prompts,
        resources,
        ServerConfig {
            transport,
            ..ServerConfig::default()
        },
    ));

    let shutdown_server = Arc::clone(&server);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        if let Err(err) = shutdown_server.stop(DEFAULT_SHUTDOWN_DEADLINE).await {
            tracing::warn!(%err, "error while shutting down");
        }
    });

    server.run().await?;
    Ok(())
}
