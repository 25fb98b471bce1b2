use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use forgejo_mcp::config::Config;
use forgejo_mcp::server::ForgejoMcp;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (logs go to stderr to keep stdout clean for MCP)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(base_url = %config.base_url, "starting forgejo-mcp");

    let service = ForgejoMcp::new(config)?;
    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    Ok(())
}
