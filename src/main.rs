use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vnc_mcp::config::Config;
use vnc_mcp::control::Controller;
use vnc_mcp::mcp::VncControlServer;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP transport; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "starting vnc-mcp server");

    let server = VncControlServer::new(Controller::new(config));
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
