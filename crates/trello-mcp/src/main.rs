//! Trello MCP gateway entry point.

use clap::Parser;
use tracing::info;

use trello_mcp::config::GatewayConfig;
use trello_mcp::gateway::Gateway;
use trello_mcp::server::{serve_stdio, McpServer};

#[derive(Parser)]
#[command(name = "trello-mcp", about = "MCP gateway for the Trello API", version)]
struct Cli {
    /// Override the default board id (falls back to TRELLO_BOARD_ID)
    #[arg(long)]
    board_id: Option<String>,

    /// Override the default list-name filter (falls back to TRELLO_LIST_NAME;
    /// an empty value disables narrowing)
    #[arg(long)]
    list_name: Option<String>,

    /// Override the Trello API base URL (falls back to TRELLO_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries protocol messages only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = GatewayConfig::from_env()?;
    if let Some(board_id) = cli.board_id {
        config.default_board_id = Some(board_id);
    }
    if let Some(list_name) = cli.list_name {
        config.default_list_filter =
            if list_name.trim().is_empty() { None } else { Some(list_name) };
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let gateway = Gateway::new(&config)?;
    let server = McpServer::new(gateway);

    tokio::select! {
        result = serve_stdio(server) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }
    Ok(())
}
