use clap::Parser;
use datadock::datadock_node::{load_node_config, DataDockHttpServer, DataDockNode};
use log::info;

/// Command line options for the HTTP server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Path to the node configuration file
    #[arg(short, long)]
    config: Option<String>,
}

/// Main entry point for the DataDock HTTP server.
///
/// Loads the node configuration, opens the document store, and serves
/// the REST API until interrupted.
///
/// # Command-Line Arguments
///
/// * `--port <PORT>` - Port for the HTTP server (default: 8000)
/// * `--config <PATH>` - Path to the node configuration file
///
/// # Environment Variables
///
/// * `NODE_CONFIG` - Path to the node configuration file (default: config/node_config.json)
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("Starting DataDock HTTP Server...");

    let Cli { port, config } = Cli::parse();

    let config = load_node_config(config.as_deref())?;
    let node = DataDockNode::new(config)?;
    info!("Serving data directory {}", node.config().data_dir.display());

    info!("Starting HTTP server on port {}...", port);
    let bind_address = format!("127.0.0.1:{}", port);
    let http_server = DataDockHttpServer::new(node, &bind_address);

    http_server.run().await?;

    Ok(())
}
