use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use api_gateway::config;
use api_gateway::lifecycle::Shutdown;
use api_gateway::observability::logging;
use api_gateway::{GatewayCore, HttpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config file path is optional; environment variables alone are enough.
    let config_path = std::env::var_os("GATEWAY_CONFIG").map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        issuer = %config.jwt.issuer,
        "configuration loaded"
    );

    // Registries are validated here; a defective table refuses startup.
    let core = Arc::new(GatewayCore::from_config(&config)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(&config, core);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
