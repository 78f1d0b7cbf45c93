//! Weather Service - Main Entry Point

use api::{
    config::{config_path, describe_source},
    run_server,
    telemetry::init_logging,
    Settings,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init_logging(&settings.logging);

    info!("=== Weather Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", describe_source(config_path().as_deref()));

    run_server(settings).await?;

    Ok(())
}
