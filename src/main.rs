use anyhow::Result;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

use video_catalog::{api, config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config file path as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.api.log_level),
    )
    .init();
    info!("Starting Video Catalog Service");
    info!("Configuration loaded");

    // Create database connection pool and apply migrations
    let database = db::DatabaseService::new(&config.database).await?;

    // Start the REST API
    let http_server = api::rest::RestApi::new(&config.api, Arc::clone(&database.pool))?;
    tokio::spawn(async move {
        if let Err(e) = http_server.run().await {
            error!("API server error: {}", e);
        }
    });

    // Wait for termination signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    Ok(())
}
