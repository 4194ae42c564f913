use std::{env, error::Error, sync::Arc};

use bakery_pos::api::{AppState, create_router};
use bakery_pos::clock::SystemClock;
use bakery_pos::config::ConfigLoader;
use bakery_pos::store::MemoryStore;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/bakery";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal: variables can come from the environment.
    dotenv().ok();

    let config_dir = env::var("BAKERY_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)
        .inspect_err(|e| error!(config_dir = %config_dir, "Failed to load configuration: {}", e))?;
    info!(
        config_dir = %config_dir,
        business = %config.system().business_name,
        staff = config.config().staff.len(),
        "Configuration loaded"
    );

    let state = AppState::new(config, Arc::new(MemoryStore::new()), Arc::new(SystemClock));
    let app = create_router(state);

    let address = env::var("BAKERY_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = TcpListener::bind(&address)
        .await
        .inspect_err(|e| error!(address = %address, "Failed to bind: {}", e))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
