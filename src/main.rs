//! audiolog service entry point
//!
//! Owns every resource lifecycle the pipeline itself refuses to own: the
//! configuration, the database pool, and the listening socket.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use audiolog::config::ServiceConfig;
use audiolog::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::resolve();

    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting audiolog (batch audio-metadata ingest)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", config.database_path.display());

    let pool = audiolog::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let state = AppState::new(pool, config.store_timeout);
    let app = audiolog::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
