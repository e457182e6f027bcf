use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

use training_center::{
    app::create_router,
    app_state::AppState,
    config, db,
    telemetry::{init_telemetry, TelemetryConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::init().context("Failed to load configuration")?;
    let telemetry = init_telemetry(TelemetryConfig::from_config(config))?;

    let pool = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    let app = create_router(AppState::new(pool, config.clone()));

    let addr = config.server_addr();
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
