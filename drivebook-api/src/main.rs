use anyhow::Context;
use drivebook_api::{app, AppState};
use drivebook_core::payment::MockPaymentAdapter;
use drivebook_core::SimulatedBackend;
use drivebook_store::{CatalogSource, Config, StaticCatalog};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drivebook_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Drivebook API on port {}", config.server.port);

    let catalog = StaticCatalog::new()
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load lesson catalog: {}", e))?;

    let app_state = AppState::new(
        &config,
        catalog,
        Arc::new(SimulatedBackend::new(config.logout_delay())),
        Arc::new(MockPaymentAdapter::approving()),
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
