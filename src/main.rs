use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use locale_gateway::config::Config;
use locale_gateway::i18n::Catalog;
use locale_gateway::server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_gateway=info".parse()?),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    info!(
        "Starting locale gateway (default: {}, supported: {})",
        config.default_locale,
        config.supported_locales.join(", ")
    );

    let state = AppState {
        catalog: Arc::new(Catalog::new(Arc::clone(&config))),
        config: Arc::clone(&config),
    };
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
