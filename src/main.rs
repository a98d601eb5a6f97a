use std::sync::Arc;

use anyhow::Context;

use moodwell_api::config::Config;
use moodwell_api::services::emotion::EmotionAnalyzer;
use moodwell_api::{build_router, store, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodwell_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let store = store::open_store(&config)
        .await
        .context("Failed to open store")?;
    store::seed_default_habits(store.as_ref())
        .await
        .context("Failed to seed default habits")?;

    let analyzer = EmotionAnalyzer::from_config(&config.ai)
        .context("Failed to build language model client")?;

    let state = AppState {
        store,
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
