use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use config::Config;
use services::emotion::EmotionAnalyzer;
use store::WellnessStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WellnessStore>,
    pub analyzer: Arc<EmotionAnalyzer>,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Emotion analysis
        .route("/api/emotion/classify", post(handlers::emotion::classify))
        .route("/api/emotion/preview", post(handlers::emotion::preview))
        // Journal
        .route(
            "/api/journal",
            get(handlers::journal::list_entries).post(handlers::journal::create_entry),
        )
        .route("/api/journal/export", get(handlers::journal::export_entries))
        .route("/api/journal/stats", get(handlers::stats::get_journal_stats))
        .route("/api/journal/:id", get(handlers::journal::get_entry))
        // Moods
        .route(
            "/api/moods",
            get(handlers::moods::list_mood_entries).post(handlers::moods::upsert_mood_entry),
        )
        .route("/api/moods/stats", get(handlers::stats::get_mood_stats))
        // Habits
        .route(
            "/api/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route(
            "/api/habits/:id",
            put(handlers::habits::update_habit).delete(handlers::habits::delete_habit),
        )
        .route(
            "/api/habits/:id/toggle",
            post(handlers::habits::toggle_completion),
        );

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(api_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
