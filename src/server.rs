//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use crush_dither::Engine;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api;
use crate::models::AppConfig;
use crate::services::{InMemoryPaletteStore, PaletteSource, PaletteStore, ProgressEvent, SupervisorPool};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<Engine>,
    pub palettes: Arc<dyn PaletteStore>,
    pub sessions: Arc<SupervisorPool>,
}

/// Create application state from configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    let engine = Arc::new(Engine::with_blue_noise_seed(config.blue_noise_seed));
    let palettes = Arc::new(InMemoryPaletteStore::with_named(config.named_palettes()));
    let sessions = Arc::new(SupervisorPool::new(engine.clone()));

    AppState {
        config: Arc::new(config),
        engine,
        palettes,
        sessions,
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixelcrush API",
        description = "Color quantization and dithering service",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_process,
        api::handle_progress,
        api::handle_cancel,
        api::handle_strategies,
        api::handle_list_palettes,
        api::handle_get_palette,
        api::handle_import_hex,
        api::handle_import_image,
    ),
    components(schemas(
        api::PaletteInfo,
        api::PaletteListResponse,
        api::PaletteResponse,
        api::StrategyInfo,
        api::StrategiesResponse,
        api::CancelResponse,
        PaletteSource,
        ProgressEvent,
    )),
    tags(
        (name = "Processing", description = "Image quantization and run control"),
        (name = "Palettes", description = "Palette listing and import")
    )
)]
pub struct ApiDoc;

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        // Processing
        .route("/api/process", post(api::handle_process))
        .route("/api/sessions/:session/progress", get(api::handle_progress))
        .route("/api/sessions/:session/run", delete(api::handle_cancel))
        .route("/api/strategies", get(api::handle_strategies))
        // Palettes
        .route("/api/palettes", get(api::handle_list_palettes))
        .route("/api/palettes/hex", post(api::handle_import_hex))
        .route("/api/palettes/image", post(api::handle_import_image))
        .route("/api/palettes/:id", get(api::handle_get_palette))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
