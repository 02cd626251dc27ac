//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/upload` - Document upload and extraction
//! - `/api/chat` - Questions about an uploaded document
//! - `/api/health` - Health checks
//! - `/` - Static file serving (frontend)

pub mod chat;
pub mod health;
pub mod static_files;
pub mod upload;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
///
/// - API routes are prefixed with `/api/`
/// - Everything else is served from the frontend build
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(upload::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(health::router(state.clone()));

    // API routes take precedence over static files
    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(state))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}
