//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // Recent documents
        .route(
            "/api/documents",
            get(handlers::list_documents).post(handlers::create_document),
        )
        .route(
            "/api/documents/:doc_id",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        // Analysis operations
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/glossary", post(handlers::glossary))
        .route("/api/benchmark", post(handlers::benchmark))
        .route("/api/contradictions", post(handlers::contradictions))
        .route("/api/reverse-qa", post(handlers::reverse_qa))
        .route("/api/chat", post(handlers::chat))
        .route("/api/extract-text", post(handlers::extract_text))
        .route("/api/ocr", post(handlers::ocr))
        .route("/api/tts", post(handlers::text_to_speech))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
