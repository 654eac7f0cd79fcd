//! HTTP request handlers for the web server.

mod analysis_api;
mod documents_api;

use axum::{http::StatusCode, response::IntoResponse};

// Re-export handlers for use by the router
pub use analysis_api::{
    benchmark, chat, contradictions, extract_text, glossary, ocr, reverse_qa, summarize,
    text_to_speech,
};
pub use documents_api::{create_document, delete_document, get_document, list_documents};

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}
