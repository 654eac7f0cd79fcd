//! Recent-documents endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::super::error::ApiError;
use super::super::AppState;
use crate::models::Document;

/// Body for adding a document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub content: String,
    pub name: Option<String>,
    pub data_uri: Option<String>,
    pub file_type: Option<String>,
}

/// List documents, newest first.
pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<Document>> {
    Json(state.documents.list())
}

pub async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let Json(req) = payload?;
    let document = state.documents.add(
        &req.content,
        req.name.as_deref(),
        req.data_uri,
        req.file_type,
    )?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    state
        .documents
        .get(&doc_id)
        .map(Json)
        .ok_or(ApiError::NotFound(doc_id))
}

/// Delete a document. Unknown ids succeed without effect.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete(&doc_id)?;
    Ok(StatusCode::NO_CONTENT)
}
