//! Analysis endpoints. Each takes the operation input as a JSON body.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::super::error::ApiError;
use super::super::AppState;
use crate::analysis::{
    ChatOutput, ContradictionsOutput, DocumentInput, ExtractOutput, FairnessOutput, GlossaryEntry,
    MediaInput, QuestionInput, ReverseQaOutput, SpeechInput, SpeechOutput, SummarizeOutput,
};

type Body<T> = Result<Json<T>, JsonRejection>;

pub async fn summarize(
    State(state): State<AppState>,
    payload: Body<DocumentInput>,
) -> Result<Json<SummarizeOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.summarize(&input).await?))
}

pub async fn glossary(
    State(state): State<AppState>,
    payload: Body<DocumentInput>,
) -> Result<Json<Vec<GlossaryEntry>>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.glossary(&input).await?))
}

pub async fn benchmark(
    State(state): State<AppState>,
    payload: Body<DocumentInput>,
) -> Result<Json<FairnessOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.benchmark_fairness(&input).await?))
}

pub async fn contradictions(
    State(state): State<AppState>,
    payload: Body<DocumentInput>,
) -> Result<Json<ContradictionsOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.detect_contradictions(&input).await?))
}

/// Reverse Q&A: clauses relevant to a question, in document order.
pub async fn reverse_qa(
    State(state): State<AppState>,
    payload: Body<QuestionInput>,
) -> Result<Json<ReverseQaOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.reverse_q_and_a(&input).await?))
}

/// Single-turn chat. The client keeps the transcript.
pub async fn chat(
    State(state): State<AppState>,
    payload: Body<QuestionInput>,
) -> Result<Json<ChatOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.chat(&input).await?))
}

pub async fn extract_text(
    State(state): State<AppState>,
    payload: Body<MediaInput>,
) -> Result<Json<ExtractOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.extract_text(&input).await?))
}

pub async fn ocr(
    State(state): State<AppState>,
    payload: Body<MediaInput>,
) -> Result<Json<ExtractOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.ocr(&input).await?))
}

/// Read text aloud; answers with an audio data URI.
pub async fn text_to_speech(
    State(state): State<AppState>,
    payload: Body<SpeechInput>,
) -> Result<Json<SpeechOutput>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.actions.text_to_speech(&input).await?))
}
