//! Ollama `/api/generate` for local inference.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{compose_prompt, status_error, GenerationRequest, LlmConfig};
use crate::llm::error::LlmError;

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    /// JSON schema for structured outputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    /// Base64 images for multimodal models.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    error: Option<String>,
}

fn build_request(config: &LlmConfig, request: &GenerationRequest, temperature: f32) -> OllamaRequest {
    OllamaRequest {
        model: config.model().to_string(),
        prompt: compose_prompt(&request.prompt, request.schema.as_ref()),
        stream: false,
        format: request.schema.clone(),
        images: request.media.iter().map(|m| m.data.clone()).collect(),
        options: OllamaOptions {
            temperature,
            num_predict: config.max_tokens(),
        },
    }
}

pub(super) async fn call(
    client: &Client,
    config: &LlmConfig,
    request: &GenerationRequest,
    temperature: f32,
) -> Result<String, LlmError> {
    let body = build_request(config, request, temperature);
    let url = format!("{}/api/generate", config.endpoint());

    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| LlmError::Connection(format!("{} ({})", e, config.availability_hint())))?;

    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }

    let ollama_resp: OllamaResponse = resp
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))?;

    if let Some(error) = ollama_resp.error {
        return Err(LlmError::Api(error));
    }
    if ollama_resp.response.trim().is_empty() {
        return Err(LlmError::EmptyResponse("Ollama"));
    }

    Ok(ollama_resp.response)
}
