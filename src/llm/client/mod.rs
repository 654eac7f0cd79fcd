//! Generation client for document analysis.
//!
//! Supports Google Gemini (default), OpenAI-compatible APIs (OpenAI, Groq,
//! Together.ai), and Ollama for local inference.

mod config;
mod gemini;
mod ollama;
mod openai;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::models::DataUri;

use super::error::LlmError;

pub use config::{LlmAppConfig, LlmConfig, LlmDeviceConfig, LlmProvider};

/// Inline media attached to a prompt (images, PDFs, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

impl MediaPart {
    /// Render as a `data:` URL for APIs that take media by URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl From<DataUri> for MediaPart {
    fn from(uri: DataUri) -> Self {
        Self {
            mime_type: uri.mime_type,
            data: uri.data,
        }
    }
}

/// A single prompt sent to the generation service.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    /// JSON Schema the answer must follow. `None` asks for free text.
    pub schema: Option<Value>,
    pub media: Option<MediaPart>,
    /// Overrides the configured temperature.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_media(mut self, media: MediaPart) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// An opaque text/structured generation capability.
///
/// Implementations return the model's raw answer text. Structured callers go
/// through [`generate_structured`](super::generate_structured), which parses
/// and validates the answer against the request schema.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError>;

    /// Read `text` aloud. The audio comes back in the provider's own format.
    async fn synthesize_speech(&self, _text: &str) -> Result<MediaPart, LlmError> {
        Err(LlmError::Unsupported {
            provider: "This client",
            capability: "speech synthesis",
        })
    }
}

/// HTTP generation client for the configured provider.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| LlmError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key()
            .ok_or_else(|| LlmError::MissingApiKey(self.config.availability_hint()))
    }
}

#[async_trait]
impl GenerationClient for LlmClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        if !self.config.enabled() {
            return Err(LlmError::Disabled);
        }

        let temperature = request
            .temperature
            .unwrap_or_else(|| self.config.temperature());

        debug!(
            provider = self.config.provider_name(),
            model = self.config.model(),
            structured = request.schema.is_some(),
            media = request.media.is_some(),
            "Calling generation service"
        );

        match self.config.provider() {
            LlmProvider::Gemini => {
                gemini::call(&self.client, &self.config, self.api_key()?, &request, temperature)
                    .await
            }
            LlmProvider::OpenAI => {
                openai::call(&self.client, &self.config, self.api_key()?, &request, temperature)
                    .await
            }
            LlmProvider::Ollama => {
                ollama::call(&self.client, &self.config, &request, temperature).await
            }
        }
    }

    async fn synthesize_speech(&self, text: &str) -> Result<MediaPart, LlmError> {
        if !self.config.enabled() {
            return Err(LlmError::Disabled);
        }
        let unsupported = LlmError::Unsupported {
            provider: self.config.provider_name(),
            capability: "speech synthesis",
        };
        if self.config.speech_model().is_empty() {
            return Err(unsupported);
        }

        debug!(
            provider = self.config.provider_name(),
            model = self.config.speech_model(),
            voice = self.config.speech_voice(),
            "Calling speech synthesis"
        );

        match self.config.provider() {
            LlmProvider::Gemini => {
                gemini::speak(&self.client, &self.config, self.api_key()?, text).await
            }
            LlmProvider::OpenAI => {
                openai::speak(&self.client, &self.config, self.api_key()?, text).await
            }
            LlmProvider::Ollama => Err(unsupported),
        }
    }
}

/// Append the output-format instruction for structured requests.
///
/// JSON modes differ between providers and some ignore the schema entirely,
/// so the schema is always spelled out in the prompt as well.
fn compose_prompt(prompt: &str, schema: Option<&Value>) -> String {
    match schema {
        Some(schema) => format!(
            "{}\n\nOutput should be in JSON format and conform to the following schema:\n```\n{}\n```",
            prompt,
            serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string())
        ),
        None => prompt.to_string(),
    }
}

/// Read an unsuccessful response into an API error.
async fn status_error(resp: reqwest::Response) -> LlmError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    LlmError::Api(format!("HTTP {}: {}", status, body))
}
