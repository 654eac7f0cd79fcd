//! Scripted generation client for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;

use crate::llm::{GenerationClient, GenerationRequest, LlmError, MediaPart};

/// MIME type of the audio returned by [`ScriptedClient::synthesize_speech`].
const SCRIPTED_AUDIO_MIME: &str = "audio/L16;codec=pcm;rate=24000";

type Responder = dyn Fn(&GenerationRequest) -> Result<String, LlmError> + Send + Sync;

/// A [`GenerationClient`] that answers from a closure and records every
/// request it receives.
pub struct ScriptedClient {
    respond: Box<Responder>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn from_fn(
        respond: impl Fn(&GenerationRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Wait `delay` before every answer, so callers can overlap requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Always answer with `text`.
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Always fail with an API error carrying `message`.
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(move |_| Err(LlmError::Api(message.clone())))
    }

    /// Answer YES to prompts containing any of `needles`, NO otherwise.
    pub fn yes_when(needles: &[&str]) -> Self {
        let needles: Vec<String> = needles.iter().map(|s| s.to_string()).collect();
        Self::from_fn(move |req| {
            let clause = req.prompt.split("Clause: ").nth(1).unwrap_or_default();
            if needles.iter().any(|n| clause.contains(n.as_str())) {
                Ok("YES".to_string())
            } else {
                Ok("NO".to_string())
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);
        result
    }

    /// The scripted answer's bytes come back as raw PCM samples.
    async fn synthesize_speech(&self, text: &str) -> Result<MediaPart, LlmError> {
        let samples = self.generate(GenerationRequest::new(text)).await?;
        Ok(MediaPart {
            mime_type: SCRIPTED_AUDIO_MIME.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(samples.as_bytes()),
        })
    }
}
