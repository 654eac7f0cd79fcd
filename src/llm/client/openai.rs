//! OpenAI-compatible chat completions API (OpenAI, Groq, Together.ai).

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{compose_prompt, status_error, GenerationRequest, LlmConfig, MediaPart};
use crate::llm::error::LlmError;

/// Key used to wrap non-object schemas; JSON mode only produces objects.
const WRAP_KEY: &str = "items";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

/// Schema actually requested from the provider.
///
/// Arrays and other non-object roots are wrapped as `{"items": schema}`.
fn request_schema(schema: &Value) -> (Value, bool) {
    if schema.get("type").and_then(Value::as_str) == Some("object") {
        (schema.clone(), false)
    } else {
        (
            json!({
                "type": "object",
                "properties": { WRAP_KEY: schema },
                "required": [WRAP_KEY],
            }),
            true,
        )
    }
}

fn build_request(
    config: &LlmConfig,
    request: &GenerationRequest,
    temperature: f32,
) -> (ChatRequest, bool) {
    let (schema, wrapped) = match &request.schema {
        Some(schema) => {
            let (s, w) = request_schema(schema);
            (Some(s), w)
        }
        None => (None, false),
    };

    let text = compose_prompt(&request.prompt, schema.as_ref());
    let content = match &request.media {
        Some(media) => MessageContent::Parts(vec![
            ContentPart::Text { text },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: media.data_url(),
                },
            },
        ]),
        None => MessageContent::Text(text),
    };

    let body = ChatRequest {
        model: config.model().to_string(),
        messages: vec![ChatMessage {
            role: "user",
            content,
        }],
        max_tokens: config.max_tokens(),
        temperature,
        response_format: schema.map(|_| ResponseFormat {
            kind: "json_object",
        }),
    };
    (body, wrapped)
}

/// Undo the object wrapping applied by [`request_schema`].
fn unwrap_items(raw: &str) -> Result<String, LlmError> {
    let value = crate::llm::parse_json_response(raw)?;
    match value {
        Value::Object(mut map) => match map.remove(WRAP_KEY) {
            Some(inner) => Ok(inner.to_string()),
            None => Ok(Value::Object(map).to_string()),
        },
        other => Ok(other.to_string()),
    }
}

pub(super) async fn call(
    client: &Client,
    config: &LlmConfig,
    api_key: &str,
    request: &GenerationRequest,
    temperature: f32,
) -> Result<String, LlmError> {
    let (body, wrapped) = build_request(config, request, temperature);
    let url = format!("{}/v1/chat/completions", config.endpoint());

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .send()
        .await
        .map_err(|e| LlmError::Connection(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }

    let chat_response: ChatResponse = resp
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))?;

    if let Some(error) = chat_response.error {
        return Err(LlmError::Api(error.message));
    }

    let text = chat_response
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse(config.provider_name()));
    }

    if wrapped {
        unwrap_items(&text)
    } else {
        Ok(text)
    }
}

fn build_speech_request<'a>(config: &'a LlmConfig, text: &'a str) -> SpeechRequest<'a> {
    SpeechRequest {
        model: config.speech_model(),
        input: text,
        voice: config.speech_voice(),
        response_format: "wav",
    }
}

/// `/v1/audio/speech`: the body is the audio file itself.
pub(super) async fn speak(
    client: &Client,
    config: &LlmConfig,
    api_key: &str,
    text: &str,
) -> Result<MediaPart, LlmError> {
    let url = format!("{}/v1/audio/speech", config.endpoint());

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&build_speech_request(config, text))
        .send()
        .await
        .map_err(|e| LlmError::Connection(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }

    let audio = resp
        .bytes()
        .await
        .map_err(|e| LlmError::Connection(e.to_string()))?;
    if audio.is_empty() {
        return Err(LlmError::EmptyResponse(config.provider_name()));
    }

    Ok(MediaPart {
        mime_type: "audio/wav".to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(&audio),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MediaPart;
    use serde_json::json;

    #[test]
    fn test_plain_text_content_is_string() {
        let config = LlmConfig::default();
        let (body, wrapped) = build_request(&config, &GenerationRequest::new("Hello"), 0.2);
        let body = serde_json::to_value(body).unwrap();
        assert!(!wrapped);
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_media_content_uses_data_url() {
        let config = LlmConfig::default();
        let request = GenerationRequest::new("Read this").with_media(MediaPart {
            mime_type: "image/jpeg".to_string(),
            data: "AAAA".to_string(),
        });
        let (body, _) = build_request(&config, &request, 0.1);
        let body = serde_json::to_value(body).unwrap();
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_array_schema_is_wrapped() {
        let config = LlmConfig::default();
        let request = GenerationRequest::new("Terms")
            .with_schema(json!({"type": "array", "items": {"type": "string"}}));
        let (body, wrapped) = build_request(&config, &request, 0.4);
        let body = serde_json::to_value(body).unwrap();
        assert!(wrapped);
        assert_eq!(body["response_format"]["type"], "json_object");
        let prompt = body["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("\"items\""));
    }

    #[test]
    fn test_unwrap_items() {
        assert_eq!(unwrap_items(r#"{"items": ["a", "b"]}"#).unwrap(), r#"["a","b"]"#);
        // Models that ignore the wrapper still get through
        assert_eq!(unwrap_items(r#"["a"]"#).unwrap(), r#"["a"]"#);
    }

    #[test]
    fn test_speech_request_asks_for_wav() {
        let mut config = LlmConfig::default();
        config.device.speech_model = "gpt-4o-mini-tts".to_string();
        config.device.speech_voice = "alloy".to_string();
        let body = serde_json::to_value(build_speech_request(&config, "Lien. A claim.")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini-tts",
                "input": "Lien. A claim.",
                "voice": "alloy",
                "response_format": "wav"
            })
        );
    }
}
