//! Google Gemini `generateContent` API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{compose_prompt, status_error, GenerationRequest, LlmConfig, MediaPart};
use crate::llm::error::LlmError;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: GeminiInlineData },
}

#[derive(Debug, Serialize)]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

/// Audio-only generation with a prebuilt voice.
#[derive(Debug, Serialize)]
struct GeminiSpeechRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiSpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiSpeechConfig {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<GeminiResponseInlineData>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

fn build_request(config: &LlmConfig, request: &GenerationRequest, temperature: f32) -> GeminiRequest {
    let mut parts = vec![GeminiPart::Text {
        text: compose_prompt(&request.prompt, request.schema.as_ref()),
    }];
    if let Some(media) = &request.media {
        parts.push(GeminiPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: media.mime_type.clone(),
                data: media.data.clone(),
            },
        });
    }

    GeminiRequest {
        contents: vec![GeminiContent { parts }],
        generation_config: GeminiGenerationConfig {
            temperature,
            max_output_tokens: config.max_tokens(),
            response_mime_type: request.schema.as_ref().map(|_| "application/json"),
            response_schema: request.schema.as_ref().map(to_gemini_schema),
        },
    }
}

/// Convert to Gemini's OpenAPI-style schema: upper-case type names, and only
/// the keys the API accepts.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                let converted = match key.as_str() {
                    "type" => match value.as_str() {
                        Some(t) => Value::String(t.to_uppercase()),
                        None => value.clone(),
                    },
                    "properties" => match value.as_object() {
                        Some(props) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        None => value.clone(),
                    },
                    "items" => to_gemini_schema(value),
                    "description" | "enum" | "required" | "minItems" | "maxItems" => {
                        value.clone()
                    }
                    _ => continue,
                };
                out.insert(key.clone(), converted);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn build_speech_request(config: &LlmConfig, text: &str) -> GeminiSpeechRequest {
    GeminiSpeechRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart::Text {
                text: text.to_string(),
            }],
        }],
        generation_config: GeminiSpeechConfig {
            response_modalities: ["AUDIO"],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: config.speech_voice().to_string(),
                    },
                },
            },
        },
    }
}

/// POST a `generateContent` body and return the first candidate's parts.
async fn generate_content<B: Serialize>(
    client: &Client,
    config: &LlmConfig,
    api_key: &str,
    model: &str,
    body: &B,
) -> Result<Vec<GeminiResponsePart>, LlmError> {
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.endpoint(),
        model
    );

    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::Connection(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }

    let gemini_response: GeminiResponse = resp
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))?;

    if let Some(error) = gemini_response.error {
        return Err(LlmError::Api(error.message));
    }

    Ok(gemini_response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default())
}

pub(super) async fn call(
    client: &Client,
    config: &LlmConfig,
    api_key: &str,
    request: &GenerationRequest,
    temperature: f32,
) -> Result<String, LlmError> {
    let body = build_request(config, request, temperature);
    let parts = generate_content(client, config, api_key, config.model(), &body).await?;
    let text: String = parts.into_iter().filter_map(|p| p.text).collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse("Gemini"));
    }
    Ok(text)
}

/// Synthesize speech. Gemini answers with raw PCM (`audio/L16`).
pub(super) async fn speak(
    client: &Client,
    config: &LlmConfig,
    api_key: &str,
    text: &str,
) -> Result<MediaPart, LlmError> {
    let body = build_speech_request(config, text);
    let parts = generate_content(client, config, api_key, config.speech_model(), &body).await?;

    parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .filter(|audio| !audio.data.is_empty())
        .map(|audio| MediaPart {
            mime_type: audio.mime_type,
            data: audio.data,
        })
        .ok_or(LlmError::EmptyResponse("Gemini"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MediaPart;
    use crate::analysis::GlossaryEntry;
    use crate::llm::schema::output_schema;
    use serde_json::json;

    #[test]
    fn test_schema_types_uppercased() {
        let s = output_schema::<Vec<GlossaryEntry>>();
        let converted = to_gemini_schema(&s);
        assert_eq!(converted["type"], "ARRAY");
        assert_eq!(converted["items"]["type"], "OBJECT");
        assert_eq!(converted["items"]["properties"]["term"]["type"], "STRING");
        let required = converted["items"]["required"].as_array().unwrap();
        assert!(required.contains(&json!("term")));
        assert!(required.contains(&json!("definition")));
        assert_eq!(
            converted["items"]["properties"]["term"]["description"],
            "The legal term."
        );
    }

    #[test]
    fn test_request_with_media_and_schema() {
        let config = LlmConfig::default();
        let request = GenerationRequest::new("Extract")
            .with_schema(json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            }))
            .with_media(MediaPart {
                mime_type: "image/png".to_string(),
                data: "aGk=".to_string(),
            });
        let body = serde_json::to_value(build_request(&config, &request, 0.1)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().starts_with("Extract"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_plain_request_has_no_json_mode() {
        let config = LlmConfig::default();
        let body =
            serde_json::to_value(build_request(&config, &GenerationRequest::new("Hi"), 0.4))
                .unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hi");
        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_speech_request_uses_prebuilt_voice() {
        let mut config = LlmConfig::default();
        config.device.speech_voice = "Algenib".to_string();
        let body = serde_json::to_value(build_speech_request(&config, "Lien. A claim.")).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Lien. A claim.");
        assert_eq!(body["generationConfig"]["responseModalities"], json!(["AUDIO"]));
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Algenib"
        );
    }

    #[test]
    fn test_audio_part_deserializes() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{
                "inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAA="}
            }]}}]
        }))
        .unwrap();
        let candidates = response.candidates.unwrap();
        let part = &candidates[0].content.as_ref().unwrap().parts[0];
        let audio = part.inline_data.as_ref().unwrap();
        assert_eq!(audio.mime_type, "audio/L16;codec=pcm;rate=24000");
        assert!(part.text.is_none());
    }
}
