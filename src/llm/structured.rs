//! Typed structured generation on top of [`GenerationClient`].

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::client::{GenerationClient, GenerationRequest};
use super::error::LlmError;
use super::schema::output_schema;

/// Run a request for a structured answer and decode it into `T`.
///
/// When the request carries no schema, the one derived from `T` is sent.
/// The answer is parsed as JSON and deserialized; a value that does not fit
/// `T` is reported as [`LlmError::Schema`].
pub async fn generate_structured<T: DeserializeOwned + JsonSchema>(
    client: &dyn GenerationClient,
    mut request: GenerationRequest,
) -> Result<T, LlmError> {
    if request.schema.is_none() {
        request.schema = Some(output_schema::<T>());
    }

    let raw = client.generate(request).await?;
    let value = parse_json_response(&raw)?;

    serde_json::from_value(value).map_err(|e| {
        debug!("Structured response rejected: {}", e);
        LlmError::Schema(e.to_string())
    })
}

/// Parse a model answer as JSON.
///
/// Models in JSON mode sometimes still wrap the payload in a Markdown code
/// fence or add a sentence before it; both are tolerated.
pub fn parse_json_response(raw: &str) -> Result<Value, LlmError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LlmError::Parse("Empty response".to_string()));
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_code_fence(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced) {
        return Ok(value);
    }

    // Fall back to the outermost JSON object or array in the text.
    let start = unfenced.find(&['{', '['][..]);
    let end = unfenced.rfind(&['}', ']'][..]);
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&unfenced[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(LlmError::Parse(format!(
        "Response is not valid JSON: {}",
        preview(trimmed)
    )))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line (```json)
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq, JsonSchema)]
    struct Answer {
        answer: String,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    enum Verdict {
        Fair,
        Unfair,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Ruling {
        verdict: Verdict,
    }

    fn answer_request() -> GenerationRequest {
        GenerationRequest::new("q")
    }

    #[test]
    fn test_parse_plain_json() {
        assert_eq!(parse_json_response(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n[{\"term\": \"lien\"}]\n```";
        assert_eq!(parse_json_response(raw).unwrap(), json!([{"term": "lien"}]));
    }

    #[test]
    fn test_parse_json_with_preamble() {
        let raw = "Here is the result:\n{\"answer\": \"yes\"}\nHope this helps.";
        assert_eq!(parse_json_response(raw).unwrap(), json!({"answer": "yes"}));
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_json_response("I cannot help with that."),
            Err(LlmError::Parse(_))
        ));
        assert!(matches!(parse_json_response("  "), Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_generate_structured_decodes() {
        let client = ScriptedClient::always(r#"{"answer": "Thirty days."}"#);
        let out: Answer = generate_structured(&client, answer_request()).await.unwrap();
        assert_eq!(out.answer, "Thirty days.");
    }

    #[tokio::test]
    async fn test_generate_structured_rejects_shape_mismatch() {
        let client = ScriptedClient::always(r#"{"reply": "Thirty days."}"#);
        let err = generate_structured::<Answer>(&client, answer_request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Schema(_)));
    }

    #[tokio::test]
    async fn test_generate_structured_rejects_unknown_enum_value() {
        let client = ScriptedClient::always(r#"{"verdict": "Maybe"}"#);
        let err = generate_structured::<Ruling>(&client, GenerationRequest::new("q"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Schema(_)));
    }

    #[tokio::test]
    async fn test_generate_structured_sends_derived_schema() {
        let client = ScriptedClient::always(r#"{"answer": "Yes."}"#);
        let _: Answer = generate_structured(&client, answer_request()).await.unwrap();

        let sent = client.requests();
        let schema = sent[0].schema.as_ref().unwrap();
        assert_eq!(schema["required"], json!(["answer"]));
    }

    #[tokio::test]
    async fn test_generate_structured_keeps_explicit_schema() {
        let client = ScriptedClient::always(r#"{"answer": "Yes."}"#);
        let request = GenerationRequest::new("q").with_schema(json!({"type": "object"}));
        let _: Answer = generate_structured(&client, request).await.unwrap();
        assert_eq!(
            client.requests()[0].schema,
            Some(json!({"type": "object"}))
        );
    }
}
