//! Document analysis operations.
//!
//! Each operation validates its input, renders a prompt, asks the
//! generation client for a response of a fixed shape, and returns it
//! unchanged. Operations never touch the document store.

mod error;
pub mod prompts;
mod schemas;
pub mod segment;
mod speech;
mod types;

use std::sync::Arc;

use tracing::{debug, info};

use crate::llm::{generate_structured, GenerationClient, GenerationRequest, MediaPart};
use crate::models::DataUri;

pub use error::{AnalysisError, ValidationError};
pub use types::{
    ChatOutput, ClauseSummary, Contradiction, ContradictionsOutput, DocumentInput, ExtractOutput,
    FairnessOutput, Findings, FlaggedClause, GlossaryEntry, IntoFindings, MediaInput,
    QuestionInput, ReverseQaOutput, Severity, SpeechInput, SpeechOutput, SummarizeOutput,
    Validate,
};

/// Temperature for text extraction and OCR.
const EXTRACTION_TEMPERATURE: f32 = 0.1;
/// Temperature for reverse Q&A relevance checks.
const CLASSIFIER_TEMPERATURE: f32 = 0.2;

/// Jurisdiction used for fairness benchmarks when none is configured.
pub const DEFAULT_JURISDICTION: &str = "India";

/// Tunables for [`Analyzer`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    /// Maximum characters of document text sent in a single prompt.
    pub max_content_chars: usize,
    /// Legal system fairness is benchmarked against.
    pub jurisdiction: String,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_content_chars: 100_000,
            jurisdiction: DEFAULT_JURISDICTION.to_string(),
        }
    }
}

/// Runs analysis operations against a generation client.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn GenerationClient>,
    settings: AnalyzerSettings,
}

impl Analyzer {
    pub fn new(client: Arc<dyn GenerationClient>, settings: AnalyzerSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Keep at most the configured number of characters.
    fn truncate_content<'a>(&self, text: &'a str) -> &'a str {
        let max = self.settings.max_content_chars;
        match text.char_indices().nth(max) {
            Some((end, _)) => {
                debug!("Truncating document to {} characters", max);
                &text[..end]
            }
            None => text,
        }
    }

    /// Split the document into clauses and paraphrase each one.
    pub async fn summarize_clauses(
        &self,
        input: &DocumentInput,
    ) -> Result<SummarizeOutput, AnalysisError> {
        input.validate()?;
        let prompt = prompts::render(
            prompts::SUMMARIZE_PROMPT,
            &[("content", self.truncate_content(&input.document_text))],
        );
        let output: SummarizeOutput = generate_structured(
            self.client.as_ref(),
            GenerationRequest::new(prompt).with_schema(schemas::summarize()),
        )
        .await?;

        let paraphrased = output
            .clause_summaries
            .iter()
            .filter(|s| !input.document_text.contains(s.clause.as_str()))
            .count();
        if paraphrased > 0 {
            debug!(
                "{} of {} summarized clauses are not verbatim",
                paraphrased,
                output.clause_summaries.len()
            );
        }

        Ok(output)
    }

    /// Define the legal terms used in the document.
    pub async fn generate_glossary(
        &self,
        input: &DocumentInput,
    ) -> Result<Vec<GlossaryEntry>, AnalysisError> {
        input.validate()?;
        let prompt = prompts::render(
            prompts::GLOSSARY_PROMPT,
            &[("content", self.truncate_content(&input.document_text))],
        );
        Ok(generate_structured(
            self.client.as_ref(),
            GenerationRequest::new(prompt).with_schema(schemas::glossary()),
        )
        .await?)
    }

    /// Flag clauses that are harsher than customary practice in the
    /// configured jurisdiction.
    pub async fn benchmark_fairness(
        &self,
        input: &DocumentInput,
    ) -> Result<FairnessOutput, AnalysisError> {
        input.validate()?;
        let jurisdiction = self.settings.jurisdiction.as_str();
        let prompt =
            prompts::fairness_prompt(jurisdiction, self.truncate_content(&input.document_text));
        Ok(generate_structured(
            self.client.as_ref(),
            GenerationRequest::new(prompt).with_schema(schemas::fairness(jurisdiction)),
        )
        .await?)
    }

    /// Find pairs of clauses that contradict each other.
    pub async fn detect_contradictions(
        &self,
        input: &DocumentInput,
    ) -> Result<ContradictionsOutput, AnalysisError> {
        input.validate()?;
        let prompt = prompts::render(
            prompts::CONTRADICTIONS_PROMPT,
            &[("content", self.truncate_content(&input.document_text))],
        );
        Ok(generate_structured(
            self.client.as_ref(),
            GenerationRequest::new(prompt).with_schema(schemas::contradictions()),
        )
        .await?)
    }

    /// Return the document clauses relevant to a question.
    ///
    /// The document is split on blank lines and each segment is classified
    /// with its own yes/no request, one at a time, in document order. The
    /// first failed request fails the whole operation.
    pub async fn reverse_q_and_a(
        &self,
        input: &QuestionInput,
    ) -> Result<ReverseQaOutput, AnalysisError> {
        input.validate()?;
        let segments = segment::split_clauses(&input.document_text);
        debug!("Classifying {} segments", segments.len());

        let mut relevant_clauses = Vec::new();
        for (index, clause) in segments.into_iter().enumerate() {
            let prompt = prompts::render(
                prompts::RELEVANCE_PROMPT,
                &[("question", &input.question), ("clause", clause)],
            );
            let answer = self
                .client
                .generate(GenerationRequest::new(prompt).with_temperature(CLASSIFIER_TEMPERATURE))
                .await
                .map_err(|source| AnalysisError::Classification { index, source })?;

            if segment::is_affirmative(&answer) {
                relevant_clauses.push(clause.to_string());
            }
        }

        info!(
            "Reverse Q&A kept {} relevant clauses",
            relevant_clauses.len()
        );
        Ok(ReverseQaOutput { relevant_clauses })
    }

    /// Answer a question strictly from the document.
    pub async fn chat(&self, input: &QuestionInput) -> Result<ChatOutput, AnalysisError> {
        input.validate()?;
        let prompt = prompts::render(
            prompts::CHAT_PROMPT,
            &[
                ("content", self.truncate_content(&input.document_text)),
                ("question", &input.question),
            ],
        );
        Ok(generate_structured(
            self.client.as_ref(),
            GenerationRequest::new(prompt).with_schema(schemas::chat()),
        )
        .await?)
    }

    /// Extract the text of any supported document (image, PDF, DOCX).
    pub async fn extract_text(&self, input: &MediaInput) -> Result<ExtractOutput, AnalysisError> {
        self.extract(input, prompts::EXTRACT_TEXT_PROMPT).await
    }

    /// Read the text of a photographed or scanned page.
    pub async fn ocr(&self, input: &MediaInput) -> Result<ExtractOutput, AnalysisError> {
        self.extract(input, prompts::OCR_PROMPT).await
    }

    /// Read text aloud.
    pub async fn text_to_speech(&self, input: &SpeechInput) -> Result<SpeechOutput, AnalysisError> {
        input.validate()?;
        let audio = self.client.synthesize_speech(&input.text).await?;
        debug!("Received {} audio", audio.mime_type);
        let uri = speech::playable(audio)?;
        Ok(SpeechOutput {
            audio_data_uri: uri.to_string(),
        })
    }

    async fn extract(
        &self,
        input: &MediaInput,
        prompt: &str,
    ) -> Result<ExtractOutput, AnalysisError> {
        input.validate()?;
        let media = DataUri::parse(&input.document_data_uri)
            .map_err(|e| AnalysisError::Invalid(ValidationError::DataUri(e)))?;
        debug!("Extracting text from {} upload", media.mime_type);

        let output: ExtractOutput = generate_structured(
            self.client.as_ref(),
            GenerationRequest::new(prompt)
                .with_schema(schemas::extract_text())
                .with_media(MediaPart::from(media))
                .with_temperature(EXTRACTION_TEMPERATURE),
        )
        .await?;

        if output.text.trim().is_empty() {
            return Err(AnalysisError::ExtractionFailed);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::testing::ScriptedClient;

    const LEASE: &str = "1. Pay rent monthly.\n\n2. No pets allowed.";

    fn analyzer(client: Arc<ScriptedClient>) -> Analyzer {
        Analyzer::new(client, AnalyzerSettings::default())
    }

    #[tokio::test]
    async fn test_reverse_q_and_a_pet_policy() {
        let client = Arc::new(ScriptedClient::yes_when(&["pets"]));
        let out = analyzer(client.clone())
            .reverse_q_and_a(&QuestionInput::new(LEASE, "What is the pet policy?"))
            .await
            .unwrap();

        assert_eq!(out.relevant_clauses, vec!["2. No pets allowed."]);
        assert_eq!(client.calls(), 2);
        for request in client.requests() {
            assert_eq!(request.temperature, Some(CLASSIFIER_TEMPERATURE));
            assert!(request.schema.is_none());
        }
    }

    #[tokio::test]
    async fn test_reverse_q_and_a_preserves_order() {
        let doc = "A. alpha\n\nB. beta\n\nC. gamma\n\nD. delta";
        let client = Arc::new(ScriptedClient::yes_when(&["delta", "alpha", "gamma"]));
        let out = analyzer(client)
            .reverse_q_and_a(&QuestionInput::new(doc, "q"))
            .await
            .unwrap();
        assert_eq!(out.relevant_clauses, vec!["A. alpha", "C. gamma", "D. delta"]);
    }

    #[tokio::test]
    async fn test_reverse_q_and_a_is_idempotent() {
        let doc = "A. alpha\n\nB. beta\n\nC. gamma";
        let client = Arc::new(ScriptedClient::yes_when(&["alpha", "gamma"]));
        let analyzer = analyzer(client);

        let first = analyzer
            .reverse_q_and_a(&QuestionInput::new(doc, "q"))
            .await
            .unwrap();
        let refiltered = analyzer
            .reverse_q_and_a(&QuestionInput::new(first.relevant_clauses.join("\n\n"), "q"))
            .await
            .unwrap();
        assert_eq!(refiltered, first);
    }

    #[tokio::test]
    async fn test_reverse_q_and_a_stops_at_first_failure() {
        let client = Arc::new(ScriptedClient::from_fn(|req| {
            if req.prompt.contains("Clause: B.") {
                Err(LlmError::Connection("reset".into()))
            } else {
                Ok("YES".into())
            }
        }));
        let err = analyzer(client.clone())
            .reverse_q_and_a(&QuestionInput::new("A. a\n\nB. b\n\nC. c", "q"))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Classification { index: 1, .. }));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_call() {
        let client = Arc::new(ScriptedClient::always("{}"));
        let analyzer = analyzer(client.clone());

        let err = analyzer
            .summarize_clauses(&DocumentInput::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Invalid(_)));

        let err = analyzer
            .chat(&QuestionInput::new("doc", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Invalid(_)));

        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_summarize_returns_clauses() {
        let client = Arc::new(ScriptedClient::always(
            r#"{"clauseSummaries": [{"clause": "2. No pets allowed.", "summary": "You cannot keep pets."}]}"#,
        ));
        let out = analyzer(client.clone())
            .summarize_clauses(&DocumentInput::new(LEASE))
            .await
            .unwrap();

        assert_eq!(out.clause_summaries.len(), 1);
        assert!(LEASE.contains(&out.clause_summaries[0].clause));
        let request = &client.requests()[0];
        assert!(request.prompt.contains(LEASE));
        assert!(request.schema.is_some());
    }

    #[tokio::test]
    async fn test_glossary_accepts_empty_list() {
        let client = Arc::new(ScriptedClient::always("[]"));
        let out = analyzer(client)
            .generate_glossary(&DocumentInput::new(LEASE))
            .await
            .unwrap();
        assert!(out.into_findings().is_empty());
    }

    #[tokio::test]
    async fn test_fairness_rejects_unknown_severity() {
        let client = Arc::new(ScriptedClient::always(
            r#"{"benchmarks": [{"clause": "x", "reason": "y", "severity": "Critical"}]}"#,
        ));
        let err = analyzer(client)
            .benchmark_fairness(&DocumentInput::new(LEASE))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::GenerationFailed(LlmError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn test_fairness_uses_configured_jurisdiction() {
        let client = Arc::new(ScriptedClient::always(r#"{"benchmarks": []}"#));
        let analyzer = Analyzer::new(
            client.clone(),
            AnalyzerSettings {
                jurisdiction: "Kenya".to_string(),
                ..AnalyzerSettings::default()
            },
        );
        let out = analyzer
            .benchmark_fairness(&DocumentInput::new(LEASE))
            .await
            .unwrap();
        assert!(out.into_findings().is_empty());
        assert!(client.requests()[0]
            .prompt
            .contains("standard practice in Kenya"));
    }

    #[tokio::test]
    async fn test_contradictions_require_pairs() {
        let client = Arc::new(ScriptedClient::always(
            r#"{"contradictions": [{"contradictoryClauses": ["only one"], "explanation": "x"}]}"#,
        ));
        let err = analyzer(client)
            .detect_contradictions(&DocumentInput::new(LEASE))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_content_is_truncated() {
        let client = Arc::new(ScriptedClient::always(r#"{"answer": "ok"}"#));
        let analyzer = Analyzer::new(
            client.clone(),
            AnalyzerSettings {
                max_content_chars: 5,
                ..AnalyzerSettings::default()
            },
        );
        analyzer
            .chat(&QuestionInput::new("héllo world", "q"))
            .await
            .unwrap();
        let prompt = &client.requests()[0].prompt;
        assert!(prompt.contains("héllo\n"));
        assert!(!prompt.contains("world"));
    }

    #[tokio::test]
    async fn test_truncation_counts_characters_not_bytes() {
        let client = Arc::new(ScriptedClient::always(r#"{"answer": "ok"}"#));
        let analyzer = Analyzer::new(
            client.clone(),
            AnalyzerSettings {
                max_content_chars: 3,
                ..AnalyzerSettings::default()
            },
        );
        analyzer
            .chat(&QuestionInput::new("§§§§§§", "q"))
            .await
            .unwrap();
        let prompt = &client.requests()[0].prompt;
        assert!(prompt.contains("§§§\n"));
        assert!(!prompt.contains("§§§§"));

        let short = "日本";
        assert_eq!(analyzer.truncate_content(short), short);
    }

    #[tokio::test]
    async fn test_text_to_speech_returns_wav_uri() {
        let client = Arc::new(ScriptedClient::always("\u{1}\u{0}\u{2}\u{0}"));
        let out = analyzer(client.clone())
            .text_to_speech(&SpeechInput::new("Lien. A legal claim."))
            .await
            .unwrap();

        let uri = DataUri::parse(&out.audio_data_uri).unwrap();
        assert_eq!(uri.mime_type, "audio/wav");
        assert_eq!(client.requests()[0].prompt, "Lien. A legal claim.");
    }

    #[tokio::test]
    async fn test_text_to_speech_requires_text() {
        let client = Arc::new(ScriptedClient::always("\u{1}\u{0}"));
        let err = analyzer(client.clone())
            .text_to_speech(&SpeechInput::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Invalid(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_extract_text_attaches_media() {
        let client = Arc::new(ScriptedClient::always(r#"{"text": "LEASE AGREEMENT"}"#));
        let out = analyzer(client.clone())
            .extract_text(&MediaInput::new("data:application/pdf;base64,aGk="))
            .await
            .unwrap();
        assert_eq!(out.text, "LEASE AGREEMENT");

        let request = &client.requests()[0];
        let media = request.media.as_ref().unwrap();
        assert_eq!(media.mime_type, "application/pdf");
        assert_eq!(media.data, "aGk=");
        assert_eq!(request.temperature, Some(EXTRACTION_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_ocr_empty_text_is_failure() {
        let client = Arc::new(ScriptedClient::always(r#"{"text": "  "}"#));
        let err = analyzer(client.clone())
            .ocr(&MediaInput::new("data:image/png;base64,aGk="))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionFailed));
        assert!(client.requests()[0].prompt.starts_with("You are an OCR engine"));
    }
}
