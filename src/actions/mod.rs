//! Dispatch boundary between presentation surfaces and analysis.
//!
//! Every call is validated, attempted exactly once, and on failure reduced
//! to a fixed per-operation message. The root cause is logged, never
//! returned.

mod chat;
mod tracker;

use std::fmt;
use std::future::Future;

use thiserror::Error;
use tracing::error;

use crate::analysis::{
    AnalysisError, Analyzer, ChatOutput, ContradictionsOutput, DocumentInput, ExtractOutput,
    FairnessOutput, GlossaryEntry, MediaInput, QuestionInput, ReverseQaOutput, SpeechInput,
    SpeechOutput, SummarizeOutput, Validate,
};

pub use chat::ChatSession;
pub use tracker::{RequestTracker, Ticket};

/// The analysis operations reachable through [`Actions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Summarize,
    Glossary,
    FairnessBenchmark,
    ContradictionDetection,
    ReverseQa,
    Chat,
    ExtractText,
    Ocr,
    TextToSpeech,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Summarize,
        Operation::Glossary,
        Operation::FairnessBenchmark,
        Operation::ContradictionDetection,
        Operation::ReverseQa,
        Operation::Chat,
        Operation::ExtractText,
        Operation::Ocr,
        Operation::TextToSpeech,
    ];

    /// The message shown to users when this operation fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            Operation::Summarize => "Failed to generate summary. Please try again.",
            Operation::Glossary => "Failed to generate glossary. Please try again.",
            Operation::FairnessBenchmark => "Failed to benchmark fairness. Please try again.",
            Operation::ContradictionDetection => {
                "Failed to detect contradictions. Please try again."
            }
            Operation::ReverseQa => "Failed to find relevant clauses. Please try again.",
            Operation::Chat => "The AI assistant failed to respond. Please try again.",
            Operation::ExtractText => {
                "Failed to extract text from the document. Please ensure the file is valid and not corrupted."
            }
            Operation::Ocr => {
                "Failed to read text from the image. Please ensure the file is valid and not corrupted."
            }
            Operation::TextToSpeech => "Failed to generate audio. Please try again.",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Summarize => "summarize",
            Operation::Glossary => "glossary",
            Operation::FairnessBenchmark => "fairness_benchmark",
            Operation::ContradictionDetection => "contradiction_detection",
            Operation::ReverseQa => "reverse_qa",
            Operation::Chat => "chat",
            Operation::ExtractText => "extract_text",
            Operation::Ocr => "ocr",
            Operation::TextToSpeech => "text_to_speech",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User-facing failures from [`Actions`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The input was rejected before anything was sent.
    #[error("{message}")]
    Invalid { message: String },

    /// The operation ran and failed.
    #[error("{message}")]
    AnalysisFailed {
        operation: Operation,
        message: &'static str,
    },
}

impl ActionError {
    pub fn message(&self) -> &str {
        match self {
            ActionError::Invalid { message } => message,
            ActionError::AnalysisFailed { message, .. } => message,
        }
    }
}

/// Presentation-facing entry points, one per operation.
#[derive(Clone)]
pub struct Actions {
    analyzer: Analyzer,
}

impl Actions {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    async fn dispatch<I, T, F, Fut>(
        &self,
        operation: Operation,
        input: &I,
        run: F,
    ) -> Result<T, ActionError>
    where
        I: Validate,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AnalysisError>>,
    {
        input.validate().map_err(|e| ActionError::Invalid {
            message: e.to_string(),
        })?;

        run().await.map_err(|e| {
            error!(operation = operation.name(), "Analysis failed: {}", e);
            match e {
                AnalysisError::Invalid(v) => ActionError::Invalid {
                    message: v.to_string(),
                },
                _ => ActionError::AnalysisFailed {
                    operation,
                    message: operation.user_message(),
                },
            }
        })
    }

    pub async fn summarize(&self, input: &DocumentInput) -> Result<SummarizeOutput, ActionError> {
        self.dispatch(Operation::Summarize, input, || {
            self.analyzer.summarize_clauses(input)
        })
        .await
    }

    pub async fn glossary(&self, input: &DocumentInput) -> Result<Vec<GlossaryEntry>, ActionError> {
        self.dispatch(Operation::Glossary, input, || {
            self.analyzer.generate_glossary(input)
        })
        .await
    }

    pub async fn benchmark_fairness(
        &self,
        input: &DocumentInput,
    ) -> Result<FairnessOutput, ActionError> {
        self.dispatch(Operation::FairnessBenchmark, input, || {
            self.analyzer.benchmark_fairness(input)
        })
        .await
    }

    pub async fn detect_contradictions(
        &self,
        input: &DocumentInput,
    ) -> Result<ContradictionsOutput, ActionError> {
        self.dispatch(Operation::ContradictionDetection, input, || {
            self.analyzer.detect_contradictions(input)
        })
        .await
    }

    pub async fn reverse_q_and_a(
        &self,
        input: &QuestionInput,
    ) -> Result<ReverseQaOutput, ActionError> {
        self.dispatch(Operation::ReverseQa, input, || {
            self.analyzer.reverse_q_and_a(input)
        })
        .await
    }

    pub async fn chat(&self, input: &QuestionInput) -> Result<ChatOutput, ActionError> {
        self.dispatch(Operation::Chat, input, || self.analyzer.chat(input))
            .await
    }

    pub async fn extract_text(&self, input: &MediaInput) -> Result<ExtractOutput, ActionError> {
        self.dispatch(Operation::ExtractText, input, || {
            self.analyzer.extract_text(input)
        })
        .await
    }

    pub async fn ocr(&self, input: &MediaInput) -> Result<ExtractOutput, ActionError> {
        self.dispatch(Operation::Ocr, input, || self.analyzer.ocr(input))
            .await
    }

    pub async fn text_to_speech(&self, input: &SpeechInput) -> Result<SpeechOutput, ActionError> {
        self.dispatch(Operation::TextToSpeech, input, || {
            self.analyzer.text_to_speech(input)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerSettings, IntoFindings};
    use crate::testing::ScriptedClient;
    use std::sync::Arc;

    const SECRET: &str = "upstream exploded: quota for key sk-123 exhausted";

    fn actions(client: Arc<ScriptedClient>) -> Actions {
        Actions::new(Analyzer::new(client, AnalyzerSettings::default()))
    }

    #[tokio::test]
    async fn test_every_operation_maps_failure_to_fixed_message() {
        let client = Arc::new(ScriptedClient::failing(SECRET));
        let actions = actions(client.clone());
        let doc = DocumentInput::new("1. Pay rent monthly.\n\n2. No pets allowed.");
        let question = QuestionInput::new(doc.document_text.clone(), "Pets?");
        let media = MediaInput::new("data:image/png;base64,aGk=");

        let results: Vec<(Operation, ActionError)> = vec![
            (Operation::Summarize, actions.summarize(&doc).await.unwrap_err()),
            (Operation::Glossary, actions.glossary(&doc).await.unwrap_err()),
            (
                Operation::FairnessBenchmark,
                actions.benchmark_fairness(&doc).await.unwrap_err(),
            ),
            (
                Operation::ContradictionDetection,
                actions.detect_contradictions(&doc).await.unwrap_err(),
            ),
            (
                Operation::ReverseQa,
                actions.reverse_q_and_a(&question).await.unwrap_err(),
            ),
            (Operation::Chat, actions.chat(&question).await.unwrap_err()),
            (
                Operation::ExtractText,
                actions.extract_text(&media).await.unwrap_err(),
            ),
            (Operation::Ocr, actions.ocr(&media).await.unwrap_err()),
            (
                Operation::TextToSpeech,
                actions
                    .text_to_speech(&SpeechInput::new("Lien. A claim."))
                    .await
                    .unwrap_err(),
            ),
        ];

        for (operation, err) in results {
            assert_eq!(
                err,
                ActionError::AnalysisFailed {
                    operation,
                    message: operation.user_message(),
                }
            );
            assert!(!err.to_string().contains("sk-123"));
        }
        // Exactly one attempt per operation, reverse Q&A included (it stops
        // at its first segment)
        assert_eq!(client.calls(), Operation::ALL.len());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_client() {
        let client = Arc::new(ScriptedClient::always("{}"));
        let actions = actions(client.clone());

        let err = actions
            .reverse_q_and_a(&QuestionInput::new("doc", ""))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::Invalid {
                message: "question is required".to_string()
            }
        );

        let err = actions
            .ocr(&MediaInput::new("not a data uri"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Invalid { .. }));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_passes_result_through() {
        let client = Arc::new(ScriptedClient::always(r#"{"benchmarks": []}"#));
        let out = actions(client)
            .benchmark_fairness(&DocumentInput::new("1. Rent is due."))
            .await
            .unwrap();
        assert!(out.benchmarks.is_empty());
        assert!(out.into_findings().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_speech_reports_fixed_message() {
        struct TextOnly;

        #[async_trait::async_trait]
        impl crate::llm::GenerationClient for TextOnly {
            async fn generate(
                &self,
                _request: crate::llm::GenerationRequest,
            ) -> Result<String, crate::llm::LlmError> {
                Ok(String::new())
            }
        }

        let actions = Actions::new(Analyzer::new(Arc::new(TextOnly), AnalyzerSettings::default()));
        let err = actions
            .text_to_speech(&SpeechInput::new("Lien."))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Failed to generate audio. Please try again.");
    }

    #[test]
    fn test_messages_are_distinct() {
        let mut messages: Vec<&str> = Operation::ALL.iter().map(|o| o.user_message()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), Operation::ALL.len());
    }
}
