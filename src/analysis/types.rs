//! Request and response shapes for the analysis operations.
//!
//! Field names serialize in camelCase; they are the JSON contract of the
//! HTTP API and of the model responses.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Structural input validation, run before anything is sent to the model.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}

/// Input for the operations that only need the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[serde(default)]
    pub document_text: String,
}

impl DocumentInput {
    pub fn new(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
        }
    }
}

impl Validate for DocumentInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require("documentText", &self.document_text)
    }
}

/// Input for reverse Q&A and chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default)]
    pub document_text: String,
    #[serde(default)]
    pub question: String,
}

impl QuestionInput {
    pub fn new(document_text: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            question: question.into(),
        }
    }
}

impl Validate for QuestionInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require("documentText", &self.document_text)?;
        require("question", &self.question)
    }
}

/// Input for text extraction and OCR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInput {
    /// `data:<mime>;base64,<payload>`
    #[serde(default)]
    pub document_data_uri: String,
}

impl MediaInput {
    pub fn new(document_data_uri: impl Into<String>) -> Self {
        Self {
            document_data_uri: document_data_uri.into(),
        }
    }
}

impl Validate for MediaInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require("documentDataUri", &self.document_data_uri)?;
        crate::models::DataUri::parse(&self.document_data_uri)
            .map(|_| ())
            .map_err(ValidationError::DataUri)
    }
}

/// Input for text-to-speech.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechInput {
    #[serde(default)]
    pub text: String,
}

impl SpeechInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// What is read aloud for a glossary entry.
    pub fn for_glossary_entry(entry: &GlossaryEntry) -> Self {
        Self::new(format!("{}. {}", entry.term, entry.definition))
    }
}

impl Validate for SpeechInput {
    fn validate(&self) -> Result<(), ValidationError> {
        require("text", &self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechOutput {
    /// `data:audio/wav;base64,<payload>` unless the provider chose another format.
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClauseSummary {
    /// The original text of the legal clause.
    pub clause: String,
    /// The plain English summary of the clause.
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeOutput {
    /// An array of objects, each containing an original clause and its plain English summary.
    pub clause_summaries: Vec<ClauseSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GlossaryEntry {
    /// The legal term.
    pub term: String,
    /// The definition of the legal term.
    pub definition: String,
}

/// Fairness severity, judged by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlaggedClause {
    /// The original clause that was flagged.
    pub clause: String,
    /// The reason why this clause is considered stricter or unusual compared to common legal practices.
    pub reason: String,
    /// The severity of the flagged issue.
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FairnessOutput {
    /// An array of flagged clauses with reasons and severity.
    pub benchmarks: Vec<FlaggedClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contradiction {
    /// The two clauses that contradict each other.
    pub contradictory_clauses: [String; 2],
    /// An explanation of why these two clauses are contradictory.
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContradictionsOutput {
    /// An array of detected contradictions.
    pub contradictions: Vec<Contradiction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseQaOutput {
    pub relevant_clauses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatOutput {
    /// The AI-generated answer to the question based on the document.
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractOutput {
    /// The extracted text from the document.
    pub text: String,
}

/// A list result where "nothing found" is a distinct, successful outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Findings<T> {
    Found(Vec<T>),
    NoneFound,
}

impl<T> Findings<T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Findings::NoneFound
        } else {
            Findings::Found(items)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Findings::NoneFound)
    }

    pub fn items(&self) -> &[T] {
        match self {
            Findings::Found(items) => items,
            Findings::NoneFound => &[],
        }
    }
}

/// Conversion of list-shaped outputs into [`Findings`].
pub trait IntoFindings {
    type Item;

    fn into_findings(self) -> Findings<Self::Item>;
}

impl IntoFindings for Vec<GlossaryEntry> {
    type Item = GlossaryEntry;

    fn into_findings(self) -> Findings<GlossaryEntry> {
        Findings::from_vec(self)
    }
}

impl IntoFindings for FairnessOutput {
    type Item = FlaggedClause;

    fn into_findings(self) -> Findings<FlaggedClause> {
        Findings::from_vec(self.benchmarks)
    }
}

impl IntoFindings for ContradictionsOutput {
    type Item = Contradiction;

    fn into_findings(self) -> Findings<Contradiction> {
        Findings::from_vec(self.contradictions)
    }
}
