//! Analysis errors.

use thiserror::Error;

use crate::llm::LlmError;
use crate::models::DataUriError;

/// Structural problems with an operation's input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("documentDataUri is invalid: {0}")]
    DataUri(DataUriError),
}

/// Errors from running an analysis operation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] LlmError),

    /// A reverse Q&A relevance check failed; the whole operation fails.
    #[error("Classification of segment {index} failed: {source}")]
    Classification {
        index: usize,
        #[source]
        source: LlmError,
    },

    #[error("Extraction returned no text")]
    ExtractionFailed,

    #[error("Synthesized audio is unusable: {0}")]
    Audio(String),
}
