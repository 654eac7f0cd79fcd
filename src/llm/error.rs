//! Errors from the generation client.

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to the LLM service.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with an error status or error body.
    #[error("API error: {0}")]
    Api(String),

    /// The response could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response parsed but does not match the requested output shape.
    #[error("Response does not match schema: {0}")]
    Schema(String),

    /// The service returned no content.
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),

    /// No API key configured for a provider that needs one.
    #[error("{0}")]
    MissingApiKey(String),

    /// The configured provider cannot perform this kind of request.
    #[error("{provider} does not support {capability}")]
    Unsupported {
        provider: &'static str,
        capability: &'static str,
    },

    /// LLM is disabled in configuration.
    #[error("LLM is disabled")]
    Disabled,
}
