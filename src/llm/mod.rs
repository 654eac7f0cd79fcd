//! LLM integration for structured document analysis.
//!
//! The analysis operations only see the [`GenerationClient`] trait. The HTTP
//! client behind it speaks Gemini, OpenAI-compatible, and Ollama APIs.

mod client;
mod error;
pub mod schema;
mod structured;

pub use client::{
    GenerationClient, GenerationRequest, LlmAppConfig, LlmClient, LlmConfig, LlmDeviceConfig,
    LlmProvider, MediaPart,
};
pub use error::LlmError;
pub use structured::{generate_structured, parse_json_response};
