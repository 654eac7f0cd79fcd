//! Generation client configuration.
//!
//! Split into two tiers:
//! - `LlmAppConfig`: from the config file (generation params, limits)
//! - `LlmDeviceConfig`: from env vars, device-specific (provider, endpoint, model, api_key)
//!
//! Env vars: NOMIKO_PROVIDER, NOMIKO_MODEL, NOMIKO_ENDPOINT, NOMIKO_API_KEY,
//! NOMIKO_SPEECH_MODEL, NOMIKO_SPEECH_VOICE
//! (provider keys GEMINI_API_KEY, GOOGLE_API_KEY, GROQ_API_KEY, OPENAI_API_KEY
//! and OLLAMA_HOST are also honoured)

use serde::{Deserialize, Serialize};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const TOGETHER_ENDPOINT: &str = "https://api.together.xyz";
const TOGETHER_MODEL: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo";
const OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const OLLAMA_MODEL: &str = "llama3.1:8b";

// Speech synthesis (model, voice) per provider flavor
const GEMINI_SPEECH: (&str, &str) = ("gemini-2.5-flash-preview-tts", "Algenib");
const OPENAI_SPEECH: (&str, &str) = ("gpt-4o-mini-tts", "alloy");
const GROQ_SPEECH: (&str, &str) = ("playai-tts", "Fritz-PlayAI");

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini API (default)
    #[default]
    Gemini,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl prefer::FromValue for LlmProvider {
    fn from_value(value: &prefer::ConfigValue) -> prefer::Result<Self> {
        match value.as_str() {
            Some(s) => LlmProvider::from_str(s).ok_or_else(|| prefer::Error::ConversionError {
                key: String::new(),
                type_name: "LlmProvider".to_string(),
                source: format!("unknown provider: {}", s).into(),
            }),
            None => Err(prefer::Error::ConversionError {
                key: String::new(),
                type_name: "LlmProvider".to_string(),
                source: "expected string".into(),
            }),
        }
    }
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" | "googleai" => Some(Self::Gemini),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Hosted providers need a key; a local Ollama does not.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

/// Application-level LLM config (from the config file).
/// Controls how the model is asked, not how to connect to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct LlmAppConfig {
    /// Whether the generation service is enabled
    #[serde(default = "default_enabled")]
    #[prefer(default)]
    pub enabled: bool,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    #[prefer(default)]
    pub max_tokens: u32,
    /// Temperature for generation when an operation does not set its own
    #[serde(default = "default_temperature")]
    #[prefer(default)]
    pub temperature: f32,
    /// Maximum characters of document content to send to the model
    #[serde(default = "default_max_content_chars")]
    #[prefer(default)]
    pub max_content_chars: usize,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    #[prefer(default)]
    pub timeout_secs: u64,
}

/// Device-level LLM config (from env vars, varies per device).
/// Controls how to connect to the LLM backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmDeviceConfig {
    /// LLM provider
    pub provider: LlmProvider,
    /// API base URL (provider-specific defaults apply)
    pub endpoint: String,
    /// Model to use
    pub model: String,
    /// API key for hosted providers
    pub api_key: Option<String>,
    /// Text-to-speech model (empty when the provider has none)
    pub speech_model: String,
    /// Prebuilt voice used for speech
    pub speech_voice: String,
}

/// Combined LLM configuration (runtime).
///
/// Serde: only the app config is serialized. Device config is populated from
/// environment variables during Default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct LlmConfig {
    /// Application-level settings (from config file)
    #[serde(flatten)]
    #[prefer(flatten)]
    pub app: LlmAppConfig,
    /// Device-level settings (from env) - not serialized
    #[serde(skip)]
    #[prefer(skip)]
    pub device: LlmDeviceConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_content_chars() -> usize {
    100_000
}

fn default_timeout_secs() -> u64 {
    300
}

// === LlmAppConfig implementations ===

impl Default for LlmAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_content_chars: default_max_content_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmAppConfig {
    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

// === LlmDeviceConfig implementations ===

impl Default for LlmDeviceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LlmDeviceConfig {
    /// Create device config from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    /// Create device config from an arbitrary variable lookup.
    ///
    /// - NOMIKO_PROVIDER: gemini, openai, groq, together, ollama
    /// - NOMIKO_MODEL / NOMIKO_ENDPOINT / NOMIKO_API_KEY: explicit overrides
    ///
    /// Without an explicit provider, the first provider key found wins
    /// (GEMINI_API_KEY/GOOGLE_API_KEY, then GROQ_API_KEY, then OPENAI_API_KEY).
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let explicit_provider = var("NOMIKO_PROVIDER").map(|p| p.to_lowercase());
        let explicit_endpoint = var("NOMIKO_ENDPOINT");
        let explicit_model = var("NOMIKO_MODEL");
        let explicit_key = var("NOMIKO_API_KEY");
        let gemini_key = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY"));

        // Flavor picks endpoint/model defaults: gemini, openai, groq, together, ollama
        let flavor = match explicit_provider.as_deref() {
            Some(p) if LlmProvider::from_str(p).is_some() => p.to_string(),
            _ if gemini_key.is_some() => "gemini".to_string(),
            _ if var("GROQ_API_KEY").is_some() => "groq".to_string(),
            _ if var("OPENAI_API_KEY").is_some() => "openai".to_string(),
            _ => "gemini".to_string(),
        };

        let provider = LlmProvider::from_str(&flavor).unwrap_or_default();

        let (default_endpoint, default_model) = match flavor.as_str() {
            "openai" => (OPENAI_ENDPOINT, OPENAI_MODEL),
            "groq" => (GROQ_ENDPOINT, GROQ_MODEL),
            "together" => (TOGETHER_ENDPOINT, TOGETHER_MODEL),
            "ollama" => (OLLAMA_ENDPOINT, OLLAMA_MODEL),
            _ => (GEMINI_ENDPOINT, GEMINI_MODEL),
        };

        let endpoint = explicit_endpoint
            .or_else(|| {
                if provider == LlmProvider::Ollama {
                    var("OLLAMA_HOST")
                } else {
                    None
                }
            })
            .unwrap_or_else(|| default_endpoint.to_string());

        let api_key = explicit_key.or_else(|| match flavor.as_str() {
            "gemini" => gemini_key,
            "groq" => var("GROQ_API_KEY"),
            "openai" => var("OPENAI_API_KEY"),
            "together" => var("TOGETHER_API_KEY"),
            _ => None,
        });

        let (default_speech_model, default_speech_voice) = match flavor.as_str() {
            "openai" | "together" => OPENAI_SPEECH,
            "groq" => GROQ_SPEECH,
            "ollama" => ("", ""),
            _ => GEMINI_SPEECH,
        };

        Self {
            provider,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: explicit_model.unwrap_or_else(|| default_model.to_string()),
            api_key,
            speech_model: var("NOMIKO_SPEECH_MODEL")
                .unwrap_or_else(|| default_speech_model.to_string()),
            speech_voice: var("NOMIKO_SPEECH_VOICE")
                .unwrap_or_else(|| default_speech_voice.to_string()),
        }
    }

    /// Get the provider name for display.
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::Gemini => "Gemini",
            LlmProvider::Ollama => "Ollama",
            LlmProvider::OpenAI => {
                if self.endpoint.contains("groq.com") {
                    "Groq"
                } else if self.endpoint.contains("together.xyz") {
                    "Together.ai"
                } else {
                    "OpenAI"
                }
            }
        }
    }

    /// Get a provider-aware availability hint for error messages.
    pub fn availability_hint(&self) -> String {
        match self.provider {
            LlmProvider::Gemini => {
                if self.api_key.is_none() {
                    "Gemini API key not set. Set GEMINI_API_KEY or NOMIKO_API_KEY".to_string()
                } else {
                    format!("Gemini API not available at {}", self.endpoint)
                }
            }
            LlmProvider::OpenAI => {
                if self.api_key.is_none() {
                    format!(
                        "{} API key not set. Set OPENAI_API_KEY, GROQ_API_KEY or NOMIKO_API_KEY",
                        self.provider_name()
                    )
                } else {
                    format!("{} API not available at {}", self.provider_name(), self.endpoint)
                }
            }
            LlmProvider::Ollama => format!(
                "Ollama not available at {}. Make sure Ollama is running: ollama serve",
                self.endpoint
            ),
        }
    }
}

// === LlmConfig (combined) implementations ===

impl LlmConfig {
    /// Create from app config (file) and device config (env).
    pub fn new(app: LlmAppConfig, device: LlmDeviceConfig) -> Self {
        Self { app, device }
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        self.app.is_default()
    }

    // Convenience accessors that delegate to sub-configs

    pub fn enabled(&self) -> bool {
        self.app.enabled
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.device.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.device.endpoint
    }

    pub fn model(&self) -> &str {
        &self.device.model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.device.api_key.as_deref()
    }

    pub fn speech_model(&self) -> &str {
        &self.device.speech_model
    }

    pub fn speech_voice(&self) -> &str {
        &self.device.speech_voice
    }

    pub fn max_tokens(&self) -> u32 {
        self.app.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.app.temperature
    }

    pub fn max_content_chars(&self) -> usize {
        self.app.max_content_chars
    }

    pub fn timeout_secs(&self) -> u64 {
        self.app.timeout_secs
    }

    pub fn provider_name(&self) -> &'static str {
        self.device.provider_name()
    }

    pub fn availability_hint(&self) -> String {
        self.device.availability_hint()
    }

    // Setters for CLI override use cases

    pub fn set_endpoint(&mut self, endpoint: String) {
        self.device.endpoint = endpoint;
    }

    pub fn set_model(&mut self, model: String) {
        self.device.model = model;
    }
}
