//! `data:` URIs carrying uploaded document media.
//!
//! Only the base64 form is accepted: `data:<mime>;base64,<payload>`.

use std::fmt;

use base64::Engine;
use thiserror::Error;

/// Errors from parsing a data URI.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI has no MIME type")]
    MissingMimeType,
    #[error("data URI must use base64 encoding")]
    NotBase64,
    #[error("data URI payload is empty")]
    EmptyPayload,
    #[error("data URI payload is not valid base64: {0}")]
    InvalidPayload(String),
}

/// A parsed base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64 payload, still encoded.
    pub data: String,
}

impl DataUri {
    /// Encode raw bytes with the given MIME type.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Parse `data:<mime>;base64,<payload>`.
    ///
    /// Extra parameters between the MIME type and `;base64` (such as
    /// `;charset=utf-8`) are ignored. The payload is checked to decode.
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::NotBase64)?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim();
        if mime_type.is_empty() {
            return Err(DataUriError::MissingMimeType);
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(DataUriError::NotBase64);
        }

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            data: payload.to_string(),
        })
    }

    /// Whether the media is a raster image (as opposed to PDF, DOCX, ...).
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}
