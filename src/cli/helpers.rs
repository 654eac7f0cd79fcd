//! Shared helper functions for CLI commands.

use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Serialize;

use crate::models::DataUri;

/// A file read from disk, classified by content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedFile {
    /// UTF-8 text that can be analyzed as-is.
    Text(String),
    /// Binary media that needs text extraction first.
    Media(DataUri),
}

/// Detect a file's MIME type: magic bytes first, then the extension.
pub fn detect_mime(path: &Path, content: &[u8]) -> Option<String> {
    infer::get(content)
        .map(|t| t.mime_type().to_string())
        .or_else(|| {
            mime_guess::from_path(path)
                .first()
                .map(|m| m.essence_str().to_string())
        })
}

/// Whether a MIME type names something readable as plain text.
pub fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/")
        || matches!(
            mime,
            "application/json" | "application/xml" | "application/x-yaml" | "application/toml"
        )
}

/// Classify file content as plain text or media.
pub fn classify_file(path: &Path, content: Vec<u8>) -> LoadedFile {
    match detect_mime(path, &content) {
        Some(mime) if !is_text_mime(&mime) => LoadedFile::Media(DataUri::from_bytes(&content, mime)),
        // Unknown or textual: treat as text when it decodes
        mime => match String::from_utf8(content) {
            Ok(text) => LoadedFile::Text(text),
            Err(e) => {
                let mime = mime.unwrap_or_else(|| "application/octet-stream".to_string());
                LoadedFile::Media(DataUri::from_bytes(e.as_bytes(), mime))
            }
        },
    }
}

/// Read and classify a file.
pub async fn load_file(path: &Path) -> anyhow::Result<LoadedFile> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(classify_file(path, content))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write the payload of an audio data URI to `path`.
pub async fn save_audio(audio_data_uri: &str, path: &Path) -> anyhow::Result<()> {
    let uri = DataUri::parse(audio_data_uri)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(&uri.data)?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))
}

/// `<dir>/<slug>.wav` for a glossary term.
pub fn audio_path(dir: &Path, term: &str) -> PathBuf {
    let mut slug = String::new();
    for c in term.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let name = if slug.is_empty() { "term" } else { slug };
    dir.join(format!("{}.wav", name))
}

/// Shorten text for one-line display, on a character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
