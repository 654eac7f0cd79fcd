//! Document model for the recent-documents store.
//!
//! A document is created once per paste or upload and never mutated
//! afterwards. The serialized field names are the persisted layout, so
//! renaming a field is a breaking change for existing stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of leading words used when a document has no filename.
const NAME_WORDS: usize = 5;

/// One analyzable unit of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Opaque unique identifier (UUID v4).
    pub id: String,
    /// Short label: the original filename or the first few words of content.
    pub name: String,
    /// Full plain text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Original upload as a `data:` URI, kept for preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
    /// MIME type of the original upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl Document {
    /// Create a new document with a fresh id and the current timestamp.
    ///
    /// A missing or blank `name` falls back to [`derive_name`].
    pub fn new(
        content: impl Into<String>,
        name: Option<&str>,
        data_uri: Option<String>,
        file_type: Option<String>,
    ) -> Self {
        let content = content.into();
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => derive_name(&content),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            content,
            created_at: Utc::now(),
            data_uri,
            file_type,
        }
    }

    /// Whether the document came from an uploaded file rather than a paste.
    pub fn has_media(&self) -> bool {
        self.data_uri.is_some()
    }
}

/// Label a document by its first five words followed by an ellipsis.
pub fn derive_name(content: &str) -> String {
    let words: Vec<&str> = content.split_whitespace().take(NAME_WORDS).collect();
    format!("{}...", words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_takes_first_five_words() {
        let name = derive_name("  This Rental Agreement is made on the 1st day of May ");
        assert_eq!(name, "This Rental Agreement is made...");
    }

    #[test]
    fn test_derive_name_short_content() {
        assert_eq!(derive_name("Lease\n\nterms"), "Lease terms...");
    }

    #[test]
    fn test_new_uses_filename_when_present() {
        let doc = Document::new("Some content here", Some("lease.pdf"), None, None);
        assert_eq!(doc.name, "lease.pdf");
        assert!(!doc.has_media());
    }

    #[test]
    fn test_new_blank_name_falls_back() {
        let doc = Document::new("Employment contract between parties", Some("  "), None, None);
        assert_eq!(doc.name, "Employment contract between parties...");
    }

    #[test]
    fn test_new_generates_distinct_ids() {
        let a = Document::new("a", None, None, None);
        let b = Document::new("a", None, None, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialized_layout_is_camel_case() {
        let doc = Document::new(
            "text",
            Some("scan.png"),
            Some("data:image/png;base64,AAAA".to_string()),
            Some("image/png".to_string()),
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["dataUri"], "data:image/png;base64,AAAA");
        assert_eq!(json["fileType"], "image/png");

        let pasted = Document::new("text", None, None, None);
        let json = serde_json::to_value(&pasted).unwrap();
        assert!(json.get("dataUri").is_none());
        assert!(json.get("fileType").is_none());
    }
}
