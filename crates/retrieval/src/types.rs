//! Data model for the retrieval stages.

use serde::{Deserialize, Serialize};

/// Metadata key under which every document records its origin.
pub const META_URL: &str = "url";

/// Raw content retrieved for one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedResource {
    /// Originating URL
    pub url: String,

    /// Raw response body
    pub content: String,
}

/// Normalized plain-text content derived from one fetched resource.
///
/// The metadata mapping always carries at least the `url` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Plain-text content
    pub content: String,

    /// Metadata mapping (at least `url`)
    pub meta: serde_json::Value,
}

impl Document {
    /// Create a document originating from the given URL.
    pub fn new(content: impl Into<String>, url: &str) -> Self {
        Self {
            content: content.into(),
            meta: serde_json::json!({ META_URL: url }),
        }
    }

    /// The source URL recorded in this document's metadata.
    pub fn url(&self) -> Option<&str> {
        self.meta.get(META_URL).and_then(|v| v.as_str())
    }
}

/// A contiguous run of sentences from one document.
///
/// Chunks inherit their parent document's metadata unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content (a fixed count of sentences, last chunk possibly fewer)
    pub content: String,

    /// Position within the parent document
    pub position: u32,

    /// Parent document metadata, inherited unchanged
    pub meta: serde_json::Value,
}

impl Chunk {
    /// The source URL recorded in this chunk's metadata.
    pub fn url(&self) -> Option<&str> {
        self.meta.get(META_URL).and_then(|v| v.as_str())
    }
}

/// A chunk plus its relevance score for the current query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The ranked chunk
    pub chunk: Chunk,

    /// Relevance score (higher is more relevant)
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_carries_url_metadata() {
        let doc = Document::new("some text", "https://example.org/page");
        assert_eq!(doc.url(), Some("https://example.org/page"));
        assert_eq!(doc.content, "some text");
    }

    #[test]
    fn test_chunk_url_reads_inherited_metadata() {
        let doc = Document::new("text", "https://example.org/a");
        let chunk = Chunk {
            content: "text".to_string(),
            position: 0,
            meta: doc.meta.clone(),
        };
        assert_eq!(chunk.url(), doc.url());
    }

    #[test]
    fn test_chunk_without_url_metadata() {
        let chunk = Chunk {
            content: "text".to_string(),
            position: 0,
            meta: serde_json::json!({}),
        };
        assert_eq!(chunk.url(), None);
    }
}
