//! Prompt input types.

use serde::{Deserialize, Serialize};

/// One ranked context document as seen by the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Chunk text content
    pub content: String,

    /// Source URL of the chunk
    pub url: String,
}

impl ContextDocument {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            url: url.into(),
        }
    }
}
