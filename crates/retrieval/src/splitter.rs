//! Sentence-boundary document splitting.
//!
//! Splits each document into chunks of a fixed number of sentences, using
//! UAX #29 sentence boundaries. Boundary slices cover the whole text, so
//! concatenating a document's chunks in order reconstructs it exactly.

use linkrag_core::{AppError, AppResult};
use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, Document};

/// Splits documents into fixed-size sentence chunks.
pub struct SentenceSplitter {
    split_length: usize,
}

impl SentenceSplitter {
    /// Create a splitter producing chunks of `split_length` sentences.
    pub fn new(split_length: usize) -> AppResult<Self> {
        if split_length == 0 {
            return Err(AppError::Config(
                "split length must be at least 1 sentence".to_string(),
            ));
        }

        Ok(Self { split_length })
    }

    /// Split one document into ordered chunks.
    ///
    /// A document of S sentences yields ceil(S / split_length) chunks, the
    /// last possibly shorter. Every chunk inherits the document's metadata
    /// unchanged. Deterministic for identical input and parameters.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        let sentences: Vec<&str> = document.content.split_sentence_bounds().collect();

        sentences
            .chunks(self.split_length)
            .enumerate()
            .map(|(position, group)| Chunk {
                content: group.concat(),
                position: position as u32,
                meta: document.meta.clone(),
            })
            .collect()
    }

    /// Split every document, preserving document order.
    pub fn split_all(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|document| self.split(document))
            .collect();

        tracing::info!(
            "Split {} documents into {} chunks ({} sentences per chunk)",
            documents.len(),
            chunks.len(),
            self.split_length
        );

        chunks
    }
}
