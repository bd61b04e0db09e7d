//! Retrieval stages for the linkrag pipeline.
//!
//! This crate owns the document data model and the first four pipeline
//! stages:
//! - **fetcher**: HTTP retrieval of raw page content, one resource per URL
//! - **converter**: HTML to plain-text documents with `url` metadata
//! - **splitter**: sentence-boundary chunking with a fixed sentence count
//! - **reranker**: relevance ordering of chunks against a query
//!
//! Each stage is a thin adapter whose value is the contract it upholds
//! rather than the machinery underneath.

pub mod converter;
pub mod fetcher;
pub mod reranker;
pub mod splitter;
pub mod types;

// Re-export main types
pub use converter::HtmlConverter;
pub use fetcher::LinkFetcher;
pub use reranker::{CohereReranker, Reranker};
pub use splitter::SentenceSplitter;
pub use types::{Chunk, Document, FetchedResource, ScoredChunk};
