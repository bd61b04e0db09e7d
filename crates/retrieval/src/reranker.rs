//! Chunk reranking against the user query.
//!
//! The `Reranker` trait is the seam between the pipeline and the scoring
//! backend; `CohereReranker` implements it over the Cohere rerank API.

use async_trait::async_trait;
use linkrag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::types::{Chunk, ScoredChunk};

/// Orders chunks by descending relevance to a query.
///
/// Implementations must return a permutation of the input (every chunk
/// exactly once, nothing added) ordered by non-increasing score.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(&self, query: &str, chunks: Vec<Chunk>) -> AppResult<Vec<ScoredChunk>>;
}

/// Default Cohere API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

/// Cohere rerank API request format.
#[derive(Debug, Serialize)]
struct CohereRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: Vec<&'a str>,
}

/// Cohere rerank API response format.
#[derive(Debug, Deserialize)]
struct CohereResponse {
    results: Vec<CohereResult>,
}

#[derive(Debug, Deserialize)]
struct CohereResult {
    index: usize,
    relevance_score: f32,
}

/// Cohere rerank client.
pub struct CohereReranker {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl CohereReranker {
    /// Create a client against the public Cohere endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Reassemble chunks into backend ranking order, enforcing that the
    /// response is a permutation of the request.
    fn into_ranked(chunks: Vec<Chunk>, results: Vec<CohereResult>) -> AppResult<Vec<ScoredChunk>> {
        let total = chunks.len();
        let mut slots: Vec<Option<Chunk>> = chunks.into_iter().map(Some).collect();
        let mut ranked = Vec::with_capacity(total);

        for result in results {
            let chunk = slots
                .get_mut(result.index)
                .and_then(Option::take)
                .ok_or_else(|| {
                    AppError::Rerank(format!(
                        "Ranking referenced document {} twice or out of range",
                        result.index
                    ))
                })?;

            ranked.push(ScoredChunk {
                chunk,
                score: result.relevance_score,
            });
        }

        if ranked.len() != total {
            return Err(AppError::Rerank(format!(
                "Ranking dropped documents: {} in, {} out",
                total,
                ranked.len()
            )));
        }

        Ok(ranked)
    }
}

#[async_trait]
impl Reranker for CohereReranker {
    async fn rerank(&self, query: &str, chunks: Vec<Chunk>) -> AppResult<Vec<ScoredChunk>> {
        // Nothing to rank; the backend rejects empty document lists.
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("Reranking {} chunks", chunks.len());

        let request = CohereRequest {
            model: &self.model,
            query,
            documents: chunks.iter().map(|c| c.content.as_str()).collect(),
        };

        let url = format!("{}/v2/rerank", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Rerank(format!("Rerank request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Rerank(format!(
                "Rerank API error ({}): {}",
                status, error_text
            )));
        }

        let cohere_response: CohereResponse = response
            .json()
            .await
            .map_err(|e| AppError::Rerank(format!("Failed to parse rerank response: {}", e)))?;

        tracing::debug!(
            "Rerank returned {} results",
            cohere_response.results.len()
        );

        Self::into_ranked(chunks, cohere_response.results)
    }
}
