//! Error types for the linkrag CLI.
//!
//! This module defines a unified error enum covering the error categories of
//! the pipeline: configuration, fetching, reranking, prompt assembly, and
//! generation.

use thiserror::Error;

/// Unified error type for the linkrag CLI.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
///
/// Per-URL fetch failures and unconvertible pages are recoverable and are
/// not represented here; they are logged and skipped by their stages.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors, including missing credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single page fetch failed (recoverable at the run level)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Rerank backend errors
    #[error("Rerank error: {0}")]
    Rerank(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Generation backend errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
