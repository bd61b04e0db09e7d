//! Generation backend for the linkrag pipeline.
//!
//! This crate provides a provider-agnostic abstraction for the final
//! pipeline stage: sending the assembled prompt to a Large Language Model
//! and returning the generated answer.
//!
//! # Providers
//! - **OpenAI-compatible**: any chat-completions endpoint (the demo targets
//!   Groq's)
//!
//! # Example
//! ```no_run
//! use linkrag_llm::{LlmClient, LlmRequest, providers::OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("https://api.groq.com/openai/v1", "api-key");
//! let request = LlmRequest::new("Answer: what is RAG?", "llama3-70b-8192");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use providers::OpenAiClient;
