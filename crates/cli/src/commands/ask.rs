//! Ask command handler.
//!
//! Runs the full pipeline over the compiled-in page list and prints the
//! generated answer.

use clap::Args;
use linkrag_core::{config::AppConfig, AppError, AppResult};

use crate::pipeline::{Pipeline, DEFAULT_QUERY, SOURCE_URLS};

/// Answer a question from the configured pages
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer (defaults to the demonstration query)
    pub query: Option<String>,

    /// How many ranked chunks reach the prompt
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Maximum tokens in the generated answer
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Temperature for answer generation (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output as JSON (answer, model, sources, usage)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }

        let query = self
            .query
            .clone()
            .unwrap_or_else(|| DEFAULT_QUERY.to_string());

        tracing::info!("Answering query: {}", query);

        let mut pipeline = Pipeline::from_config(&config)?;
        if let Some(temperature) = self.temperature {
            pipeline = pipeline.with_temperature(temperature);
        }

        let urls: Vec<String> = SOURCE_URLS.iter().map(|url| url.to_string()).collect();
        let answer = pipeline.run(&urls, &query).await?;

        if self.json {
            let output = serde_json::json!({
                "answer": answer.text,
                "model": answer.model,
                "sources": answer.sources,
                "usage": {
                    "promptTokens": answer.usage.prompt_tokens,
                    "completionTokens": answer.usage.completion_tokens,
                    "totalTokens": answer.usage.total_tokens
                }
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", answer.text);

            tracing::debug!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                answer.usage.prompt_tokens,
                answer.usage.completion_tokens,
                answer.usage.total_tokens
            );
        }

        Ok(())
    }
}
