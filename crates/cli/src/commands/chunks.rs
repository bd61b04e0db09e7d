//! Chunks command handler.
//!
//! Runs the retrieval stages only (fetch, convert, split, rerank) and
//! prints the ranked chunks. Useful for inspecting what context a query
//! would receive without spending generation tokens.

use clap::Args;
use linkrag_core::{config::AppConfig, AppError, AppResult};

use crate::pipeline::{Retriever, DEFAULT_QUERY, SOURCE_URLS};

/// Maximum characters of chunk text shown per line.
const SNIPPET_CHARS: usize = 160;

/// Show the ranked chunks for a query without generating an answer
#[derive(Args, Debug)]
pub struct ChunksCommand {
    /// The query to rank against (defaults to the demonstration query)
    pub query: Option<String>,

    /// How many ranked chunks to show
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Output as JSON (score, url, content per chunk)
    #[arg(long)]
    pub json: bool,
}

impl ChunksCommand {
    /// Execute the chunks command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }

        let query = self
            .query
            .clone()
            .unwrap_or_else(|| DEFAULT_QUERY.to_string());

        tracing::info!("Ranking chunks for query: {}", query);

        let retriever = Retriever::from_config(&config)?;
        let urls: Vec<String> = SOURCE_URLS.iter().map(|url| url.to_string()).collect();
        let ranked = retriever.retrieve(&urls, &query).await?;

        if self.json {
            let output: Vec<serde_json::Value> = ranked
                .iter()
                .map(|scored| {
                    serde_json::json!({
                        "score": scored.score,
                        "url": scored.chunk.url(),
                        "content": scored.chunk.content
                    })
                })
                .collect();

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else if ranked.is_empty() {
            println!("No chunks retrieved.");
        } else {
            for (i, scored) in ranked.iter().enumerate() {
                println!(
                    "{:>2}. [{:.3}] {}",
                    i + 1,
                    scored.score,
                    scored.chunk.url().unwrap_or("(no url)")
                );
                println!("    {}", snippet(&scored.chunk.content));
            }
        }

        Ok(())
    }
}

/// First line of a chunk, truncated on a character boundary.
fn snippet(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut out: String = first_line.chars().take(SNIPPET_CHARS).collect();
    if first_line.chars().count() > SNIPPET_CHARS {
        out.push_str("...");
    }
    out
}
