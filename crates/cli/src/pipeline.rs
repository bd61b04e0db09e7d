//! Pipeline composition root.
//!
//! Wires the five stages (fetch, convert, split, rerank, prompt + generate)
//! in fixed order and supplies the run-time inputs (URL list, query) to the
//! stages that need them. The flow is strictly linear: the output of each
//! stage is the sole input of the next.

use std::collections::HashSet;
use std::sync::Arc;

use linkrag_core::{AppConfig, AppResult};
use linkrag_llm::{LlmClient, LlmRequest, LlmUsage, OpenAiClient};
use linkrag_prompt::{ContextDocument, PromptBuilder, DEFAULT_TEMPLATE};
use linkrag_retrieval::{
    CohereReranker, HtmlConverter, LinkFetcher, Reranker, ScoredChunk, SentenceSplitter,
};

/// The pages this demonstration answers from.
///
/// Compiled into the composition; the query is the only free input.
pub const SOURCE_URLS: [&str; 4] = [
    "https://haystack.deepset.ai/blog/extracting-metadata-filter",
    "https://haystack.deepset.ai/blog/query-expansion",
    "https://haystack.deepset.ai/blog/query-decomposition",
    "https://haystack.deepset.ai/cookbook/metadata_enrichment",
];

/// Query used when the caller does not supply one.
pub const DEFAULT_QUERY: &str =
    "Which methods can I use to transform query for better retrieval?";

/// A generated answer with the sources that backed it.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Generated text
    pub text: String,

    /// Model that produced the text
    pub model: String,

    /// Deduplicated source URLs supplied as context, in rank order
    pub sources: Vec<String>,

    /// Token usage reported by the backend
    pub usage: LlmUsage,
}

/// Stages 1-4: fetch, convert, split, rerank.
pub struct Retriever {
    fetcher: LinkFetcher,
    converter: HtmlConverter,
    splitter: SentenceSplitter,
    reranker: Arc<dyn Reranker>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        fetcher: LinkFetcher,
        converter: HtmlConverter,
        splitter: SentenceSplitter,
        reranker: Arc<dyn Reranker>,
        top_k: usize,
    ) -> Self {
        Self {
            fetcher,
            converter,
            splitter,
            reranker,
            top_k,
        }
    }

    /// Build the retrieval stages from configuration.
    ///
    /// Fails before any network call when the rerank credential is missing.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        let reranker_key = config.require_reranker_key()?;

        Ok(Self::new(
            LinkFetcher::new(),
            HtmlConverter::new(),
            SentenceSplitter::new(config.split_length)?,
            Arc::new(CohereReranker::new(reranker_key, &config.rerank_model)),
            config.top_k,
        ))
    }

    /// Run stages 1-4 and return the top-K ranked chunks.
    pub async fn retrieve(&self, urls: &[String], query: &str) -> AppResult<Vec<ScoredChunk>> {
        let resources = self.fetcher.fetch(urls).await;
        let documents = self.converter.convert_all(&resources);
        let chunks = self.splitter.split_all(&documents);
        let mut ranked = self.reranker.rerank(query, chunks).await?;
        ranked.truncate(self.top_k);
        Ok(ranked)
    }
}

/// The full five-stage pipeline.
pub struct Pipeline {
    retriever: Retriever,
    prompt_builder: PromptBuilder,
    generator: Arc<dyn LlmClient>,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl Pipeline {
    pub fn new(
        retriever: Retriever,
        prompt_builder: PromptBuilder,
        generator: Arc<dyn LlmClient>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            retriever,
            prompt_builder,
            generator,
            model: model.into(),
            max_tokens,
            temperature: None,
        }
    }

    /// Build the full pipeline from configuration.
    ///
    /// Fails before any network call when either credential is missing.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let retriever = Retriever::from_config(config)?;
        let generator_key = config.require_generator_key()?;

        Ok(Self::new(
            retriever,
            PromptBuilder::new(DEFAULT_TEMPLATE)?,
            Arc::new(OpenAiClient::new(&config.api_base, generator_key)),
            &config.model,
            config.max_tokens,
        ))
    }

    /// Set the sampling temperature for generation.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Run the full pipeline: URLs and query in, sourced answer out.
    ///
    /// An empty ranked set still reaches the generator: the prompt renders
    /// with an empty context block and the template instructs the model to
    /// say when no relevant information is available.
    pub async fn run(&self, urls: &[String], query: &str) -> AppResult<Answer> {
        let ranked = self.retriever.retrieve(urls, query).await?;

        let documents: Vec<ContextDocument> = ranked
            .iter()
            .map(|scored| {
                ContextDocument::new(
                    scored.chunk.content.clone(),
                    scored.chunk.url().unwrap_or_default(),
                )
            })
            .collect();

        let prompt = self.prompt_builder.render(&documents, query)?;

        let mut request = LlmRequest::new(prompt, &self.model).with_max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.generator.complete(&request).await?;

        Ok(Answer {
            text: response.content,
            model: response.model,
            sources: source_urls(&ranked),
            usage: response.usage,
        })
    }
}

/// Deduplicated source URLs of the ranked chunks, in rank order.
fn source_urls(ranked: &[ScoredChunk]) -> Vec<String> {
    let mut seen = HashSet::new();
    ranked
        .iter()
        .filter_map(|scored| scored.chunk.url())
        .filter(|url| seen.insert(url.to_string()))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use linkrag_core::AppError;
    use linkrag_llm::LlmResponse;
    use linkrag_retrieval::Chunk;
    use std::sync::Mutex;

    /// Scores chunks by how many query terms they contain. Deterministic:
    /// stable sort on descending score keeps input order for ties.
    struct KeywordReranker;

    #[async_trait::async_trait]
    impl Reranker for KeywordReranker {
        async fn rerank(&self, query: &str, chunks: Vec<Chunk>) -> AppResult<Vec<ScoredChunk>> {
            let terms: Vec<String> = query
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect();

            let mut scored: Vec<ScoredChunk> = chunks
                .into_iter()
                .map(|chunk| {
                    let content = chunk.content.to_lowercase();
                    let score = terms.iter().filter(|t| content.contains(t.as_str())).count() as f32;
                    ScoredChunk { chunk, score }
                })
                .collect();

            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
            Ok(scored)
        }
    }

    /// Records every prompt it receives and replies with a fixed string.
    struct CapturingClient {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    impl CapturingClient {
        fn new(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for CapturingClient {
        fn provider_name(&self) -> &str {
            "capturing"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            Ok(LlmResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    fn test_pipeline(generator: Arc<CapturingClient>, top_k: usize) -> Pipeline {
        let retriever = Retriever::new(
            LinkFetcher::new(),
            HtmlConverter::new(),
            SentenceSplitter::new(2).unwrap(),
            Arc::new(KeywordReranker),
            top_k,
        );

        Pipeline::new(
            retriever,
            PromptBuilder::new(DEFAULT_TEMPLATE).unwrap(),
            generator,
            "test-model",
            512,
        )
    }

    #[tokio::test]
    async fn test_empty_url_list_reaches_generator_with_empty_context() {
        let generator = Arc::new(CapturingClient::new("No relevant information found."));
        let pipeline = test_pipeline(generator.clone(), 10);

        let answer = pipeline.run(&[], "What is preprocessing?").await.unwrap();

        // The generator was still invoked, with no context documents
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].contains("URL:"));
        assert!(prompts[0].contains("Question: What is preprocessing?"));

        assert_eq!(answer.text, "No relevant information found.");
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn test_relevant_page_ranks_first_and_sources_are_supplied_urls() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/expansion");
                then.status(200).body(
                    "<html><body><p>Query expansion rewrites the query to improve \
                     retrieval recall. It generates similar queries.</p></body></html>",
                );
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cooking");
                then.status(200).body(
                    "<html><body><p>Preheat the oven. Stir the sauce gently.</p></body></html>",
                );
            })
            .await;

        let generator = Arc::new(CapturingClient::new("Use query expansion."));
        let pipeline = test_pipeline(generator.clone(), 10);
        let urls = vec![server.url("/cooking"), server.url("/expansion")];

        let answer = pipeline
            .run(&urls, "How can I improve retrieval with query expansion?")
            .await
            .unwrap();

        // Every cited source was one of the supplied URLs
        assert!(!answer.sources.is_empty());
        for source in &answer.sources {
            assert!(urls.contains(source));
        }

        // The relevant page ranks first in the prompt context
        let prompts = generator.prompts();
        let expansion_pos = prompts[0].find("/expansion").unwrap();
        let cooking_pos = prompts[0].find("/cooking").unwrap_or(usize::MAX);
        assert!(expansion_pos < cooking_pos);
    }

    #[tokio::test]
    async fn test_top_k_bounds_the_context() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/long");
                then.status(200).body(
                    "<html><body><p>One. Two. Three. Four. Five. Six. Seven. Eight. \
                     Nine. Ten.</p></body></html>",
                );
            })
            .await;

        let generator = Arc::new(CapturingClient::new("ok"));
        let pipeline = test_pipeline(generator.clone(), 2);
        let urls = vec![server.url("/long")];

        pipeline.run(&urls, "numbers").await.unwrap();

        // 10 sentences at 2 per chunk is 5 chunks; top_k = 2 keeps two
        let prompts = generator.prompts();
        assert_eq!(prompts[0].matches("URL:").count(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_reduces_context_but_run_succeeds() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/alive");
                then.status(200)
                    .body("<html><body><p>Retrieval survives partial failure.</p></body></html>");
            })
            .await;

        let generator = Arc::new(CapturingClient::new("ok"));
        let pipeline = test_pipeline(generator.clone(), 10);
        let urls = vec![server.url("/gone"), server.url("/alive")];

        let answer = pipeline.run(&urls, "retrieval failure").await.unwrap();

        assert_eq!(answer.sources, vec![server.url("/alive")]);
    }

    #[test]
    fn test_missing_credentials_fail_before_any_network_call() {
        let config = AppConfig::default();
        assert!(matches!(
            Pipeline::from_config(&config),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Retriever::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_source_urls_deduplicate_in_rank_order() {
        let chunk = |url: &str| Chunk {
            content: "text".to_string(),
            position: 0,
            meta: serde_json::json!({ "url": url }),
        };
        let ranked = vec![
            ScoredChunk {
                chunk: chunk("https://example.org/b"),
                score: 0.9,
            },
            ScoredChunk {
                chunk: chunk("https://example.org/a"),
                score: 0.5,
            },
            ScoredChunk {
                chunk: chunk("https://example.org/b"),
                score: 0.1,
            },
        ];

        assert_eq!(
            source_urls(&ranked),
            vec!["https://example.org/b", "https://example.org/a"]
        );
    }

    #[test]
    fn test_compiled_in_sources_are_four_pages() {
        assert_eq!(SOURCE_URLS.len(), 4);
        assert!(SOURCE_URLS.iter().all(|u| u.starts_with("https://")));
    }
}
