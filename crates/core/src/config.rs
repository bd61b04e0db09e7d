//! Configuration management for the linkrag CLI.
//!
//! Configuration is merged from three layers, highest precedence first:
//! - Command-line flags
//! - Environment variables
//! - An optional YAML config file
//!
//! Credentials are read once from the environment at startup and treated as
//! read-only for the run's duration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default generation endpoint (OpenAI-compatible).
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Default rerank model.
pub const DEFAULT_RERANK_MODEL: &str = "rerank-english-v3.0";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation model identifier
    pub model: String,

    /// Base URL of the OpenAI-compatible generation endpoint
    pub api_base: String,

    /// Maximum tokens for the generated answer
    pub max_tokens: u32,

    /// Credential for the generation backend (GROQ_API_KEY)
    #[serde(skip)]
    pub generator_api_key: Option<String>,

    /// Credential for the rerank backend (COHERE_API_KEY)
    #[serde(skip)]
    pub reranker_api_key: Option<String>,

    /// Rerank model identifier
    pub rerank_model: String,

    /// How many ranked chunks reach the prompt
    pub top_k: usize,

    /// Sentences per chunk for the splitter
    pub split_length: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// On-disk configuration file structure (camelCase keys).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    generation: Option<GenerationConfig>,
    rerank: Option<RerankConfig>,
    split: Option<SplitConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerationConfig {
    model: Option<String>,
    #[serde(rename = "apiBase")]
    api_base: Option<String>,
    #[serde(rename = "maxTokens")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RerankConfig {
    model: Option<String>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SplitConfig {
    sentences: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tokens: 512,
            generator_api_key: None,
            reranker_api_key: None,
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            top_k: 10,
            split_length: 10,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `LINKRAG_CONFIG`: Path to a YAML config file
    /// - `LINKRAG_MODEL`: Generation model identifier
    /// - `LINKRAG_API_BASE`: Generation endpoint base URL
    /// - `LINKRAG_RERANK_MODEL`: Rerank model identifier
    /// - `GROQ_API_KEY`: Generation credential
    /// - `COHERE_API_KEY`: Rerank credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("LINKRAG_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if one was named
        if let Some(path) = config.config_file.clone() {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
            tracing::debug!("Merged config file {:?}", path);
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("LINKRAG_MODEL") {
            config.model = model;
        }

        if let Ok(api_base) = std::env::var("LINKRAG_API_BASE") {
            config.api_base = api_base;
        }

        if let Ok(rerank_model) = std::env::var("LINKRAG_RERANK_MODEL") {
            config.rerank_model = rerank_model;
        }

        config.generator_api_key = std::env::var("GROQ_API_KEY").ok();
        config.reranker_api_key = std::env::var("COHERE_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(generation) = config_file.generation {
            if let Some(model) = generation.model {
                result.model = model;
            }
            if let Some(api_base) = generation.api_base {
                result.api_base = api_base;
            }
            if let Some(max_tokens) = generation.max_tokens {
                result.max_tokens = max_tokens;
            }
        }

        if let Some(rerank) = config_file.rerank {
            if let Some(model) = rerank.model {
                result.rerank_model = model;
            }
            if let Some(top_k) = rerank.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(split) = config_file.split {
            if let Some(sentences) = split.sentences {
                result.split_length = sentences;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config
    /// file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        model: Option<String>,
        api_base: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the rerank credential, failing before any network call.
    pub fn require_reranker_key(&self) -> AppResult<&str> {
        self.reranker_api_key.as_deref().ok_or_else(|| {
            AppError::Config(
                "COHERE_API_KEY is not set; the rerank stage requires it".to_string(),
            )
        })
    }

    /// Resolve the generation credential, failing before any network call.
    pub fn require_generator_key(&self) -> AppResult<&str> {
        self.generator_api_key.as_deref().ok_or_else(|| {
            AppError::Config(
                "GROQ_API_KEY is not set; the generation stage requires it".to_string(),
            )
        })
    }

    /// Validate the split length.
    ///
    /// Zero sentences per chunk would produce no chunks from non-empty
    /// documents, so it is rejected as a configuration error.
    pub fn validate(&self) -> AppResult<()> {
        if self.split_length == 0 {
            return Err(AppError::Config(
                "split length must be at least 1 sentence".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(AppError::Config(
                "topK must be at least 1 chunk".to_string(),
            ));
        }

        Ok(())
    }
}
