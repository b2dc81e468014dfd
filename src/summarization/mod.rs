//! Abstractive summarization of document text.
//!
//! [`SummarizationClient`] implementations issue exactly one inference call per document: the
//! Hugging Face summarization pipeline, an Ollama model driven by a word-budget prompt, or a
//! deterministic extractive fallback. The [`SummarizerAgent`] owns the input truncation and the
//! length bounds so every backend sees the same contract.

mod agent;
mod extractive;
mod huggingface;

pub use agent::{
    SUMMARY_INPUT_CHAR_LIMIT, SUMMARY_MAX_LENGTH, SUMMARY_MIN_LENGTH, SummarizerAgent,
    truncate_chars,
};
pub use extractive::ExtractiveSummarizationClient;
pub use huggingface::HuggingFaceSummarizationClient;

use crate::config::{Config, DEFAULT_HF_SUMMARIZER_MODEL, DEFAULT_OLLAMA_MODEL, InferenceProvider};
use crate::inference::{
    DEFAULT_HUGGINGFACE_URL, DEFAULT_OLLAMA_URL, HuggingFaceEndpoint, OllamaFailure, http_client,
    ollama_generate,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was unreachable.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Text to summarize, already truncated by the agent.
    pub text: String,
    /// Lower bound on summary length, in model output units.
    pub min_length: usize,
    /// Upper bound on summary length, in model output units.
    pub max_length: usize,
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary of `request.text` within the requested bounds.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization backend selected by configuration.
pub fn get_summarization_client(config: &Config) -> Box<dyn SummarizationClient> {
    match config.summarizer_provider {
        InferenceProvider::Local => Box::new(ExtractiveSummarizationClient),
        InferenceProvider::Ollama => Box::new(OllamaSummarizationClient::new(
            config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            config
                .summarizer_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        )),
        InferenceProvider::HuggingFace => {
            Box::new(HuggingFaceSummarizationClient::new(HuggingFaceEndpoint {
                base_url: config
                    .huggingface_api_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string()),
                model: config
                    .summarizer_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HF_SUMMARIZER_MODEL.to_string()),
                api_token: config.huggingface_api_token.clone(),
            }))
        }
    }
}

/// Summarizes with a local Ollama model; `num_predict` caps the output at `max_length` tokens.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaSummarizationClient {
    /// Construct a client for `model` served at `base_url`.
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: http_client("docsort/summary"),
            base_url,
            model,
        }
    }
}

fn build_prompt(request: &SummarizationRequest) -> String {
    format!(
        "System: You summarize business documents into concise, factual prose. Avoid speculation. \
         Use between {} and {} words. Output a single paragraph.\n\nDocument:\n{}\n",
        request.min_length,
        request.max_length,
        request.text.trim()
    )
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(&request),
            "stream": false,
            "options": {
                // Lower temperature for deterministic summaries.
                "temperature": 0.1,
                "num_predict": request.max_length,
            }
        });

        ollama_generate(&self.http, &self.base_url, &payload)
            .await
            .map_err(|failure| match failure {
                OllamaFailure::Unavailable(message) => {
                    SummarizationClientError::ProviderUnavailable(message)
                }
                OllamaFailure::Failed(message) => {
                    SummarizationClientError::GenerationFailed(message)
                }
                OllamaFailure::Malformed(message) => {
                    SummarizationClientError::InvalidResponse(message)
                }
            })
    }
}
