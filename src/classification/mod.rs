//! Zero-shot document classification.
//!
//! A [`ClassificationClient`] answers "which of these labels fits this text best". Three
//! backends exist: the Hugging Face zero-shot pipeline, a prompt-driven Ollama model, and a
//! deterministic keyword scorer that needs neither network nor model weights. The
//! [`ClassificationAgent`] pins the label set once at startup and maps answers back onto
//! [`Category`](crate::category::Category).

mod agent;
mod huggingface;
mod keyword;
mod ollama;

pub use agent::{ClassificationAgent, ClassificationError};
pub use huggingface::HuggingFaceClassificationClient;
pub use keyword::KeywordClassificationClient;
pub use ollama::OllamaClassificationClient;

use crate::config::{
    Config, DEFAULT_HF_CLASSIFIER_MODEL, DEFAULT_OLLAMA_MODEL, InferenceProvider,
};
use crate::inference::{DEFAULT_HUGGINGFACE_URL, DEFAULT_OLLAMA_URL, HuggingFaceEndpoint};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by classification backends.
#[derive(Debug, Error)]
pub enum ClassificationClientError {
    /// Backend could not be reached.
    #[error("Classification provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Backend answered with an error status.
    #[error("Failed to classify document: {0}")]
    ClassificationFailed(String),
    /// Backend answer could not be interpreted.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Input for a single zero-shot classification call.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    /// Document text to classify.
    pub text: String,
    /// Candidate labels; the answer must be one of them.
    pub labels: Vec<String>,
}

/// Interface implemented by zero-shot classification backends.
#[async_trait]
pub trait ClassificationClient: Send + Sync {
    /// Return the candidate label the backend scores highest for the text.
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<String, ClassificationClientError>;
}

/// Build the classification backend selected by configuration.
pub fn get_classification_client(config: &Config) -> Box<dyn ClassificationClient> {
    match config.classifier_provider {
        InferenceProvider::Local => Box::new(KeywordClassificationClient::new()),
        InferenceProvider::Ollama => Box::new(OllamaClassificationClient::new(
            config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            config
                .classifier_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        )),
        InferenceProvider::HuggingFace => {
            Box::new(HuggingFaceClassificationClient::new(HuggingFaceEndpoint {
                base_url: config
                    .huggingface_api_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string()),
                model: config
                    .classifier_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HF_CLASSIFIER_MODEL.to_string()),
                api_token: config.huggingface_api_token.clone(),
            }))
        }
    }
}
