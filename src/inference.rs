//! Shared plumbing for the HTTP-backed inference clients.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// Ollama address used when `OLLAMA_URL` is unset.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Hugging Face inference endpoint used when `HUGGINGFACE_API_URL` is unset.
pub const DEFAULT_HUGGINGFACE_URL: &str = "https://router.huggingface.co/hf-inference";

/// Construct a `reqwest` client tagged with the given user agent.
pub(crate) fn http_client(user_agent: &str) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .expect("Failed to construct reqwest::Client for inference")
}

/// Connection details for the Hugging Face Inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceEndpoint {
    /// Base URL without the trailing `/models/...` segment.
    pub base_url: String,
    /// Repository id of the model, e.g. `sshleifer/distilbart-cnn-12-6`.
    pub model: String,
    /// Optional bearer token.
    pub api_token: Option<String>,
}

impl HuggingFaceEndpoint {
    /// URL that runs the pipeline for `model`.
    pub fn url(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model.trim_matches('/')
        )
    }

    /// Attach authentication and cold-start headers to a request.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("x-wait-for-model", "true");
        match self.api_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Endpoint of the Ollama text generation API under `base_url`.
pub(crate) fn ollama_generate_url(base_url: &str) -> String {
    format!("{}/api/generate", base_url.trim_end_matches('/'))
}

/// Ways a non-streaming Ollama generation can fail; callers map these onto their own errors.
#[derive(Debug)]
pub(crate) enum OllamaFailure {
    Unavailable(String),
    Failed(String),
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

/// Run one non-streaming `/api/generate` call and return the trimmed completion.
pub(crate) async fn ollama_generate(
    http: &Client,
    base_url: &str,
    payload: &Value,
) -> Result<String, OllamaFailure> {
    let endpoint = ollama_generate_url(base_url);
    let response = http
        .post(&endpoint)
        .json(payload)
        .send()
        .await
        .map_err(|error| {
            OllamaFailure::Unavailable(format!("failed to reach Ollama at {base_url}: {error}"))
        })?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(OllamaFailure::Unavailable(format!(
            "Ollama endpoint {endpoint} returned 404"
        )));
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(OllamaFailure::Failed(format!(
            "Ollama returned {status}: {body}"
        )));
    }

    let body: OllamaResponse = response.json().await.map_err(|error| {
        OllamaFailure::Malformed(format!("failed to decode Ollama response: {error}"))
    })?;

    if !body.done {
        return Err(OllamaFailure::Malformed(
            "Ollama response incomplete (streaming not supported)".into(),
        ));
    }

    Ok(body.response.trim().to_string())
}
