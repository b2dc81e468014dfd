use super::{ClassificationClient, ClassificationClientError, ClassificationRequest};
use crate::inference::{OllamaFailure, http_client, ollama_generate};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Prompt-driven zero-shot classification against a local Ollama model.
pub struct OllamaClassificationClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClassificationClient {
    /// Construct a client for `model` served at `base_url`.
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: http_client("docsort/classify"),
            base_url,
            model,
        }
    }
}

fn build_prompt(text: &str, labels: &[String]) -> String {
    format!(
        "Classify the document below into exactly one of these categories: {}.\n\
         Answer with the category name only.\n\nDocument:\n{}\n",
        labels.join(", "),
        text.trim()
    )
}

fn normalize(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

/// Map a free-form model reply back onto one of the candidate labels.
///
/// An exact (case-insensitive) answer wins; otherwise the label mentioned earliest in the reply.
fn match_label<'a>(reply: &str, labels: &'a [String]) -> Option<&'a String> {
    let cleaned = reply.trim().trim_matches(|c: char| !c.is_alphanumeric());
    if let Some(label) = labels
        .iter()
        .find(|label| label.eq_ignore_ascii_case(cleaned))
    {
        return Some(label);
    }

    let haystack = normalize(reply);
    labels
        .iter()
        .filter_map(|label| {
            let needle = normalize(label);
            if needle.trim().is_empty() {
                return None;
            }
            haystack.find(&needle).map(|position| (position, label))
        })
        .min_by_key(|(position, _)| *position)
        .map(|(_, label)| label)
}

#[async_trait]
impl ClassificationClient for OllamaClassificationClient {
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<String, ClassificationClientError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(&request.text, &request.labels),
            "stream": false,
            "options": { "temperature": 0.0 }
        });

        let reply = ollama_generate(&self.http, &self.base_url, &payload)
            .await
            .map_err(|failure| match failure {
                OllamaFailure::Unavailable(message) => {
                    ClassificationClientError::ProviderUnavailable(message)
                }
                OllamaFailure::Failed(message) => {
                    ClassificationClientError::ClassificationFailed(message)
                }
                OllamaFailure::Malformed(message) => {
                    ClassificationClientError::InvalidResponse(message)
                }
            })?;

        match_label(&reply, &request.labels).cloned().ok_or_else(|| {
            ClassificationClientError::InvalidResponse(format!(
                "reply '{reply}' names none of the candidate labels"
            ))
        })
    }
}
