use super::{ClassificationClient, ClassificationClientError, ClassificationRequest};
use crate::inference::{HuggingFaceEndpoint, http_client};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Zero-shot classification through the Hugging Face Inference API.
pub struct HuggingFaceClassificationClient {
    http: Client,
    endpoint: HuggingFaceEndpoint,
}

impl HuggingFaceClassificationClient {
    /// Construct a client for the given inference endpoint.
    pub fn new(endpoint: HuggingFaceEndpoint) -> Self {
        Self {
            http: http_client("docsort/classify"),
            endpoint,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The API has answered both as the pipeline's own dict and as a ranked list of pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Pipeline { labels: Vec<String>, scores: Vec<f64> },
    Ranked(Vec<LabelScore>),
}

impl ZeroShotResponse {
    fn top_label(self) -> Option<String> {
        let pairs: Vec<(String, f64)> = match self {
            Self::Pipeline { labels, scores } => labels.into_iter().zip(scores).collect(),
            Self::Ranked(items) => items
                .into_iter()
                .map(|item| (item.label, item.score))
                .collect(),
        };
        pairs
            .into_iter()
            .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
            .map(|(label, _)| label)
    }
}

#[async_trait]
impl ClassificationClient for HuggingFaceClassificationClient {
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<String, ClassificationClientError> {
        let payload = json!({
            "inputs": request.text,
            "parameters": { "candidate_labels": request.labels },
        });

        let response = self
            .endpoint
            .authorize(self.http.post(self.endpoint.url()))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ClassificationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.endpoint.url()
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClassificationClientError::ProviderUnavailable(format!(
                "model {} not found",
                self.endpoint.model
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationClientError::ClassificationFailed(format!(
                "Hugging Face returned {status}: {body}"
            )));
        }

        let body: ZeroShotResponse = response.json().await.map_err(|error| {
            ClassificationClientError::InvalidResponse(format!(
                "failed to decode zero-shot response: {error}"
            ))
        })?;

        body.top_label().ok_or_else(|| {
            ClassificationClientError::InvalidResponse("zero-shot response had no labels".into())
        })
    }
}
