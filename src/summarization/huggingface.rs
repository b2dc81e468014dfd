use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use crate::inference::{HuggingFaceEndpoint, http_client};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Summarization through the Hugging Face Inference API (greedy decoding).
pub struct HuggingFaceSummarizationClient {
    http: Client,
    endpoint: HuggingFaceEndpoint,
}

impl HuggingFaceSummarizationClient {
    /// Construct a client for the given inference endpoint.
    pub fn new(endpoint: HuggingFaceEndpoint) -> Self {
        Self {
            http: http_client("docsort/summary"),
            endpoint,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryResponse {
    Batch(Vec<SummaryItem>),
    Single(SummaryItem),
}

#[async_trait]
impl SummarizationClient for HuggingFaceSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "min_length": request.min_length,
                "max_length": request.max_length,
                "do_sample": false,
            }
        });

        let response = self
            .endpoint
            .authorize(self.http.post(self.endpoint.url()))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.endpoint.url()
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "model {} not found",
                self.endpoint.model
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Hugging Face returned {status}: {body}"
            )));
        }

        let body: SummaryResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode summarization response: {error}"
            ))
        })?;

        let item = match body {
            SummaryResponse::Batch(items) => items.into_iter().next(),
            SummaryResponse::Single(item) => Some(item),
        };
        item.map(|item| item.summary_text.trim().to_string())
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse("empty summarization response".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn client(server: &MockServer) -> HuggingFaceSummarizationClient {
        HuggingFaceSummarizationClient::new(HuggingFaceEndpoint {
            base_url: server.base_url(),
            model: "sshleifer/distilbart-cnn-12-6".into(),
            api_token: None,
        })
    }

    fn request() -> SummarizationRequest {
        SummarizationRequest {
            text: "The committee approved the budget.".into(),
            min_length: 40,
            max_length: 150,
        }
    }

    #[tokio::test]
    async fn sends_bounds_and_reads_first_summary() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/sshleifer/distilbart-cnn-12-6")
                    .json_body(json!({
                        "inputs": "The committee approved the budget.",
                        "parameters": { "min_length": 40, "max_length": 150, "do_sample": false }
                    }));
                then.status(200)
                    .json_body(json!([{ "summary_text": " Budget approved. " }]));
            })
            .await;

        let summary = client(&server)
            .generate_summary(request())
            .await
            .expect("summary");

        mock.assert();
        assert_eq!(summary, "Budget approved.");
    }

    #[tokio::test]
    async fn empty_batch_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!([]));
            })
            .await;

        let error = client(&server)
            .generate_summary(request())
            .await
            .expect_err("empty");
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn missing_model_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(404);
            })
            .await;

        let error = client(&server)
            .generate_summary(request())
            .await
            .expect_err("404");
        assert!(matches!(error, SummarizationClientError::ProviderUnavailable(_)));
    }
}
