use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};

/// Characters of document text handed to the summarizer; the rest is dropped.
pub const SUMMARY_INPUT_CHAR_LIMIT: usize = 1024;
/// Lower summary length bound passed to the backend.
pub const SUMMARY_MIN_LENGTH: usize = 40;
/// Upper summary length bound passed to the backend.
pub const SUMMARY_MAX_LENGTH: usize = 150;

/// Return the first `limit` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}

/// Produces one short summary per document through a shared backend.
pub struct SummarizerAgent {
    client: Box<dyn SummarizationClient>,
    min_length: usize,
    max_length: usize,
}

impl SummarizerAgent {
    /// Wrap `client` with the default 40/150 length bounds.
    pub fn new(client: Box<dyn SummarizationClient>) -> Self {
        Self::with_bounds(client, SUMMARY_MIN_LENGTH, SUMMARY_MAX_LENGTH)
    }

    /// Wrap `client` with explicit length bounds.
    pub fn with_bounds(
        client: Box<dyn SummarizationClient>,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            client,
            min_length: min_length.min(max_length),
            max_length,
        }
    }

    /// Summarize the first [`SUMMARY_INPUT_CHAR_LIMIT`] characters of `text`.
    ///
    /// Exactly one backend call is made. The reply is trimmed and capped at `max_length` words.
    pub async fn summarize(&self, text: &str) -> Result<String, SummarizationClientError> {
        let input = truncate_chars(text, SUMMARY_INPUT_CHAR_LIMIT);
        if input.len() < text.len() {
            tracing::debug!(
                original_chars = text.chars().count(),
                kept_chars = SUMMARY_INPUT_CHAR_LIMIT,
                "Truncated document text before summarization"
            );
        }

        let summary = self
            .client
            .generate_summary(SummarizationRequest {
                text: input.to_string(),
                min_length: self.min_length,
                max_length: self.max_length,
            })
            .await?;

        Ok(cap_words(summary.trim(), self.max_length))
    }
}

fn cap_words(text: &str, max_words: usize) -> String {
    if text.split_whitespace().count() <= max_words {
        return text.to_string();
    }
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
