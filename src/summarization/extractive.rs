use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use async_trait::async_trait;

/// Deterministic extractive summarizer: leading sentences within a word budget.
///
/// `max_length` is read as a word budget. `min_length` is best effort; a short document yields a
/// short summary.
pub struct ExtractiveSummarizationClient;

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Build a summary from whole leading sentences, never exceeding `max_words`.
pub(crate) fn build_extractive_summary(text: &str, max_words: usize) -> String {
    let mut picked: Vec<String> = Vec::new();
    let mut used_words = 0usize;

    for sentence in sentences(text) {
        let sentence = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
        let words = count_words(&sentence);
        if used_words + words > max_words {
            if picked.is_empty() {
                // The opening sentence alone is over budget; keep its first words.
                picked.push(
                    sentence
                        .split_whitespace()
                        .take(max_words)
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }
            break;
        }
        used_words += words;
        picked.push(sentence);
    }

    picked.join(" ")
}

#[async_trait]
impl SummarizationClient for ExtractiveSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        Ok(build_extractive_summary(&request.text, request.max_length))
    }
}
