use super::{ClassificationClient, ClassificationClientError, ClassificationRequest};
use async_trait::async_trait;
use std::collections::HashMap;

const LEXICON: &[(&str, &[&str])] = &[
    (
        "finance",
        &[
            "invoice", "invoices", "payment", "payments", "budget", "revenue", "expense",
            "expenses", "tax", "accounting", "balance", "profit", "fiscal", "audit", "bank",
            "billing", "payable", "receivable", "financial", "amount", "due", "total", "cost",
        ],
    ),
    (
        "legal",
        &[
            "contract", "agreement", "clause", "liability", "law", "legal", "court", "compliance",
            "party", "parties", "indemnify", "jurisdiction", "attorney", "confidentiality",
            "litigation", "regulation", "warranty", "hereby", "terms",
        ],
    ),
    (
        "hr",
        &[
            "employee", "employees", "hiring", "recruitment", "onboarding", "payroll", "benefits",
            "leave", "vacation", "candidate", "interview", "salary", "resume", "personnel",
            "workplace", "staff", "hr",
        ],
    ),
    (
        "technical",
        &[
            "software", "system", "api", "architecture", "server", "database", "code",
            "deployment", "configuration", "algorithm", "protocol", "specification",
            "engineering", "network", "bug", "release", "infrastructure", "technical",
        ],
    ),
    (
        "marketing",
        &[
            "campaign", "brand", "marketing", "customer", "customers", "audience", "advertising",
            "social", "promotion", "seo", "market", "launch", "engagement", "leads", "sales",
        ],
    ),
    (
        "operations",
        &[
            "logistics", "supply", "inventory", "shipping", "warehouse", "procurement", "vendor",
            "schedule", "process", "operations", "operational", "facility", "maintenance",
            "workflow", "delivery", "production", "capacity",
        ],
    ),
];

/// Deterministic zero-shot stand-in that scores labels by keyword hits.
///
/// Each label scores one point per occurrence of the label itself or of a term from its
/// lexicon. Ties (including all-zero scores) go to the label offered first.
pub struct KeywordClassificationClient {
    lexicon: HashMap<&'static str, &'static [&'static str]>,
}

impl KeywordClassificationClient {
    /// Construct a scorer with the built-in business lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    fn score(&self, words: &HashMap<String, usize>, label: &str) -> usize {
        let label = label.to_lowercase();
        let own = words.get(&label).copied().unwrap_or(0);
        let related = self
            .lexicon
            .get(label.as_str())
            .map(|terms| {
                terms
                    .iter()
                    .filter(|term| **term != label)
                    .map(|term| words.get(*term).copied().unwrap_or(0))
                    .sum::<usize>()
            })
            .unwrap_or(0);
        own + related
    }
}

impl Default for KeywordClassificationClient {
    fn default() -> Self {
        Self::new()
    }
}

fn word_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

#[async_trait]
impl ClassificationClient for KeywordClassificationClient {
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<String, ClassificationClientError> {
        let words = word_counts(&request.text);
        let mut best: Option<(&String, usize)> = None;
        for label in &request.labels {
            let score = self.score(&words, label);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((label, score));
            }
        }

        let (label, score) = best.ok_or_else(|| {
            ClassificationClientError::ClassificationFailed("no candidate labels".into())
        })?;
        tracing::debug!(label = %label, score, "Keyword classifier picked label");
        Ok(label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Finance", "Legal", "HR", "Technical", "Marketing", "Operations"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    async fn classify(text: &str) -> String {
        KeywordClassificationClient::new()
            .classify(ClassificationRequest {
                text: text.into(),
                labels: labels(),
            })
            .await
            .expect("label")
    }

    #[tokio::test]
    async fn finance_text_scores_finance() {
        let text = "INVOICE #2041. Amount due: $4,200. Payment within 30 days to our bank account.";
        assert_eq!(classify(text).await, "Finance");
    }

    #[tokio::test]
    async fn hr_text_scores_hr() {
        let text = "New employee onboarding: payroll enrollment, benefits, and vacation leave.";
        assert_eq!(classify(text).await, "HR");
    }

    #[tokio::test]
    async fn technical_text_scores_technical() {
        let text = "The API server talks to the database; deployment configuration is below.";
        assert_eq!(classify(text).await, "Technical");
    }

    #[tokio::test]
    async fn ties_go_to_the_first_label() {
        assert_eq!(classify("lorem ipsum dolor").await, "Finance");
        assert_eq!(classify("").await, "Finance");
    }

    #[tokio::test]
    async fn unknown_labels_score_by_their_own_name() {
        let label = KeywordClassificationClient::new()
            .classify(ClassificationRequest {
                text: "Research notes on research methods".into(),
                labels: vec!["Finance".into(), "Research".into()],
            })
            .await
            .expect("label");
        assert_eq!(label, "Research");
    }

    #[tokio::test]
    async fn empty_label_set_is_an_error() {
        let error = KeywordClassificationClient::new()
            .classify(ClassificationRequest {
                text: "invoice".into(),
                labels: vec![],
            })
            .await
            .expect_err("no labels");
        assert!(matches!(error, ClassificationClientError::ClassificationFailed(_)));
    }
}
