use super::{ClassificationClient, ClassificationClientError, ClassificationRequest};
use crate::category::Category;
use thiserror::Error;

/// Errors raised by [`ClassificationAgent::classify`].
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// Backend call failed.
    #[error(transparent)]
    Client(#[from] ClassificationClientError),
    /// Backend answered with a label outside the configured set.
    #[error("Classifier returned unknown label '{0}'")]
    UnknownLabel(String),
}

/// Picks one category per document using a shared classification backend.
///
/// The label set is fixed at construction; every call performs exactly one backend request.
pub struct ClassificationAgent {
    client: Box<dyn ClassificationClient>,
    categories: Vec<Category>,
    labels: Vec<String>,
}

impl ClassificationAgent {
    /// Wrap `client`, offering it `categories` as candidate labels on every call.
    pub fn new(client: Box<dyn ClassificationClient>, categories: Vec<Category>) -> Self {
        let labels = categories
            .iter()
            .map(|category| category.label().to_string())
            .collect();
        Self {
            client,
            categories,
            labels,
        }
    }

    /// Categories this agent chooses between.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Classify `text` into the highest-scoring configured category.
    pub async fn classify(&self, text: &str) -> Result<Category, ClassificationError> {
        let label = self
            .client
            .classify(ClassificationRequest {
                text: text.to_string(),
                labels: self.labels.clone(),
            })
            .await?;

        self.categories
            .iter()
            .copied()
            .find(|category| category.label() == label)
            .ok_or(ClassificationError::UnknownLabel(label))
    }
}
