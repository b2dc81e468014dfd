//! Core data types and error definitions for the document pipeline.

use crate::category::Category;
use crate::classification::ClassificationError;
use crate::extract::ExtractionError;
use crate::organize::OrganizeError;
use crate::summarization::SummarizationClientError;
use std::path::PathBuf;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Errors emitted by the document pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The upload could not be written to the incoming folder.
    #[error("Failed to save upload to {path}: {source}")]
    Save {
        /// Intended scratch location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The PDF could not be parsed.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The classifier failed or answered outside the category set.
    #[error("Failed to classify document: {0}")]
    Classification(#[from] ClassificationError),
    /// The summarizer failed.
    #[error("Failed to summarize document: {0}")]
    Summarization(#[from] SummarizationClientError),
    /// The file could not be moved into its category folder.
    #[error("Failed to file document: {0}")]
    Organize(#[from] OrganizeError),
    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result of one successful upload.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    /// Sanitized file name the document was stored under.
    pub filename: String,
    /// Category the document was filed under.
    pub category: Category,
    /// Short summary of the document's opening text.
    pub summary: String,
    /// Final location, `<classified>/<category>/<filename>`.
    pub stored_path: PathBuf,
    /// Characters of text extracted from the PDF.
    pub extracted_chars: usize,
    /// Hex SHA-256 of the uploaded bytes.
    pub sha256: String,
    /// RFC 3339 timestamp taken when the document was filed.
    pub processed_at: String,
}

/// Current UTC time formatted as RFC 3339.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
