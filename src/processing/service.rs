//! Processing service coordinating extraction, classification, summarization, and filing.

use crate::{
    category::Category,
    classification::{ClassificationAgent, get_classification_client},
    config::Config,
    extract::extract_text,
    metrics::{DocumentMetrics, MetricsSnapshot},
    organize::{OrganizationAgent, OrganizeError, create_dir},
    processing::types::{ProcessingError, ProcessingOutcome, current_timestamp_rfc3339},
    summarization::{SummarizerAgent, get_summarization_client},
    upload::{UploadedFile, allowed_file, secure_filename},
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;

/// Why an upload was turned away without running the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The form carried no file, or an empty file name.
    MissingFile,
    /// The file name does not end in an allowed extension.
    DisallowedExtension,
}

/// What happened to one upload.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The document was classified, summarized, and filed.
    Processed(ProcessingOutcome),
    /// The upload was ignored; nothing was written to disk.
    Rejected(RejectReason),
}

/// Runs the full pipeline for each upload using agents built once at startup.
///
/// The models behind the agents are loaded (or connected) once and shared read-only across
/// requests; the only mutable state is the atomic metrics registry. Construct the service near
/// process start and share it through an `Arc`.
pub struct DocumentService {
    classifier: ClassificationAgent,
    summarizer: SummarizerAgent,
    organizer: OrganizationAgent,
    upload_folder: PathBuf,
    metrics: Arc<DocumentMetrics>,
}

/// Abstraction over the pipeline used by the HTTP surface.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Validate an upload and, when acceptable, run it through the pipeline.
    async fn process_upload(&self, upload: UploadedFile) -> Result<UploadOutcome, ProcessingError>;

    /// Count a form submission that carried no file at all.
    fn record_missing_file(&self);

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl DocumentService {
    /// Build the service from configuration: backends, category folders, and the upload folder.
    pub fn new(config: &Config) -> Result<Self, OrganizeError> {
        tracing::info!(
            provider = ?config.classifier_provider,
            "Initializing classification agent"
        );
        let classifier = ClassificationAgent::new(
            get_classification_client(config),
            Category::ALL.to_vec(),
        );
        tracing::info!(
            provider = ?config.summarizer_provider,
            "Initializing summarization agent"
        );
        let summarizer = SummarizerAgent::new(get_summarization_client(config));
        let organizer = OrganizationAgent::new(
            config.classified_folder.clone(),
            Category::ALL.to_vec(),
            config.duplicate_policy,
        )?;

        Self::from_parts(
            classifier,
            summarizer,
            organizer,
            config.upload_folder.clone(),
        )
    }

    /// Assemble the service from prepared agents, creating the upload folder if needed.
    pub fn from_parts(
        classifier: ClassificationAgent,
        summarizer: SummarizerAgent,
        organizer: OrganizationAgent,
        upload_folder: PathBuf,
    ) -> Result<Self, OrganizeError> {
        create_dir(&upload_folder)?;
        tracing::debug!(
            upload_folder = %upload_folder.display(),
            classified_folder = %organizer.base_folder().display(),
            "Document folders ready"
        );
        Ok(Self {
            classifier,
            summarizer,
            organizer,
            upload_folder,
            metrics: Arc::new(DocumentMetrics::new()),
        })
    }

    fn reject(&self, filename: &str, reason: RejectReason) -> UploadOutcome {
        self.metrics.record_rejected();
        tracing::info!(filename, ?reason, "Upload rejected");
        UploadOutcome::Rejected(reason)
    }

    /// Save, extract, classify, summarize, and file one upload.
    ///
    /// The upload is written to its own scratch folder under the incoming folder and moved
    /// exactly once, after classification and summarization succeed. The scratch folder is
    /// removed when the request finishes, so a failed upload leaves nothing behind.
    pub async fn process_upload(
        &self,
        upload: UploadedFile,
    ) -> Result<UploadOutcome, ProcessingError> {
        if upload.filename.is_empty() {
            return Ok(self.reject(&upload.filename, RejectReason::MissingFile));
        }
        if !allowed_file(&upload.filename) {
            return Ok(self.reject(&upload.filename, RejectReason::DisallowedExtension));
        }
        // The extension letters survive sanitizing, so the name is never empty here.
        let filename = secure_filename(&upload.filename);

        let sha256 = hex::encode(Sha256::digest(&upload.data));
        // Per-request scratch folder: concurrent uploads with the same name never share a path.
        let scratch = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(&self.upload_folder)
            .map_err(|source| ProcessingError::Save {
                path: self.upload_folder.clone(),
                source,
            })?;
        let pdf_path = scratch.path().join(&filename);
        tracing::info!(
            filename = %filename,
            bytes = upload.data.len(),
            sha256 = %sha256,
            "Processing document"
        );
        tokio::fs::write(&pdf_path, &upload.data)
            .await
            .map_err(|source| ProcessingError::Save {
                path: pdf_path.clone(),
                source,
            })?;

        let extract_path = pdf_path.clone();
        let text = tokio::task::spawn_blocking(move || extract_text(&extract_path)).await??;
        let extracted_chars = text.chars().count();
        tracing::debug!(filename = %filename, extracted_chars, "Extracted text");

        let category = self.classifier.classify(&text).await?;
        tracing::debug!(filename = %filename, category = %category, "Classified document");

        let summary = self.summarizer.summarize(&text).await?;
        let stored_path = self.organizer.move_file(&pdf_path, category).await?;

        self.metrics.record_document(category);
        tracing::info!(
            filename = %filename,
            category = %category,
            stored_path = %stored_path.display(),
            summary_words = summary.split_whitespace().count(),
            "Document filed"
        );

        Ok(UploadOutcome::Processed(ProcessingOutcome {
            filename,
            category,
            summary,
            stored_path,
            extracted_chars,
            sha256,
            processed_at: current_timestamp_rfc3339(),
        }))
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl DocumentApi for DocumentService {
    async fn process_upload(
        &self,
        upload: UploadedFile,
    ) -> Result<UploadOutcome, ProcessingError> {
        DocumentService::process_upload(self, upload).await
    }

    fn record_missing_file(&self) {
        self.reject("", RejectReason::MissingFile);
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        DocumentService::metrics_snapshot(self)
    }
}
