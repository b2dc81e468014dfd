//! Document pipeline: save, extract, classify, summarize, and file an upload.

mod service;
pub mod types;

pub use service::{DocumentApi, DocumentService, RejectReason, UploadOutcome};
pub use types::{ProcessingError, ProcessingOutcome};
