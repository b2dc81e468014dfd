#![deny(missing_docs)]

//! Core library for the document sorter: upload a PDF, classify it, summarize it, and file it.

/// HTTP routing and page handlers.
pub mod api;
/// Fixed document category set.
pub mod category;
/// Zero-shot classification clients and agent.
pub mod classification;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extract;
/// Shared HTTP plumbing for remote inference backends.
pub mod inference;
/// Structured logging and tracing setup.
pub mod logging;
/// Upload metrics helpers.
pub mod metrics;
/// Category folder management.
pub mod organize;
/// Document processing pipeline.
pub mod processing;
/// Summarization clients and agent.
pub mod summarization;
/// HTML page rendering.
pub mod template;
/// Multipart intake and filename checks.
pub mod upload;
