//! HTTP surface for the document sorter.
//!
//! - `GET /` – Upload form.
//! - `POST /` – Accept a multipart `file` field, run the pipeline, and render the category and
//!   summary. Uploads without a PDF re-render the bare form.
//! - `GET /assets/<path>` – Static files from the configured assets folder.
//! - `GET /metrics` – Upload counters as JSON.

use crate::config::Config;
use crate::processing::{DocumentApi, ProcessingError, UploadOutcome};
use crate::template::{render_error, render_index};
use crate::upload::{UploadError, parse_upload};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Build the HTTP router serving the upload page, static assets, and metrics.
pub fn create_router<S>(service: Arc<S>, config: &Config) -> Router
where
    S: DocumentApi + 'static,
{
    Router::new()
        .route("/", get(upload_form).post(upload_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .nest_service("/assets", ServeDir::new(&config.assets_folder))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(service)
}

async fn upload_form() -> Html<String> {
    render_index(None)
}

/// Run an uploaded document through the pipeline and render the result.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Html<String>, AppError>
where
    S: DocumentApi,
{
    let Some(upload) = parse_upload(multipart).await? else {
        service.record_missing_file();
        return Ok(render_index(None));
    };

    match service.process_upload(upload).await? {
        UploadOutcome::Processed(outcome) => Ok(render_index(Some(&outcome))),
        UploadOutcome::Rejected(_) => Ok(render_index(None)),
    }
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    documents_processed: u64,
    uploads_rejected: u64,
    per_category: BTreeMap<&'static str, u64>,
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsResponse>
where
    S: DocumentApi,
{
    let snapshot = service.metrics_snapshot();
    Json(MetricsResponse {
        documents_processed: snapshot.documents_processed,
        uploads_rejected: snapshot.uploads_rejected,
        per_category: snapshot
            .per_category
            .into_iter()
            .map(|(category, count)| (category.label(), count))
            .collect(),
    })
}

enum AppError {
    Upload(UploadError),
    Processing(ProcessingError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Upload(error) => {
                tracing::warn!(error = %error, "Rejected malformed upload");
                (StatusCode::BAD_REQUEST, error.to_string()).into_response()
            }
            Self::Processing(error) => {
                tracing::error!(error = %error, "Document processing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, render_error()).into_response()
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(inner: UploadError) -> Self {
        Self::Upload(inner)
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}
