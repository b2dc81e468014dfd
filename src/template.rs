//! HTML rendering for the upload page.

use crate::processing::ProcessingOutcome;
use axum::response::Html;

const INDEX_HTML: &str = include_str!("../templates/index.html");
const RESULT_SLOT: &str = "{{ result }}";

/// Render the upload page, with the classification result when one is available.
pub fn render_index(outcome: Option<&ProcessingOutcome>) -> Html<String> {
    let result = outcome.map(render_result).unwrap_or_default();
    Html(INDEX_HTML.replace(RESULT_SLOT, &result))
}

fn render_result(outcome: &ProcessingOutcome) -> String {
    format!(
        r#"    <section class="result">
      <h2>Category: <span class="category">{category}</span></h2>
      <p class="filed">Filed as <code>{filename}</code> at {processed_at}, {extracted_chars} characters extracted</p>
      <h3>Summary</h3>
      <p class="summary">{summary}</p>
    </section>"#,
        category = html_escape::encode_text(outcome.category.label()),
        filename = html_escape::encode_text(&outcome.filename),
        summary = html_escape::encode_text(&outcome.summary),
        processed_at = html_escape::encode_text(&outcome.processed_at),
        extracted_chars = outcome.extracted_chars,
    )
}

/// Minimal page returned when the pipeline fails.
pub fn render_error() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html><html><head><title>500 Internal Server Error</title></head>\
         <body><h1>Internal Server Error</h1>\
         <p>The server encountered an internal error and was unable to complete your request.</p>\
         </body></html>",
    )
}
