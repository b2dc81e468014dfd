//! Plain-text extraction from PDF documents.
//!
//! Pages are visited in page-number order and their text is concatenated without separators
//! beyond what the content streams themselves produce. Extraction is deterministic: the same
//! bytes always yield the same string.

use lopdf::Document;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading text out of a PDF.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The file could not be read or is not a parseable PDF.
    #[error("Failed to load PDF: {0}")]
    Load(String),
    /// A page's content stream could not be decoded.
    #[error("Failed to extract text from page {page}: {message}")]
    Page {
        /// One-based page number.
        page: u32,
        /// Underlying parser message.
        message: String,
    },
}

/// Extract the text of every page of the PDF at `path`, in page order.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let document = Document::load(path)
        .map_err(|error| ExtractionError::Load(format!("{}: {error}", path.display())))?;
    text_from_document(&document)
}

/// Extract the text of every page of an in-memory PDF, in page order.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|error| ExtractionError::Load(error.to_string()))?;
    text_from_document(&document)
}

fn text_from_document(document: &Document) -> Result<String, ExtractionError> {
    let mut text = String::new();
    // `get_pages` is a BTreeMap keyed by page number, so iteration is already in page order.
    for page in document.get_pages().into_keys() {
        let content = document
            .extract_text(&[page])
            .map_err(|error| ExtractionError::Page {
                page,
                message: error.to_string(),
            })?;
        text.push_str(&content);
    }
    tracing::debug!(
        pages = document.get_pages().len(),
        chars = text.chars().count(),
        "Extracted PDF text"
    );
    Ok(text)
}

/// Build small single-font PDFs for tests, one content stream per page.
#[cfg(test)]
pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = document.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes).expect("serialize pdf");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_concatenated_in_order() {
        let pdf = sample_pdf(&["Quarterly invoice", "Payment terms", "Signature block"]);
        let text = extract_text_from_bytes(&pdf).expect("text");

        let first = text.find("Quarterly invoice").expect("page 1");
        let second = text.find("Payment terms").expect("page 2");
        let third = text.find("Signature block").expect("page 3");
        assert!(first < second && second < third, "unexpected order: {text:?}");
    }

    #[test]
    fn extraction_is_repeatable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("memo.pdf");
        std::fs::write(&path, sample_pdf(&["Release checklist", "Rollback plan"])).unwrap();

        let first = extract_text(&path).expect("first pass");
        let second = extract_text(&path).expect("second pass");
        assert_eq!(first, second);
        assert!(first.contains("Rollback plan"));
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let error = extract_text_from_bytes(b"definitely not a pdf").expect_err("load error");
        assert!(matches!(error, ExtractionError::Load(_)));
    }

    #[test]
    fn missing_file_fails_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = extract_text(&dir.path().join("absent.pdf")).expect_err("load error");
        assert!(error.to_string().contains("absent.pdf"));
    }
}
