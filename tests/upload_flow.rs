use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use docsort::api::create_router;
use docsort::config::{Config, InferenceProvider};
use docsort::processing::DocumentService;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "upload-flow-boundary";

struct Harness {
    root: TempDir,
    app: Router,
}

impl Harness {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let config = Config {
            upload_folder: root.path().join("incoming_pdfs"),
            classified_folder: root.path().join("classified_pdfs"),
            assets_folder: root.path().join("assets"),
            classifier_provider: InferenceProvider::Local,
            summarizer_provider: InferenceProvider::Local,
            ..Config::default()
        };
        let service = DocumentService::new(&config).expect("service");
        let app = create_router(Arc::new(service), &config);
        Self { root, app }
    }

    fn path(&self, relative: &str) -> std::path::PathBuf {
        self.root.path().join(relative)
    }

    async fn post(&self, filename: &str, data: &[u8]) -> (StatusCode, String) {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::get(uri).body(Body::empty()).expect("request"))
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn single_page_pdf(text: &str) -> Vec<u8> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 11.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = document.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content"),
    ));
    let page_id = document.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes).expect("save");
    bytes
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| {
                    let path = entry.path();
                    if path.is_dir() { count_files(&path) } else { 1 }
                })
                .sum()
        })
        .unwrap_or(0)
}

#[tokio::test]
async fn finance_invoice_is_classified_summarized_and_filed() {
    let harness = Harness::new();
    let pdf = single_page_pdf(
        "Invoice 2041. Amount due 4200 USD. Payment by bank transfer within 30 days.",
    );

    let (status, page) = harness.post("invoice.pdf", &pdf).await;

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Finance"), "page: {page}");
    assert!(page.contains("Summary"));
    assert!(page.contains("characters extracted"));
    let stored = harness.path("classified_pdfs/Finance/invoice.pdf");
    assert_eq!(std::fs::read(stored).expect("stored pdf"), pdf);
    assert_eq!(count_files(&harness.path("incoming_pdfs")), 0);

    let (_, metrics) = harness.get("/metrics").await;
    let metrics: serde_json::Value = serde_json::from_str(&metrics).expect("metrics json");
    assert_eq!(metrics["documents_processed"], 1);
    assert_eq!(metrics["per_category"]["Finance"], 1);
}

#[tokio::test]
async fn text_file_is_ignored_and_nothing_is_written() {
    let harness = Harness::new();

    let (status, page) = harness.post("readme.txt", b"just some notes").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!page.contains("Category:"));
    assert_eq!(count_files(&harness.path("incoming_pdfs")), 0);
    assert_eq!(count_files(&harness.path("classified_pdfs")), 0);

    let (_, metrics) = harness.get("/metrics").await;
    let metrics: serde_json::Value = serde_json::from_str(&metrics).expect("metrics json");
    assert_eq!(metrics["documents_processed"], 0);
    assert_eq!(metrics["uploads_rejected"], 1);
}

#[tokio::test]
async fn unreadable_pdf_yields_server_error_and_stays_unfiled() {
    let harness = Harness::new();

    let (status, page) = harness.post("broken.pdf", b"not really a pdf").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.contains("Internal Server Error"));
    assert_eq!(count_files(&harness.path("classified_pdfs")), 0);
    assert_eq!(count_files(&harness.path("incoming_pdfs")), 0);
}

#[tokio::test]
async fn upload_form_is_served() {
    let harness = Harness::new();
    let (status, page) = harness.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains(r#"type="file""#));
}
