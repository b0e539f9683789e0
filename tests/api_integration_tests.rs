//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use scratch_reaper::{api::create_router, AppState, ScratchConfig, ScratchRegistry};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

const BOUNDARY: &str = "scratch-test-boundary";

fn accepted_types() -> Vec<String> {
    ["docx", "html", "pdf", "txt", "md", "rtf"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn create_test_state(dir: &TempDir, max_upload_bytes: u64, expiry: Duration) -> AppState {
    let registry = ScratchRegistry::new(ScratchConfig {
        max_upload_bytes,
        expiry,
        ..ScratchConfig::new(dir.path().join("scratch"))
    })
    .unwrap();
    AppState::new(registry, accepted_types())
}

fn create_test_app(dir: &TempDir) -> (Router, AppState) {
    let state = create_test_state(dir, 1024 * 1024, Duration::from_secs(3600));
    (create_router(state.clone()), state)
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/uploads")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, file_name, content)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Upload Endpoint Tests ==

#[tokio::test]
async fn test_upload_endpoint_success() {
    let dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&dir);

    let response = app
        .oneshot(upload_request("file", "Quarterly Report.docx", b"docx bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["file_name"], "Quarterly Report.docx");
    assert_eq!(json["output_name"], "Quarterly Report.md");
    assert_eq!(json["size"], 10);
    assert_eq!(json["size_display"], "10 bytes");
    assert!(json["created_at"].as_str().is_some());

    let path = PathBuf::from(json["path"].as_str().unwrap());
    assert!(path.starts_with(state.registry.scratch_dir()));
    assert!(path.extension().is_some_and(|ext| ext == "docx"));
    assert_eq!(std::fs::read(&path).unwrap(), b"docx bytes");
    assert!(state.registry.is_tracked(&path).await);
}

#[tokio::test]
async fn test_upload_same_name_twice_gets_distinct_paths() {
    let dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&dir);

    let first = app
        .clone()
        .oneshot(upload_request("file", "notes.txt", b"first"))
        .await
        .unwrap();
    let second = app
        .oneshot(upload_request("file", "notes.txt", b"second"))
        .await
        .unwrap();

    let first = body_to_json(first.into_body()).await;
    let second = body_to_json(second.into_body()).await;
    assert_ne!(first["path"], second["path"]);
    assert_eq!(state.registry.len().await, 2);
}

#[tokio::test]
async fn test_upload_endpoint_too_large() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, 10, Duration::from_secs(3600));
    let app = create_router(state.clone());

    let response = app
        .oneshot(upload_request("file", "big.txt", &[b'x'; 25]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = body_to_json(response.into_body()).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("10 bytes"));
    assert!(message.contains("25 bytes"));

    assert!(state.registry.is_empty().await);
    assert_eq!(state.registry.stats().await.uploads_rejected, 1);
    assert_eq!(
        std::fs::read_dir(state.registry.scratch_dir()).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_upload_past_body_limit_reports_size() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, 10, Duration::from_secs(3600));
    let app = create_router(state.clone());

    // Larger than the limit plus the multipart allowance
    let body = multipart_body("file", "huge.txt", &vec![b'x'; 2 * 1024 * 1024]);
    let request = Request::builder()
        .method("POST")
        .uri("/uploads")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = body_to_json(response.into_body()).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("10 bytes"));
    assert!(message.contains("2.0 MB"));

    assert!(state.registry.is_empty().await);
    assert_eq!(state.registry.stats().await.uploads_rejected, 1);
    assert_eq!(
        std::fs::read_dir(state.registry.scratch_dir()).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_upload_endpoint_unsupported_type() {
    let dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&dir);

    let response = app
        .oneshot(upload_request("file", "photo.png", b"png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("photo.png"));
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn test_upload_endpoint_missing_file_field() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let response = app
        .oneshot(upload_request("attachment", "notes.txt", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("file"));
}

// == Files Endpoint Tests ==

#[tokio::test]
async fn test_files_endpoint_lists_uploads() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    app.clone()
        .oneshot(upload_request("file", "a.md", b"# a"))
        .await
        .unwrap();
    app.clone()
        .oneshot(upload_request("file", "b.html", b"<p>b</p>"))
        .await
        .unwrap();

    let response = app.oneshot(get("/files")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 2);
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    for file in files {
        assert!(file["expires_in_seconds"].as_u64().unwrap() <= 3600);
    }
}

#[tokio::test]
async fn test_files_endpoint_empty() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let response = app.oneshot(get("/files")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);
    assert!(json["files"].as_array().unwrap().is_empty());
}

// == Cleanup Endpoint Tests ==

#[tokio::test]
async fn test_cleanup_endpoint_removes_expired() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, 1024, Duration::ZERO);
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(upload_request("file", "notes.txt", b"hello"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    let path = PathBuf::from(json["path"].as_str().unwrap());

    tokio::time::sleep(Duration::from_millis(10)).await;

    let response = app.clone().oneshot(post("/cleanup")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], 1);
    assert!(!path.exists());
    assert!(state.registry.is_empty().await);

    // A second cleanup has nothing left to do
    let response = app.oneshot(post("/cleanup")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], 0);
}

#[tokio::test]
async fn test_cleanup_endpoint_keeps_fresh_files() {
    let dir = TempDir::new().unwrap();
    let (app, state) = create_test_app(&dir);

    app.clone()
        .oneshot(upload_request("file", "notes.txt", b"hello"))
        .await
        .unwrap();

    let response = app.oneshot(post("/cleanup")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], 0);
    assert_eq!(state.registry.len().await, 1);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_counts() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    app.clone()
        .oneshot(upload_request("file", "notes.txt", b"hello"))
        .await
        .unwrap();
    app.clone().oneshot(post("/cleanup")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["uploads_saved"], 1);
    assert_eq!(json["manual_cleanups"], 1);
    assert_eq!(json["tracked_files"], 1);
    assert_eq!(json["max_upload_bytes"], 1024 * 1024);
    assert_eq!(json["expiry_seconds"], 3600);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _) = create_test_app(&dir);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
