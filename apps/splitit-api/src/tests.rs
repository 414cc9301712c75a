//! Endpoint tests for the SplitIt API
//!
//! Runs the real router against a loopback stub of the remote recognizer,
//! so the full submit → poll → normalize pipeline is exercised in-process.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_test::TestServer;
use serde_json::{json, Value};
use splitit_recognizer::{RecognizerClient, RecognizerConfig};

use crate::router;
use crate::state::AppState;

#[derive(Clone)]
struct RecognizerStub {
    base: String,
    /// When set, submissions are rejected with this status and body
    reject: Option<(u16, &'static str)>,
    /// Status strings served to consecutive polls; the last repeats
    statuses: Arc<Vec<&'static str>>,
    polls: Arc<AtomicUsize>,
}

async fn stub_submit(State(stub): State<RecognizerStub>) -> (StatusCode, HeaderMap, String) {
    let mut headers = HeaderMap::new();
    match stub.reject {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            headers,
            body.to_string(),
        ),
        None => {
            headers.insert(
                "Operation-Location",
                format!("{}/poll", stub.base).parse().unwrap(),
            );
            (StatusCode::ACCEPTED, headers, String::new())
        }
    }
}

async fn stub_poll(State(stub): State<RecognizerStub>) -> Json<Value> {
    let n = stub.polls.fetch_add(1, Ordering::SeqCst);
    let status = stub.statuses[n.min(stub.statuses.len() - 1)];
    let document = match status {
        "succeeded" => json!({
            "status": "succeeded",
            "analyzeResult": {"documents": [{"fields": {
                "MerchantName": {"content": "Cafe"},
                "Subtotal": {"valueNumber": 4.5},
                "Total": {"valueNumber": 4.5},
                "Items": {"valueArray": [{"valueObject": {
                    "Description": {"content": "Coffee"},
                    "TotalPrice": {"valueNumber": "4.50"}
                }}]}
            }}]}
        }),
        "failed" => json!({
            "status": "failed",
            "error": {"code": "InvalidImage", "message": "image too blurry"}
        }),
        other => json!({"status": other}),
    };
    Json(document)
}

async fn spawn_recognizer_stub(
    reject: Option<(u16, &'static str)>,
    statuses: Vec<&'static str>,
) -> RecognizerStub {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let stub = RecognizerStub {
        base: format!("http://{addr}"),
        reject,
        statuses: Arc::new(statuses),
        polls: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route("/formrecognizer/documentModels/*rest", post(stub_submit))
        .route("/poll", get(stub_poll))
        .with_state(stub.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    stub
}

fn test_server(stub: &RecognizerStub) -> TestServer {
    let config = RecognizerConfig::new(stub.base.clone(), "test-key")
        .with_poll_interval(Duration::from_millis(10))
        .with_max_polls(20);
    let state = Arc::new(AppState::new(RecognizerClient::new(config)));
    TestServer::new(router(state)).unwrap()
}

/// Hand-rolled multipart body with one `file` part
fn multipart_body(content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "splitit-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"receipt.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[tokio::test]
async fn test_health_returns_ok() {
    let stub = spawn_recognizer_stub(None, vec!["succeeded"]).await;
    let server = test_server(&stub);

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_analyze_returns_normalized_receipt() {
    let stub = spawn_recognizer_stub(None, vec!["running", "succeeded"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"fake image bytes");
    let response = server
        .post("/api/receipts/analyze")
        .content_type(&content_type)
        .bytes(body.into())
        .await;

    response.assert_status_ok();
    let record = response.json::<Value>();
    assert_eq!(record["merchant_name"], "Cafe");
    assert_eq!(record["subtotal"], 4.5);
    assert_eq!(record["total"], 4.5);
    assert_eq!(record["total_tax"], 0.0);
    assert_eq!(record["tip"], 0.0);
    assert_eq!(record["items"][0]["description"], "Coffee");
    assert_eq!(record["items"][0]["price"], 4.5);
    assert!(record["tax_details"].as_array().unwrap().is_empty());
    assert_eq!(stub.polls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let stub = spawn_recognizer_stub(None, vec!["succeeded"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"");
    let response = server
        .post("/api/receipts/analyze")
        .content_type(&content_type)
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>();
    assert!(error["error"].as_str().unwrap().contains("No file part"));
    // Nothing was submitted upstream
    assert_eq!(stub.polls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upstream_rejection_surfaces_diagnostic() {
    let stub = spawn_recognizer_stub(Some((429, "throttled")), vec!["succeeded"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"fake image bytes");
    let response = server
        .post("/api/receipts/analyze")
        .content_type(&content_type)
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let error = response.json::<Value>();
    let message = error["error"].as_str().unwrap();
    assert!(message.contains("429"), "message: {message}");
    assert!(message.contains("throttled"), "message: {message}");
    assert_eq!(stub.polls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_analysis_returns_error_payload() {
    let stub = spawn_recognizer_stub(None, vec!["running", "running", "failed"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"fake image bytes");
    let response = server
        .post("/api/receipts/analyze")
        .content_type(&content_type)
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let error = response.json::<Value>();
    assert!(error["error"].as_str().unwrap().contains("InvalidImage"));
    assert_eq!(stub.polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let stub = spawn_recognizer_stub(None, vec!["succeeded"]).await;
    let server = test_server(&stub);

    let response = server
        .get("/api/receipts/00000000-0000-0000-0000-000000000000")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let error = response.json::<Value>();
    assert!(error["error"].as_str().unwrap().contains("Job not found"));
}

/// Poll a background job until it leaves the pending state
async fn await_terminal(server: &TestServer, id: &str) -> Value {
    for _ in 0..100 {
        let response = server.get(&format!("/api/receipts/{id}")).await;
        response.assert_status_ok();
        let job = response.json::<Value>();
        if job["status"] != "pending" {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} never reached a terminal state");
}

#[tokio::test]
async fn test_background_job_reaches_succeeded() {
    let stub = spawn_recognizer_stub(None, vec!["running", "succeeded"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"fake image bytes");
    let response = server
        .post("/api/receipts")
        .content_type(&content_type)
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    let submitted = response.json::<Value>();
    assert_eq!(submitted["status"], "pending");
    let id = submitted["id"].as_str().unwrap().to_string();

    let job = await_terminal(&server, &id).await;
    assert_eq!(job["status"], "succeeded");
    assert_eq!(job["receipt"]["merchant_name"], "Cafe");
    assert_eq!(job["receipt"]["items"][0]["price"], 4.5);
    assert!(job.get("error").is_none());
}

#[tokio::test]
async fn test_terminal_job_is_discarded_after_delivery() {
    let stub = spawn_recognizer_stub(None, vec!["succeeded"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"fake image bytes");
    let response = server
        .post("/api/receipts")
        .content_type(&content_type)
        .bytes(body.into())
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    // The fetch that observes the terminal state carries the result out
    // of the store
    let job = await_terminal(&server, &id).await;
    assert_eq!(job["status"], "succeeded");
    assert_eq!(job["receipt"]["merchant_name"], "Cafe");

    let response = server.get(&format!("/api/receipts/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_background_job_records_failure() {
    let stub = spawn_recognizer_stub(None, vec!["running", "failed"]).await;
    let server = test_server(&stub);

    let (content_type, body) = multipart_body(b"fake image bytes");
    let response = server
        .post("/api/receipts")
        .content_type(&content_type)
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let job = await_terminal(&server, &id).await;
    assert_eq!(job["status"], "failed");
    assert!(job["error"].as_str().unwrap().contains("InvalidImage"));
    assert!(job.get("receipt").is_none());
}
