use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use crate::{Client, CompletionRequest, ErrorKind, MODEL_TEXT_DAVINCI_003};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn completions(
    State(state): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.bodies.lock().unwrap().push(body.clone());

    let auth = headers
        .get("authorization")
        .map(|v| v.as_bytes().to_vec())
        .unwrap_or_default();

    match auth.as_slice() {
        b"Bearer sk-valid" => (
            StatusCode::OK,
            Json(json!({
                "id": "cmpl-1",
                "object": "text_completion",
                "created": 1700000000,
                "model": body["model"],
                "choices": [{"text": "\n\nConcrete", "index": 0, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
            })),
        ),
        b"Bearer sk-busy" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}})),
        ),
        b"Bearer sk-broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "The server had an error", "type": "server_error", "code": null}})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}})),
        ),
    }
}

async fn spawn_fake_api() -> (String, Recorded) {
    let state = Recorded::default();
    let app = Router::new()
        .route("/v1/completions", post(completions))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), state)
}

fn client(base_url: &str, key: &str) -> Client {
    Client::builder(key).base_url(base_url).build().unwrap()
}

#[tokio::test]
async fn test_complete_returns_first_choice() {
    let (base_url, state) = spawn_fake_api().await;
    let client = client(&base_url, "sk-valid");

    let text = client.completions().complete("Name a material", 0.6, 150).await.unwrap();
    assert_eq!(text, "\n\nConcrete");

    let bodies = state.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["prompt"], "Name a material");
    assert_eq!(bodies[0]["max_tokens"], 150);
    assert!((bodies[0]["temperature"].as_f64().unwrap() - 0.6).abs() < 1e-6);
    assert_eq!(bodies[0]["model"], crate::DEFAULT_COMPLETION_MODEL);
}

#[tokio::test]
async fn test_create_fills_empty_model() {
    let (base_url, state) = spawn_fake_api().await;
    let client = Client::builder("sk-valid")
        .base_url(&base_url)
        .model(MODEL_TEXT_DAVINCI_003)
        .build()
        .unwrap();

    let resp = client
        .completions()
        .create(&CompletionRequest {
            prompt: "test".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(resp.model, MODEL_TEXT_DAVINCI_003);
    assert_eq!(resp.usage.unwrap().total_tokens, 15);
    assert!(state.bodies.lock().unwrap()[0].get("temperature").is_none());
}

#[tokio::test]
async fn test_error_classification() {
    let (base_url, _) = spawn_fake_api().await;

    let err = client(&base_url, "sk-wrong")
        .completions()
        .complete("test", 0.6, 150)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);

    let err = client(&base_url, "sk-busy")
        .completions()
        .complete("test", 0.6, 150)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);

    let err = client(&base_url, "sk-broken")
        .completions()
        .complete("test", 0.6, 150)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
}

#[tokio::test]
async fn test_non_latin1_key_never_sent() {
    let (base_url, state) = spawn_fake_api().await;

    let err = client(&base_url, "sk-🔥")
        .completions()
        .complete("test", 0.6, 150)
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::InvalidCredential));
    assert!(state.bodies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_is_connection_error() {
    let err = client("http://127.0.0.1:1/v1", "sk-valid")
        .completions()
        .complete("test", 0.6, 150)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[test]
fn test_builder_trims_trailing_slash() {
    let client = Client::builder("sk").base_url("http://localhost:8080/v1/").build().unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080/v1");
    assert_eq!(client.api_key(), "sk");
}

#[test]
fn test_builder_rejects_empty_model() {
    assert!(Client::builder("sk").model("").build().is_err());
}
