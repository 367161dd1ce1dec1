use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    decode_image, Client, PngInfoRequest, Txt2ImgRequest, CHECKPOINT_TEXTURE_DIFFUSION,
};

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorded {
    fn push(&self, path: &str, body: Value) {
        self.calls.lock().unwrap().push((path.to_string(), body));
    }

    fn paths(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

// "hello" in base64.
const FAKE_IMAGE: &str = "aGVsbG8=";

async fn spawn_fake_webui() -> (String, Recorded) {
    let state = Recorded::default();
    let app = Router::new()
        .route("/", get(|| async { "Stable Diffusion" }))
        .route(
            "/sdapi/v1/options",
            post(|State(s): State<Recorded>, Json(body): Json<Value>| async move {
                s.push("options", body);
                Json(Value::Null)
            }),
        )
        .route(
            "/sdapi/v1/txt2img",
            post(|State(s): State<Recorded>, Json(body): Json<Value>| async move {
                let prompt = body["prompt"].clone();
                s.push("txt2img", body);
                Json(json!({
                    "images": [FAKE_IMAGE],
                    "parameters": {"prompt": prompt},
                    "info": "{\"seed\": 1234}"
                }))
            }),
        )
        .route(
            "/sdapi/v1/png-info",
            post(|State(s): State<Recorded>, Json(body): Json<Value>| async move {
                s.push("png-info", body);
                Json(json!({"info": "PBR, brick\nSteps: 20, Seed: 1234", "items": {}}))
            }),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn test_ping() {
    let (base_url, _) = spawn_fake_webui().await;
    let client = Client::builder().base_url(&base_url).build().unwrap();
    client.ping().await.unwrap();
}

#[tokio::test]
async fn test_ping_unreachable() {
    let client = Client::builder().base_url("http://127.0.0.1:1").build().unwrap();
    let err = client.ping().await.unwrap_err();
    assert!(err.is_connection());
}

#[tokio::test]
async fn test_ping_error_status() {
    let app = Router::new().route(
        "/",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = Client::builder().base_url(format!("http://{}", addr)).build().unwrap();
    match client.ping().await.unwrap_err() {
        crate::Error::Api { http_status, .. } => assert_eq!(http_status, 503),
        e => panic!("unexpected error: {e}"),
    }
}

#[tokio::test]
async fn test_set_checkpoint() {
    let (base_url, state) = spawn_fake_webui().await;
    let client = Client::builder().base_url(&base_url).build().unwrap();

    client.options().set_checkpoint(CHECKPOINT_TEXTURE_DIFFUSION).await.unwrap();

    let calls = state.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1["sd_model_checkpoint"], CHECKPOINT_TEXTURE_DIFFUSION);
}

#[tokio::test]
async fn test_txt2img_then_png_info() {
    let (base_url, state) = spawn_fake_webui().await;
    let client = Client::builder().base_url(format!("{}/", base_url)).build().unwrap();

    let resp = client
        .images()
        .txt2img(&Txt2ImgRequest::new("PBR, brick"))
        .await
        .unwrap();
    assert_eq!(resp.images.len(), 1);
    assert_eq!(resp.parameters["prompt"], "PBR, brick");
    assert_eq!(decode_image(&resp.images[0]).unwrap(), b"hello");

    let info = client
        .images()
        .png_info(&PngInfoRequest::from_base64(&resp.images[0]))
        .await
        .unwrap();
    assert_eq!(info.info, "PBR, brick\nSteps: 20, Seed: 1234");

    assert_eq!(state.paths(), vec!["txt2img", "png-info"]);
    let calls = state.calls.lock().unwrap();
    assert_eq!(calls[0].1["tiling"], true);
    assert_eq!(calls[1].1["image"], format!("data:image/png;base64,{}", FAKE_IMAGE));
}

#[test]
fn test_builder_default_url() {
    let client = Client::new().unwrap();
    assert_eq!(client.base_url(), crate::DEFAULT_BASE_URL);
    assert!(Client::builder().base_url("/").build().is_err());
}
