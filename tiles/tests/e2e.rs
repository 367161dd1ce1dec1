//! E2E tests against the real completion API and a local web UI.
//! Run with: OPENAI_API_KEY=... SD_WEBUI_URL=http://127.0.0.1:7860 \
//!   cargo test -p smarttile-tiles --test e2e -- --ignored

use std::sync::Arc;

use smarttile_tiles::{
    read_text_chunk, Credential, GenerationRequest, Pipeline, PipelineConfig, ValidationOutcome,
    PARAMETERS_KEY,
};

fn sd_url() -> String {
    std::env::var("SD_WEBUI_URL").unwrap_or_else(|_| smarttile_sdwebui::DEFAULT_BASE_URL.to_string())
}

fn build_pipeline(api_key: &str) -> Pipeline {
    let config = PipelineConfig {
        sd_url: sd_url(),
        name_count: 2,
        ..Default::default()
    };
    let completer = smarttile_openai::Client::builder(api_key)
        .model(config.completion_model.clone())
        .build()
        .expect("openai client");
    let backend = smarttile_sdwebui::Client::builder()
        .base_url(config.sd_url.clone())
        .build()
        .expect("sdwebui client");
    Pipeline::new(config, Arc::new(completer), Arc::new(backend))
}

#[tokio::test]
#[ignore]
async fn e2e_preflight_ok() {
    let key = Credential::from_env_or(None).expect("OPENAI_API_KEY required");
    let dir = tempfile::tempdir().unwrap();
    let pipeline = build_pipeline(key.value());

    let request = GenerationRequest::new("castle", key.value(), dir.path());
    assert_eq!(pipeline.preflight(&request).await, ValidationOutcome::Ok);
}

#[tokio::test]
#[ignore]
async fn e2e_preflight_rejects_bad_key() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = build_pipeline("sk-definitely-not-a-key");

    let request = GenerationRequest::new("castle", "sk-definitely-not-a-key", dir.path());
    let outcome = pipeline.preflight(&request).await;
    assert!(
        matches!(
            outcome,
            ValidationOutcome::AuthenticationFailed | ValidationOutcome::ServiceUnreachable
        ),
        "unexpected outcome: {outcome:?}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore]
async fn e2e_generate_two_textures() {
    let key = Credential::from_env_or(None).expect("OPENAI_API_KEY required");
    let dir = tempfile::tempdir().unwrap();
    let pipeline = build_pipeline(key.value());

    let request = GenerationRequest::new("medieval castle", key.value(), dir.path());
    let report = pipeline.run(&request).await.expect("run failed");

    println!("names: {:?}", report.names);
    assert_eq!(report.names.len(), 2);
    for path in report.paths() {
        let bytes = std::fs::read(&path).unwrap();
        let text = read_text_chunk(&bytes, PARAMETERS_KEY).unwrap();
        assert!(text.is_some(), "{} has no parameters chunk", path.display());
    }
}
