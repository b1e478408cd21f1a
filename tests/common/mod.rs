//! Common test utilities

#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use solvehook::core::{AppState, Dispatcher, Pipeline};
use solvehook::models::{Config, Secrets};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_TOKEN: &str = "tok-test-123";

/// What the stub completion endpoint answers with
#[derive(Clone)]
pub enum StubReply {
    /// A well-formed completion whose first choice holds this source
    Source(String),
    /// A 200 response with this raw JSON body
    Raw(Value),
    /// An error status
    Status(u16),
    /// A well-formed completion sent only after this delay
    Delayed(Duration, String),
    /// The n-th request gets the n-th source, wrapping around
    Sequence(Vec<String>),
}

/// Requests received by the stub: authorization header and JSON body
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<(Option<String>, Value)>>>);

impl Captured {
    pub fn requests(&self) -> Vec<(Option<String>, Value)> {
        self.0.lock().unwrap().clone()
    }
}

pub fn completion_body(source: &str) -> Value {
    json!({
        "id": "gen-test",
        "model": "openai/gpt-4.1-nano",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": source}, "finish_reason": "stop"}
        ]
    })
}

/// Start a stub chat-completions server and return its endpoint URL
pub async fn spawn_stub_llm(reply: StubReply) -> (String, Captured) {
    let captured = Captured::default();
    let seen = captured.clone();

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let reply = reply.clone();
            let seen = seen.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let index = {
                    let mut requests = seen.0.lock().unwrap();
                    requests.push((auth, body));
                    requests.len() - 1
                };
                match reply {
                    StubReply::Source(source) => (StatusCode::OK, Json(completion_body(&source))),
                    StubReply::Raw(value) => (StatusCode::OK, Json(value)),
                    StubReply::Status(code) => (
                        StatusCode::from_u16(code).unwrap(),
                        Json(json!({"error": {"message": "stubbed failure"}})),
                    ),
                    StubReply::Delayed(delay, source) => {
                        tokio::time::sleep(delay).await;
                        (StatusCode::OK, Json(completion_body(&source)))
                    }
                    StubReply::Sequence(sources) => {
                        let source = &sources[index % sources.len()];
                        (StatusCode::OK, Json(completion_body(source)))
                    }
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1/chat/completions", addr), captured)
}

/// Config pointing at `llm_url`, storing the artifact in `dir` and running it with `sh`
pub fn test_config(dir: &TempDir, llm_url: &str) -> Config {
    let mut config = Config::default();
    config.llm.url = llm_url.to_string();
    config.llm.timeout_seconds = 10;
    config.artifact.path = artifact_path(dir);
    config.execution.interpreter = "sh".to_string();
    config
}

pub fn artifact_path(dir: &TempDir) -> PathBuf {
    dir.path().join("generated_script.sh")
}

pub fn test_secrets() -> Secrets {
    Secrets::new(TEST_SECRET, TEST_TOKEN)
}

pub fn test_dispatcher(config: &Config) -> Dispatcher {
    Dispatcher::new(Pipeline::new(config, &test_secrets()).unwrap())
}

pub fn test_state(dispatcher: Dispatcher) -> AppState {
    AppState::new(TEST_SECRET, dispatcher)
}
