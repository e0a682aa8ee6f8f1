//! Shared test fixtures: a local fake of the Airweave API and a scripted
//! completion model.

#![allow(dead_code)]

use airsearch::ai::CompletionModel;
use airsearch::core::config::AirweaveConfig;
use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// One request received by a fake server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

pub fn record(recorder: &Recorder, path: String, headers: HeaderMap, body: &str) {
    recorder.lock().unwrap().push(RecordedRequest {
        path,
        headers,
        body: serde_json::from_str(body).ok(),
    });
}

#[derive(Clone)]
struct AirweaveState {
    status: StatusCode,
    search_body: String,
    collections_body: String,
    recorder: Recorder,
}

/// A fake Airweave API answering every search with a fixed status and body
pub struct FakeAirweave {
    pub base_url: String,
    recorder: Recorder,
}

impl FakeAirweave {
    pub async fn start(status: u16, search_body: &str) -> Self {
        Self::with_collections(status, search_body, "[]").await
    }

    pub async fn with_collections(status: u16, search_body: &str, collections_body: &str) -> Self {
        let recorder: Recorder = Arc::default();
        let state = AirweaveState {
            status: StatusCode::from_u16(status).unwrap(),
            search_body: search_body.to_string(),
            collections_body: collections_body.to_string(),
            recorder: recorder.clone(),
        };

        let app = Router::new()
            .route("/collections", get(list_collections))
            .route("/collections/:id/search", post(search))
            .with_state(state);

        Self {
            base_url: serve(app).await,
            recorder,
        }
    }

    /// Settings pointing at this server, with a key and collection set
    pub fn settings(&self) -> AirweaveConfig {
        AirweaveConfig {
            api_key: Some("test-key".to_string()),
            collection_id: Some("eng-docs".to_string()),
            base_url: self.base_url.clone(),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorder.lock().unwrap().clone()
    }
}

async fn search(
    State(state): State<AirweaveState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    record(&state.recorder, format!("/collections/{}/search", id), headers, &body);
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.search_body.clone(),
    )
}

async fn list_collections(State(state): State<AirweaveState>, headers: HeaderMap) -> impl IntoResponse {
    record(&state.recorder, "/collections".to_string(), headers, "");
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.collections_body.clone(),
    )
}

/// A completion model that plays back canned replies in order and records
/// every prompt it was sent
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Arc::default(),
        }
    }

    /// Handle on the recorded prompts, usable after the model is boxed
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no scripted reply left")),
        }
    }
}
