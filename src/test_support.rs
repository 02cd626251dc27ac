//! Shared fixtures for unit tests.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::agents::{AnswerAgent, DocumentQaAgent};
use crate::config::Config;
use crate::documents::{ConverterLocator, DocumentProcessor};
use crate::llm::{LLMAdapter, LLM};
use crate::models::AppState;
use crate::registry::DocumentRegistry;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};

/// Records every request and answers with a fixed reply (or fails)
#[derive(Default)]
pub struct StubAdapter {
    reply: String,
    fail: bool,
    pub requests: Mutex<Vec<LLMRequest>>,
}

impl StubAdapter {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<LLMRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMAdapter for StubAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(AppError::LLMApi("upstream unavailable".to_string()));
        }
        Ok(LLMResponse {
            content: self.reply.clone(),
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

pub fn stub_llm(adapter: &Arc<StubAdapter>) -> LLM {
    LLM::new(adapter.clone(), "test-model")
}

/// Converter lookup that never finds anything
pub fn no_converter() -> ConverterLocator {
    ConverterLocator::new(None)
        .without_auto_detect()
        .with_well_known(Vec::new())
        .with_search_path(None)
}

/// Executable shell script standing in for Pandoc
#[cfg(unix)]
pub fn fake_converter(dir: &Path, script: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = dir.join("fake-pandoc");
    std::fs::write(&bin, script).unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
    bin
}

pub fn stub_agent(adapter: &Arc<StubAdapter>) -> DocumentQaAgent {
    DocumentQaAgent::with_parts(
        DocumentProcessor::with_converter(no_converter()),
        AnswerAgent::new(Some(stub_llm(adapter))),
    )
}

/// Application state writing uploads into `upload_dir`
pub fn test_state(upload_dir: &Path, adapter: &Arc<StubAdapter>) -> AppState {
    let mut config = Config::default();
    config.documents.upload_dir = upload_dir.to_path_buf();
    config.server.static_dir = upload_dir.join("no-frontend");
    AppState {
        config,
        qa: Arc::new(stub_agent(adapter)),
        documents: DocumentRegistry::default(),
    }
}

const BOUNDARY: &str = "doc-qa-test-boundary";

/// `POST /api/upload` carrying `body` as the `file` field
pub fn multipart_request(filename: &str, body: &[u8]) -> Request<Body> {
    let mut payload = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    payload.extend_from_slice(body);
    payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(payload))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
