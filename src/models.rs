use std::sync::Arc;
use uuid::Uuid;

use crate::agents::DocumentQaAgent;
use crate::config::Config;
use crate::registry::DocumentRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub qa: Arc<DocumentQaAgent>,
    pub documents: DocumentRegistry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let qa = Arc::new(DocumentQaAgent::new(&config));
        Self {
            config,
            qa,
            documents: DocumentRegistry::default(),
        }
    }
}

// API request/response bodies

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub file_info: Option<FileInfo>,
}

/// Document reference sent along with a chat question
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FileInfo {
    /// Content previously returned by the upload endpoint
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub document_id: Option<Uuid>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub answer: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub message: String,
    pub filename: String,
    pub document_id: Uuid,
    pub content_preview: String,
    pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// "configured" or "missing_api_key"
    pub llm: String,
    pub documents: usize,
}
