use axum::{extract::State, routing::post, Json, Router};
use tracing::{debug, info, warn};

use crate::agents::DocumentInput;
use crate::models::{AppState, ChatRequest, ChatResponse};
use crate::types::{AppError, AppResult};
use crate::utils::{char_len, preview};

/// Inline content shorter than this is rejected
const MIN_INLINE_CONTENT_CHARS: usize = 50;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(post_chat))
        .with_state(state)
}

/// Pick the document a question is about: inline content, then an explicit
/// document id, then the most recent upload.
async fn resolve_input(state: &AppState, request: &ChatRequest) -> AppResult<DocumentInput> {
    let file_info = request.file_info.as_ref();

    if let Some(content) = file_info.and_then(|info| info.content.as_deref()).filter(|c| !c.is_empty()) {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::InvalidRequest(
                "The document content is empty. Please try uploading the file again.".to_string(),
            ));
        }
        if char_len(content) < MIN_INLINE_CONTENT_CHARS {
            return Err(AppError::InvalidRequest(
                "The document content is too short to process. Please upload a valid document.".to_string(),
            ));
        }
        info!(chars = char_len(content), "Using pre-processed content");
        debug!(preview = %preview(content, 200), "Content preview");
        return Ok(DocumentInput::Text(content.to_string()));
    }

    if let Some(id) = file_info.and_then(|info| info.document_id) {
        let record = state
            .documents
            .get(&id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;
        info!(document_id = %id, filename = %record.filename, "Using uploaded document");
        return Ok(DocumentInput::File(record.path));
    }

    match state.documents.latest().await {
        Some(record) => {
            warn!(filename = %record.filename, "No document specified, using most recent upload");
            Ok(DocumentInput::File(record.path))
        }
        None => Err(AppError::InvalidRequest("No document has been uploaded".to_string())),
    }
}

pub async fn post_chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> AppResult<Json<ChatResponse>> {
    info!(question = %request.question, has_file_info = request.file_info.is_some(), "Received chat request");

    if request.question.trim().is_empty() {
        return Err(AppError::InvalidRequest("Question is required".to_string()));
    }

    let input = resolve_input(&state, &request).await?;
    let answer = state.qa.run(&request.question, input).await;
    info!(answer_len = answer.len(), "Chat response sent");

    Ok(Json(ChatResponse {
        status: "success".to_string(),
        answer,
    }))
}
