use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::BytesMut;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::agents::{DocumentInput, ProcessingState, RAW_CONTENT_QUESTION};
use crate::documents::DocumentError;
use crate::models::{AppState, UploadResponse};
use crate::registry::DocumentRecord;
use crate::types::{AppError, AppResult};
use crate::utils::{char_len, truncate_chars};

pub const ALLOWED_EXTENSIONS: [&str; 8] = [".pdf", ".docx", ".doc", ".xlsx", ".xls", ".txt", ".ppt", ".pptx"];

const PREVIEW_CHARS: usize = 500;
/// Extracted text shorter than this counts as no content
const MIN_CONTENT_CHARS: usize = 10;
/// Pipeline answers shorter than this are replaced by the directly extracted text
const MIN_ANSWER_CHARS: usize = 20;
/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.documents.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/api/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn dotted_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// `<stem>_<unix_ts><.ext>`
fn stored_name(filename: &str, extension: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{}_{}{}", stem, chrono::Utc::now().timestamp(), extension)
}

fn preview(content: &str) -> String {
    let head = truncate_chars(content, PREVIEW_CHARS);
    if head.len() < content.len() {
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove rejected upload");
    }
}

async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<Json<UploadResponse>> {
    let max_bytes = state.config.documents.max_upload_bytes;

    let mut field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Invalid multipart body: {}", e)))?
        {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => return Err(AppError::InvalidRequest("No file provided".to_string())),
        }
    };

    // Only the final path component of the client-supplied name is kept
    let filename = field
        .file_name()
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidRequest("Invalid filename".to_string()))?;
    info!(filename = %filename, "Received file");

    let extension = dotted_extension(&filename);
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::InvalidRequest(format!(
            "Unsupported file type. Supported types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let mut buffer = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to read upload: {}", e)))?
    {
        if (buffer.len() + chunk.len()) as u64 > max_bytes {
            warn!(filename = %filename, limit = max_bytes, "Upload rejected: too large");
            return Err(AppError::InvalidRequest(format!(
                "File size exceeds {}MB limit",
                max_bytes / (1024 * 1024)
            )));
        }
        buffer.extend_from_slice(&chunk);
    }

    let upload_dir = &state.config.documents.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;
    let unique_name = stored_name(&filename, &extension);
    let path: PathBuf = upload_dir.join(&unique_name);
    tokio::fs::write(&path, &buffer)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save file: {}", e)))?;
    info!(path = %path.display(), bytes = buffer.len(), "File saved");

    let processed = match state
        .qa
        .invoke(ProcessingState::new(RAW_CONTENT_QUESTION, DocumentInput::File(path.clone())))
        .await
    {
        Ok(processed) => processed,
        Err(e) => {
            discard(&path).await;
            return Err(AppError::Internal(format!("Error processing file: {}", e)));
        }
    };

    if let Some(e) = &processed.error {
        error!(filename = %unique_name, error = %e, "Upload processing failed");
        discard(&path).await;
        return Err(AppError::Internal(e.user_message()));
    }

    let extracted = processed.joined_text();
    if char_len(extracted.trim()) < MIN_CONTENT_CHARS {
        discard(&path).await;
        let e = DocumentError::EmptyOrMissingContent(
            "The document appears to be empty or contains no extractable text content".to_string(),
        );
        return Err(AppError::Internal(e.user_message()));
    }

    let content = match processed.answer {
        Some(answer) if char_len(&answer) >= MIN_ANSWER_CHARS => answer,
        _ => {
            info!("Pipeline answer too short, using extracted text");
            extracted
        }
    };

    let document_id = Uuid::new_v4();
    state
        .documents
        .insert(DocumentRecord {
            id: document_id,
            filename: unique_name.clone(),
            path,
            content_length: char_len(&content),
            uploaded_at: chrono::Utc::now(),
        })
        .await;
    info!(document_id = %document_id, chars = char_len(&content), "Document processed successfully");

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        message: "File uploaded and processed successfully".to_string(),
        filename: unique_name,
        document_id,
        content_preview: preview(&content),
        content,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::test_support::{json_body, multipart_request, test_state, StubAdapter};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_stored_name() {
        let name = stored_name("Q3 report.PDF", ".pdf");
        assert!(name.starts_with("Q3 report_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(dotted_extension("deck.PPTX"), ".pptx");
        assert_eq!(dotted_extension("README"), "");
    }

    #[tokio::test]
    async fn test_text_upload_returns_content() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StubAdapter::replying("unused");
        let state = test_state(dir.path(), &adapter);
        let app = create_router(state.clone());

        let text = "Quarterly report\nRevenue in Q3 was 42,000 EUR.";
        let response = app.oneshot(multipart_request("report.txt", text.as_bytes())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["content"], text);
        assert!(body["filename"].as_str().unwrap().starts_with("report_"));
        assert_eq!(adapter.calls(), 0);

        let id: Uuid = body["document_id"].as_str().unwrap().parse().unwrap();
        assert!(state.documents.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn test_oversized_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StubAdapter::replying("unused");
        let app = create_router(test_state(dir.path(), &adapter));

        let body = vec![b'a'; 10 * 1024 * 1024 + 1];
        let response = app.oneshot(multipart_request("big.txt", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "File size exceeds 10MB limit");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StubAdapter::replying("unused");
        let app = create_router(test_state(dir.path(), &adapter));

        let response = app.oneshot(multipart_request("photo.png", b"\x89PNG")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Unsupported file type"));
        assert!(detail.contains(".pptx"));
    }

    #[tokio::test]
    async fn test_empty_document_removed() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StubAdapter::replying("unused");
        let app = create_router(test_state(dir.path(), &adapter));

        let response = app.oneshot(multipart_request("blank.txt", b"  \n ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("empty"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_extraction_error_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StubAdapter::replying("unused");
        let app = create_router(test_state(dir.path(), &adapter));

        let response = app.oneshot(multipart_request("old.doc", b"\xd0\xcf\x11\xe0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("Pandoc"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
