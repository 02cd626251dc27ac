//! Static File Serving
//!
//! Serves the built frontend from `STATIC_DIR` (default `frontend/build`).
//! When nothing has been built yet, `/` answers with a small landing page
//! describing the API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::models::AppState;

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    if static_dir.is_dir() {
        info!(path = %static_dir.display(), "Serving frontend");
    } else {
        warn!(path = %static_dir.display(), "Frontend build not found, serving landing page only");
    }

    let serve_dir = ServeDir::new(&static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/", get(serve_index))
        .fallback_service(serve_dir)
        .with_state(static_dir)
}

async fn serve_index(State(static_dir): State<PathBuf>) -> Response {
    if let Ok(content) = tokio::fs::read_to_string(static_dir.join("index.html")).await {
        return html(content);
    }
    html(LANDING_PAGE.to_string())
}

fn html(body: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Document QA - API Server</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 40px 20px;
            color: #222;
        }
        h1 { margin-bottom: 10px; }
        code { background: #f2f2f2; padding: 2px 6px; border-radius: 4px; }
        pre { background: #f2f2f2; padding: 15px; border-radius: 6px; overflow-x: auto; }
    </style>
</head>
<body>
    <h1>Document QA</h1>
    <p>The API server is running. The web frontend has not been built.</p>

    <h3>API Endpoints</h3>
    <ul>
        <li><code>GET /api/health</code> - Health check</li>
        <li><code>POST /api/upload</code> - Upload a PDF, Word, Excel, PowerPoint or text file</li>
        <li><code>POST /api/chat</code> - Ask a question about an uploaded document</li>
    </ul>

    <h4>Example:</h4>
    <pre>curl -F file=@report.pdf http://localhost:8000/api/upload

curl -X POST http://localhost:8000/api/chat \
  -H "Content-Type: application/json" \
  -d '{"question": "What was the revenue in Q3?", "file_info": {"document_id": "..."}}'</pre>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use crate::routes::create_router;
    use crate::test_support::{test_state, StubAdapter};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_landing_page_without_build() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StubAdapter::replying("unused");
        let app = create_router(test_state(dir.path(), &adapter));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/upload"));
    }
}
