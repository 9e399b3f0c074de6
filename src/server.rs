//! HTTP interface.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Index page with upload and URL forms |
//! | `POST` | `/upload` | Multipart PDF upload (field `files`), replaces the store |
//! | `POST` | `/process_url` | Fetch PDFs by URL (JSON `{"urls": [...]}` or form `urls=a,b`) |
//! | `GET`  | `/visualize/{viz_type}` | `clustering`, `bargraph` or `custom` chart fragment |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "No files provided" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `source_error` (500,
//! names the failing file or URL), `internal` (500).
//!
//! Each processing request extracts every document first and then replaces
//! the incident table once. Requests are not serialized against each other.

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::error::{IngestError, SourceKind};
use crate::fetch;
use crate::ingest;
use crate::pipeline::Pipeline;
use crate::store;
use crate::uploads;
use crate::viz::{self, VizKind};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    pool: SqlitePool,
    pipeline: Arc<Pipeline>,
    client: reqwest::Client,
}

/// Starts the HTTP server on `[server].bind` and runs until terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let pool = db::connect(config).await?;
    store::init(&pool).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        pool,
        pipeline: Arc::new(config.parsing.pipeline()),
        client: fetch::build_client(&config.fetch)?,
    };

    let app = router(state);

    println!("normanpd listening on http://{}", bind_addr);
    info!(bind = %bind_addr, "server started");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/", get(handle_index))
        .route(
            "/upload",
            post(handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/process_url", post(handle_process_url))
        .route("/visualize/{viz_type}", get(handle_visualize))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Source { .. } => AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "source_error",
                message: err.to_string(),
            },
            IngestError::Internal(e) => internal(format!("{:#}", e)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        internal(format!("{:#}", err))
    }
}

/// Success body for the processing endpoints.
#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

async fn handle_not_found(uri: Uri) -> AppError {
    not_found(format!("no route for {}", uri.path()))
}

// ============ GET / ============

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /upload ============

/// Saves every `files` part, extracts all of them in order, then replaces
/// the store. A part without a file name and without content is the empty
/// file input a browser submits when nothing was selected; it is ignored.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.body_text()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(e.body_text()))?;
        if name.is_empty() && bytes.is_empty() {
            continue;
        }
        files.push((name, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(bad_request("No files provided"));
    }

    let count = files.len();
    let mut documents = Vec::with_capacity(count);
    for (name, bytes) in files {
        let saved = uploads::save(&state.config.storage.upload_dir, &name, &bytes)?;
        let label = saved
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(name);
        documents.push(ingest::read_pages(SourceKind::File, &label, bytes).await?);
    }

    ingest::replace_batch(&state.pool, state.pipeline.clone(), documents).await?;

    Ok(Json(MessageResponse {
        message: format!("{} file(s) uploaded and processed successfully!", count),
    }))
}

// ============ POST /process_url ============

#[derive(Deserialize)]
struct UrlsJson {
    #[serde(default)]
    urls: Vec<String>,
}

#[derive(Deserialize)]
struct UrlsForm {
    #[serde(default)]
    urls: Option<String>,
}

/// Split a form `urls` value on commas, dropping blanks.
fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

async fn read_urls(req: Request, state: &AppState) -> Vec<String> {
    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        match Json::<UrlsJson>::from_request(req, state).await {
            Ok(Json(body)) => body
                .urls
                .iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect(),
            Err(_) => Vec::new(),
        }
    } else {
        match Form::<UrlsForm>::from_request(req, state).await {
            Ok(Form(form)) => split_urls(form.urls.as_deref().unwrap_or_default()),
            Err(_) => Vec::new(),
        }
    }
}

/// Fetches every URL in order; the first failure aborts the request and the
/// store is left as it was.
async fn handle_process_url(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let urls = read_urls(req, &state).await;
    if urls.is_empty() {
        return Err(bad_request("No URLs provided"));
    }

    let mut documents = Vec::with_capacity(urls.len());
    for url in &urls {
        documents.push(
            ingest::fetch_pages(&state.client, &state.config.storage.upload_dir, url).await?,
        );
    }

    ingest::replace_batch(&state.pool, state.pipeline.clone(), documents).await?;

    Ok(Json(MessageResponse {
        message: format!("{} URL(s) processed successfully!", urls.len()),
    }))
}

// ============ GET /visualize/{viz_type} ============

async fn handle_visualize(
    State(state): State<AppState>,
    Path(viz_type): Path<String>,
) -> Result<Html<String>, AppError> {
    let kind: VizKind = viz_type
        .parse()
        .map_err(|_| bad_request("Invalid visualization type"))?;
    let records = store::fetch_all(&state.pool).await?;
    Ok(Html(viz::render(kind, &records)))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Norman PD Incident Visualization</title>
  <style>
    body { font-family: sans-serif; margin: 2rem; }
    section { margin-bottom: 1.5rem; }
    #output { margin-top: 1rem; }
  </style>
</head>
<body>
  <h1>Norman PD Incident Visualization</h1>

  <section>
    <h2>Upload incident PDFs</h2>
    <form id="upload-form" enctype="multipart/form-data">
      <input type="file" name="files" accept="application/pdf" multiple>
      <button type="submit">Upload</button>
    </form>
  </section>

  <section>
    <h2>Process PDFs by URL</h2>
    <form id="url-form">
      <input type="text" name="urls" size="80" placeholder="https://example.com/a.pdf, https://example.com/b.pdf">
      <button type="submit">Process</button>
    </form>
  </section>

  <section>
    <h2>Visualize</h2>
    <button data-viz="clustering">Clustering</button>
    <button data-viz="bargraph">Bar Graph</button>
    <button data-viz="custom">Line Graph</button>
  </section>

  <p id="status"></p>
  <div id="output"></div>

  <script>
    const status = document.getElementById("status");
    const output = document.getElementById("output");

    async function report(resp) {
      const body = await resp.json();
      status.textContent = body.message || (body.error && body.error.message) || "";
    }

    document.getElementById("upload-form").addEventListener("submit", async (e) => {
      e.preventDefault();
      await report(await fetch("/upload", { method: "POST", body: new FormData(e.target) }));
    });

    document.getElementById("url-form").addEventListener("submit", async (e) => {
      e.preventDefault();
      const body = new URLSearchParams(new FormData(e.target));
      await report(await fetch("/process_url", { method: "POST", body }));
    });

    document.querySelectorAll("button[data-viz]").forEach((b) => {
      b.addEventListener("click", async () => {
        const resp = await fetch("/visualize/" + b.dataset.viz);
        const range = document.createRange();
        output.replaceChildren(range.createContextualFragment(await resp.text()));
      });
    });
  </script>
</body>
</html>
"#;
