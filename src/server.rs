//! HTTP search API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/search?q=<term>` | Search every feed, return a JSON array |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! `/api/search` answers `400` when `q` is missing or empty, `405` for any
//! method other than `GET`, and `500` when the feed list cannot be loaded.
//! Individual feed failures are logged and do not change the status: the
//! response is `200` with whatever the other feeds matched.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "q must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `source_unavailable` (500), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser front end
//! served from another origin can call the API.

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use feedscan_core::{Match, SearchError};

use crate::config::Config;
use crate::search::{cancel_after, Searcher};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    searcher: Searcher,
    /// Upper bound on one search; `None` means unbounded.
    timeout: Option<Duration>,
}

/// Starts the HTTP server on `[server].bind`.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> Result<()> {
    let searcher = Searcher::from_config(config)?;
    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(bind = %config.server.bind, "feedscan server listening");
    println!("feedscan server listening on http://{}", config.server.bind);
    serve(listener, searcher, config.search.timeout()).await
}

/// Serve the API on an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    searcher: Searcher,
    timeout: Option<Duration>,
) -> Result<()> {
    axum::serve(listener, router(searcher, timeout)).await?;
    Ok(())
}

/// Build the application router.
pub fn router(searcher: Searcher, timeout: Option<Duration>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", get(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { searcher, timeout })
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
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        let code = match err {
            SearchError::SourceUnavailable(_) => "source_unavailable",
            _ => "internal",
        };
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
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

// ============ GET /api/search ============

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// One element of the `/api/search` response array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultBody {
    /// Text of the matching item field.
    pub title: String,
    pub description: String,
    /// Name of the feed the match came from.
    pub source: String,
    /// RFC 3339 when the feed's date parsed, verbatim otherwise, empty if absent.
    pub date: String,
}

impl From<Match> for SearchResultBody {
    fn from(m: Match) -> Self {
        Self {
            title: m.content,
            description: m.description.unwrap_or_default(),
            source: m.source,
            date: m.date.unwrap_or_default(),
        }
    }
}

/// Handler for `GET /api/search`.
///
/// Collects the whole match stream before responding. If the search hits
/// its timeout, the matches gathered so far are returned.
async fn handle_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResultBody>>, AppError> {
    let term = query.q.unwrap_or_default();
    if term.is_empty() {
        return Err(bad_request("q must not be empty"));
    }

    tracing::info!(term = %term, "search request");

    let cancel = cancel_after(state.timeout);
    let _guard = cancel.clone().drop_guard();

    let stream = state.searcher.run(&term, cancel).await?;
    let (matches, summary) = stream.collect().await;

    tracing::info!(
        term = %term,
        matches = summary.matches,
        feeds = summary.feeds,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "search complete"
    );

    Ok(Json(matches.into_iter().map(SearchResultBody::from).collect()))
}
