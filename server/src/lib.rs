use axum::{extract::{Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use bookworm_core::render::{DocumentView, TitleView};
use bookworm_core::{CacheStore, Error, Fetch, QueryService};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct TitleParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize)]
pub struct SavedEntry {
    pub id: u64,
    pub title: String,
}

type ApiError = (StatusCode, Json<Value>);
type AppState<F, S> = Arc<QueryService<F, S>>;

pub fn build_app<F, S>(service: QueryService<F, S>) -> Router
where
    F: Fetch + 'static,
    S: CacheStore + 'static,
{
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/title", get(title_handler::<F, S>))
        .route("/analyze", post(analyze_handler::<F, S>))
        .route("/saved", get(saved_handler::<F, S>))
        .with_state(Arc::new(service))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn title_handler<F: Fetch, S: CacheStore>(
    State(service): State<AppState<F, S>>,
    Query(params): Query<TitleParams>,
) -> Result<Json<TitleView>, ApiError> {
    let outcome = service.resolve_by_title(&params.q).await.map_err(error_response)?;
    Ok(Json(TitleView::from(&outcome)))
}

pub async fn analyze_handler<F: Fetch, S: CacheStore>(
    State(service): State<AppState<F, S>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<DocumentView>, ApiError> {
    let record = service.resolve_by_url(&req.url).await.map_err(error_response)?;
    Ok(Json(DocumentView::from(&record)))
}

pub async fn saved_handler<F: Fetch, S: CacheStore>(
    State(service): State<AppState<F, S>>,
) -> Result<Json<Vec<SavedEntry>>, ApiError> {
    let entries = service.saved().map_err(error_response)?;
    Ok(Json(entries.into_iter().map(|(id, title)| SavedEntry { id, title }).collect()))
}

fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::EmptyInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Lookup { .. } | Error::Fetch { .. } => StatusCode::BAD_GATEWAY,
        Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "query failed");
    }
    (status, Json(json!({ "error": err.to_string() })))
}
