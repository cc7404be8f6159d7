pub mod util;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::config::Config;
use crate::error::PurgeError;
use crate::index::stats::get_stats;
use crate::index::{DeleteQuery, IndexManager};
use crate::purge::{BatchIndex, DeleteByQuery, SearchIndex};

pub use util::{must_encode, show_error};

#[derive(Clone)]
pub struct AppState {
    pub index: IndexManager,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(index: IndexManager, config: Config) -> Self {
        Self {
            index,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteByQueryResponse {
    pub status: &'static str,
    pub deleted: usize,
    pub completed_at: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/delete_by_query", post(delete_by_query))
        .route("/api/stats", get(stats))
        .with_state(state)
}

pub async fn delete_by_query(
    State(state): State<AppState>,
    request: std::result::Result<Json<DeleteQuery>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => return show_error(&rejection.body_text(), StatusCode::BAD_REQUEST),
    };
    tracing::info!("Received delete by query request: {:?}", request);

    let query = match request.build(state.index.schema()) {
        Ok(query) => query,
        Err(e) => return show_error(&e.to_string(), StatusCode::BAD_REQUEST),
    };

    let batch_size = state.config.purge.batch_size;
    let index = state.index.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        delete_by_query_response(&index, &*query, batch_size)
    })
    .await;

    match outcome {
        Ok(response) => response,
        Err(e) => {
            let e = PurgeError::InternalError(format!("delete task failed: {}", e));
            show_error(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Runs one delete-by-query with a fresh coordinator and renders the outcome.
///
/// Blocks until the query finishes; failures answer 500 with the error text,
/// which carries the count deleted before the failure.
pub fn delete_by_query_response<I>(index: &I, query: &I::Query, batch_size: usize) -> Response
where
    I: SearchIndex + BatchIndex + ?Sized,
{
    let mut purge = DeleteByQuery::with_batch_size(index, batch_size);
    match purge.delete_by_query(query) {
        Ok(deleted) => must_encode(&DeleteByQueryResponse {
            status: "ok",
            deleted,
            completed_at: chrono::Utc::now().to_rfc3339(),
        }),
        Err(e) => show_error(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn stats(State(state): State<AppState>) -> Response {
    match get_stats(&state.index) {
        Ok(stats) => must_encode(&stats),
        Err(e) => show_error(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
    }
}
