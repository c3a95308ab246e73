//! Data endpoint - threshold query as JSON

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{DataRepo, Record};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/test1 - rows with `field2` above the configured threshold
async fn above_threshold(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let start = Instant::now();
    let result = DataRepo::new(&state.pool)
        .above_threshold(state.threshold)
        .await;
    let elapsed = start.elapsed();

    match &result {
        Ok(records) => tracing::info!(?elapsed, rows = records.len(), "Query duration"),
        Err(_) => tracing::info!(?elapsed, "Query duration (failed)"),
    }

    Ok(Json(result?))
}

/// Data routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/test1", get(above_threshold))
}
