//! `GET /api/columns`: header names of the current snapshot.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use pantry_core::query;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    pub columns: Vec<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/columns", get(get_columns))
}

pub(crate) async fn get_columns(State(state): State<AppState>) -> ApiResult<Json<ColumnsResponse>> {
    let snapshot = state.snapshot().await?;
    let columns = query::list_columns(snapshot.as_deref())?
        .into_iter()
        .map(str::to_owned)
        .collect();
    Ok(Json(ColumnsResponse { columns }))
}
