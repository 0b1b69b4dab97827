//! `GET /api/food`: filtered, paginated records.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use pantry_core::{query, QueryParams};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Raw query string. Numbers stay strings here so malformed values produce a
/// JSON error instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FoodQuery {
    pub query: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/food", get(get_food))
}

pub(crate) async fn get_food(
    State(state): State<AppState>,
    query: Result<Query<FoodQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(raw) = query.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let params = QueryParams::parse(
        raw.query.as_deref(),
        raw.page.as_deref(),
        raw.per_page.as_deref(),
        state.default_per_page,
    )?;

    let snapshot = state.snapshot().await?;
    let page = query::run(snapshot.as_deref(), &params, &state.search)?;

    tracing::debug!(
        query = %params.text(),
        page = page.page,
        per_page = page.per_page,
        total_items = page.total_items,
        "food page"
    );
    Ok(Json(page).into_response())
}
