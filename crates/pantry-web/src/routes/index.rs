//! `GET /`: landing page.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Serve the page and, if nothing is cached yet, start loading in the
/// background so the page's first API call is likely to find data.
pub(crate) async fn index(State(state): State<AppState>) -> Html<&'static str> {
    if state.cache.current().is_none() {
        tracing::debug!("no snapshot cached, spawning warm-up");
        let _ = state.cache.spawn_warm_up();
    }
    Html(INDEX_HTML)
}
