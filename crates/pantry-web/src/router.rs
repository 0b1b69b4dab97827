//! Router setup.

use axum::http::Uri;
use axum::Router;

use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;

/// Build the full application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::index::routes())
        .merge(routes::food::routes())
        .merge(routes::columns::routes())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("not found: {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pantry_core::{LoadError, RawTable, SnapshotCache, TableSource};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    struct Fixed(Option<RawTable>);

    impl TableSource for Fixed {
        fn read_table(&self) -> Result<RawTable, LoadError> {
            self.0.clone().ok_or_else(|| LoadError::MissingHeader {
                path: "fixed".into(),
            })
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    fn router(table: Option<RawTable>) -> Router {
        let cache = SnapshotCache::new(Fixed(table), Duration::from_secs(60));
        app_router(AppState::new(Arc::new(cache)))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn fallback_is_json_not_found() {
        let (status, body) = get(router(None), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "not found: /nope"}));
    }

    #[tokio::test]
    async fn columns_route_is_mounted() {
        let table = RawTable {
            headers: vec!["name".into()],
            rows: vec![vec!["rye".into()]],
        };
        let (status, body) = get(router(Some(table)), "/api/columns").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"columns": ["name"]}));
    }
}
