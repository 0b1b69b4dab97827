//! Shared state handed to every handler.

use std::sync::Arc;

use pantry_core::config::QueryConfig;
use pantry_core::query::DEFAULT_PER_PAGE;
use pantry_core::{SearchOptions, Snapshot, SnapshotCache};

use crate::error::ApiResult;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
    pub default_per_page: usize,
    pub search: SearchOptions,
}

impl AppState {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self {
            cache,
            default_per_page: DEFAULT_PER_PAGE,
            search: SearchOptions::default(),
        }
    }

    pub fn with_query_config(mut self, cfg: &QueryConfig) -> Self {
        self.default_per_page = cfg.default_per_page;
        self.search = SearchOptions {
            skip_numeric_columns: cfg.skip_numeric_columns,
        };
        self
    }

    /// Fetch the current snapshot off the async executor; a stale or missing
    /// snapshot triggers a blocking reload.
    pub async fn snapshot(&self) -> ApiResult<Option<Arc<Snapshot>>> {
        let cache = Arc::clone(&self.cache);
        Ok(tokio::task::spawn_blocking(move || cache.snapshot()).await?)
    }
}
