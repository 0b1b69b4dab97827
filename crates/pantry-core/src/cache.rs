//! Cache: the single owner of the current [`Snapshot`].
//!
//! One mutex covers the `reloading` check-and-set and the snapshot/timestamp
//! swap. The source read itself runs outside the lock, so readers are never
//! held up by a reload; they get whichever snapshot was current when they
//! asked. A reload requested while another is running is dropped, not queued.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::LoadError;
use crate::source::TableSource;
use crate::types::{Snapshot, DEFAULT_NA_VALUES};

/// What a call to [`SnapshotCache::reload`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new snapshot was published.
    Loaded {
        rows: usize,
        columns: usize,
        elapsed: Duration,
    },
    /// Another reload was already running; nothing happened.
    Skipped,
    /// The source failed; the previous snapshot (if any) is still current.
    Failed,
}

impl ReloadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ReloadOutcome::Loaded { .. })
    }
}

#[derive(Debug, Default)]
struct CacheState {
    current: Option<Arc<Snapshot>>,
    loaded_at: Option<DateTime<Utc>>,
    reloading: bool,
}

/// In-memory snapshot cache with time-based invalidation.
pub struct SnapshotCache {
    source: Box<dyn TableSource>,
    staleness: Duration,
    na_values: Vec<String>,
    state: Mutex<CacheState>,
}

impl SnapshotCache {
    pub fn new(source: impl TableSource + 'static, staleness: Duration) -> Self {
        Self {
            source: Box::new(source),
            staleness,
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Replace the set of cell texts normalised to the empty string.
    pub fn with_na_values(mut self, na_values: Vec<String>) -> Self {
        self.na_values = na_values;
        self
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Re-read the source and publish a new snapshot.
    ///
    /// Never returns an error: failures are logged and leave the previous
    /// snapshot in place.
    pub fn reload(&self) -> ReloadOutcome {
        let Some(_guard) = ReloadGuard::acquire(self) else {
            tracing::debug!(source = %self.source.describe(), "reload already in progress, skipping");
            return ReloadOutcome::Skipped;
        };

        let origin = self.source.describe();
        tracing::info!(source = %origin, "loading table");
        let started = Instant::now();

        let result = self.read_snapshot(&origin);
        let elapsed = started.elapsed();

        match result {
            Ok(snapshot) => {
                let (rows, columns) = (snapshot.len(), snapshot.columns().len());
                tracing::info!(
                    source = %origin,
                    rows,
                    columns,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "table loaded"
                );
                tracing::info!(columns = ?snapshot.column_names(), "available columns");

                let mut state = self.lock();
                state.loaded_at = Some(snapshot.loaded_at());
                state.current = Some(Arc::new(snapshot));
                ReloadOutcome::Loaded {
                    rows,
                    columns,
                    elapsed,
                }
            }
            Err(err) => {
                tracing::error!(source = %origin, error = %err, "failed to load table");
                ReloadOutcome::Failed
            }
        }
    }

    /// The current snapshot, reloading first when none is cached or the
    /// cached one is older than the staleness window.
    ///
    /// Returns whatever is cached if the reload is skipped or fails, which
    /// may be `None`.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        if self.needs_reload() {
            self.reload();
        }
        self.current()
    }

    /// The cached snapshot, without any staleness check.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.lock().current.clone()
    }

    /// Time of the last successful load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.lock().loaded_at
    }

    pub fn is_reloading(&self) -> bool {
        self.lock().reloading
    }

    /// Kick off a reload on tokio's blocking pool without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_warm_up(self: &Arc<Self>) -> tokio::task::JoinHandle<ReloadOutcome> {
        let cache = Arc::clone(self);
        tokio::task::spawn_blocking(move || cache.reload())
    }

    fn needs_reload(&self) -> bool {
        let state = self.lock();
        match (&state.current, state.loaded_at) {
            (Some(_), Some(loaded_at)) => {
                let age = Utc::now().signed_duration_since(loaded_at);
                // A clock that went backwards yields a negative age: treat as fresh.
                age.to_std().map(|age| age > self.staleness).unwrap_or(false)
            }
            _ => true,
        }
    }

    fn read_snapshot(&self, origin: &str) -> Result<Snapshot, LoadError> {
        let raw = catch_unwind(AssertUnwindSafe(|| self.source.read_table())).unwrap_or_else(
            |panic| {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic while reading source".to_string());
                Err(LoadError::Aborted(message))
            },
        )?;
        Snapshot::from_raw(raw, &self.na_values, origin)
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is safe to keep using.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SnapshotCache")
            .field("source", &self.source.describe())
            .field("staleness", &self.staleness)
            .field("rows", &state.current.as_ref().map(|s| s.len()))
            .field("loaded_at", &state.loaded_at)
            .field("reloading", &state.reloading)
            .finish()
    }
}

/// Holds the `reloading` flag for the duration of one reload and clears it on
/// every exit path.
struct ReloadGuard<'a> {
    cache: &'a SnapshotCache,
}

impl<'a> ReloadGuard<'a> {
    fn acquire(cache: &'a SnapshotCache) -> Option<Self> {
        let mut state = cache.lock();
        if state.reloading {
            return None;
        }
        state.reloading = true;
        Some(Self { cache })
    }
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.cache.lock().reloading = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
