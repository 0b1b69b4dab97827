//! pantry-core: snapshot model, cache and query engine.
//!
//! # Architecture
//!
//! ```text
//! TableSource ──► SnapshotCache ──► query::run ──► HTTP
//!                     │
//!                     └──► Snapshot::column_names
//! ```
//!
//! The cache owns the only mutable state. Everything downstream works on an
//! `Arc<Snapshot>` and never mutates it.

pub mod cache;
pub mod config;
pub mod error;
pub mod query;
pub mod source;
pub mod types;

pub use cache::{ReloadOutcome, SnapshotCache};
pub use error::{LoadError, QueryError};
pub use query::{Page, QueryParams, SearchOptions};
pub use source::TableSource;
pub use types::{Column, ColumnKind, RawTable, RecordView, Row, Snapshot};
