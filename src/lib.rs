//! pantry: cached search and pagination API over a delimited table.
//!
//! The root crate is the binary plus the integration harnesses; it re-exports
//! the layers so tests and benches can import them from one place.
//!
//! # Architecture
//!
//! ```text
//! DelimitedFile ──► SnapshotCache ──► query ──► axum routes
//!  (pantry-source)    (pantry-core)            (pantry-web)
//! ```
//!
//! The cache is the only shared mutable state. Handlers pull an
//! `Arc<Snapshot>` from it and run read-only queries.

pub use pantry_core as core;
pub use pantry_source as source;
pub use pantry_web as web;
