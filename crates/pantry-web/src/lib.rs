//! pantry-web: HTTP surface for pantry.
//!
//! Thin axum handlers over [`pantry_core`]: each one fetches the current
//! snapshot from the cache and runs a pure query against it.

pub mod error;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::app_router;
pub use server::{bind, serve};
pub use state::AppState;
