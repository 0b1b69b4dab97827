//! Route handlers, one module per resource.

pub mod columns;
pub mod food;
pub mod index;
