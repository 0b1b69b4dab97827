//! pantry-source: table source adapters for pantry.
//!
//! Each adapter reads raw rows from somewhere and hands a
//! [`pantry_core::RawTable`] to the cache. The only adapter today is the
//! on-disk delimited file.

pub mod delimited;

pub use delimited::DelimitedFile;
