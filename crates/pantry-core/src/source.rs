//! Source seam: where a snapshot's rows come from.
//!
//! The cache only talks to [`TableSource`]; the on-disk reader lives in the
//! `pantry-source` crate and tests plug in scripted fakes.

use crate::error::LoadError;
use crate::types::RawTable;

/// Trait implemented by each table source.
pub trait TableSource: Send + Sync {
    /// Read the whole table. Called outside any cache lock; may block.
    fn read_table(&self) -> Result<RawTable, LoadError>;

    /// Short description for logs (usually the file path).
    fn describe(&self) -> String;
}

impl<T: TableSource + ?Sized> TableSource for std::sync::Arc<T> {
    fn read_table(&self) -> Result<RawTable, LoadError> {
        (**self).read_table()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
