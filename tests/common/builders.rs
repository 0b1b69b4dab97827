//! Test builders: terse constructors for raw tables and snapshots.
//!
//! These panic on invalid input rather than returning `Result`.

use pantry_core::types::DEFAULT_NA_VALUES;
use pantry_core::{RawTable, Snapshot};

/// Build a raw table from string literals.
pub fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}

pub fn na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}

/// Build a normalised snapshot from string literals.
pub fn snapshot(headers: &[&str], rows: &[&[&str]]) -> Snapshot {
    Snapshot::from_raw(table(headers, rows), &na_values(), "test").expect("valid test table")
}

/// `[name, category]` with `apple/fruit` and `Bread/bakery`.
pub fn fruit_table() -> RawTable {
    table(
        &["name", "category"],
        &[&["apple", "fruit"], &["Bread", "bakery"]],
    )
}

/// `n` rows of `[id, name]`; every third name contains "bread".
pub fn numbered_table(n: usize) -> RawTable {
    RawTable {
        headers: vec!["id".into(), "name".into()],
        rows: (0..n)
            .map(|i| {
                let name = if i % 3 == 0 {
                    format!("Bread #{i}")
                } else {
                    format!("item {i}")
                };
                vec![i.to_string(), name]
            })
            .collect(),
    }
}

pub fn numbered_snapshot(n: usize) -> Snapshot {
    Snapshot::from_raw(numbered_table(n), &na_values(), "test").expect("valid test table")
}
