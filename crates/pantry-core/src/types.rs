//! Core types for pantry-core.
//!
//! A [`Snapshot`] is the schema (ordered [`Column`]s) plus rows stored as
//! fixed-arity value tuples aligned to that schema. Records only become
//! column→value mappings at the response boundary, through [`RecordView`].

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::LoadError;

/// Cell texts treated as missing when no explicit set is configured.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Whether a column holds free text or only numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    /// Every non-missing value parses as a number. A column with no values at
    /// all is numeric too.
    Numeric,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Numeric => write!(f, "numeric"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text, verbatim.
    pub name: String,
    pub kind: ColumnKind,
}

/// One record: exactly one value per schema column, in schema order.
pub type Row = Box<[String]>;

/// A table as produced by a [`TableSource`](crate::source::TableSource),
/// before normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// An immutable, fully materialised copy of the source table.
#[derive(Debug, Clone)]
pub struct Snapshot {
    columns: Vec<Column>,
    rows: Vec<Row>,
    loaded_at: DateTime<Utc>,
    origin: String,
}

impl Snapshot {
    /// Normalise a raw table into a snapshot.
    ///
    /// Values found in `na_values` become the empty string. Short rows are
    /// padded with empty values; a row wider than the header is an error.
    pub fn from_raw(
        raw: RawTable,
        na_values: &[String],
        origin: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let width = raw.headers.len();
        let mut rows = Vec::with_capacity(raw.rows.len());

        for (idx, mut values) in raw.rows.into_iter().enumerate() {
            if values.len() > width {
                return Err(LoadError::RowTooWide {
                    // +2: one for the header, one for 1-based lines.
                    line: idx as u64 + 2,
                    expected: width,
                    found: values.len(),
                });
            }
            values.resize(width, String::new());
            for value in values.iter_mut() {
                if na_values.iter().any(|na| na == value) {
                    value.clear();
                }
            }
            rows.push(values.into_boxed_slice());
        }

        let columns = raw
            .headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Column {
                name,
                kind: infer_kind(rows.iter().map(|row: &Row| row[idx].as_str())),
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            loaded_at: Utc::now(),
            origin: origin.into(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// When this snapshot was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Human-readable description of where the data came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// View row `idx` as a column→value mapping.
    pub fn record(&self, idx: usize) -> Option<RecordView<'_>> {
        self.rows.get(idx).map(|row| RecordView {
            columns: &self.columns,
            row,
        })
    }
}

fn infer_kind<'a>(mut values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let all_numeric = values.all(|v| v.is_empty() || v.trim().parse::<f64>().is_ok());
    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

/// A row paired with its schema. Serialises as a JSON object whose keys are
/// in header order.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    columns: &'a [Column],
    row: &'a Row,
}

impl<'a> RecordView<'a> {
    pub fn new(columns: &'a [Column], row: &'a Row) -> Self {
        Self { columns, row }
    }

    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .map(|idx| self.row[idx].as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let (columns, row) = (self.columns, self.row);
        columns
            .iter()
            .zip(row.iter())
            .map(|(c, v)| (c.name.as_str(), v.as_str()))
    }
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn na() -> Vec<String> {
        DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
    }

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn na_values_become_empty() {
        let snap = Snapshot::from_raw(
            raw(&["name", "fat"], &[&["apple", "NaN"], &["N/A", "3"]]),
            &na(),
            "test",
        )
        .unwrap();
        assert_eq!(&*snap.rows()[0], &["apple".to_string(), String::new()]);
        assert_eq!(&*snap.rows()[1], &[String::new(), "3".to_string()]);
    }

    #[test]
    fn short_rows_are_padded() {
        let snap = Snapshot::from_raw(raw(&["a", "b", "c"], &[&["1"]]), &na(), "test").unwrap();
        assert_eq!(snap.rows()[0].len(), 3);
        assert_eq!(snap.rows()[0][2], "");
    }

    #[test]
    fn wide_rows_are_rejected() {
        let err = Snapshot::from_raw(raw(&["a"], &[&["1"], &["1", "2"]]), &na(), "test")
            .unwrap_err();
        match err {
            LoadError::RowTooWide {
                line,
                expected,
                found,
            } => {
                assert_eq!((line, expected, found), (3, 1, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn column_kinds_are_inferred() {
        let snap = Snapshot::from_raw(
            raw(
                &["שם", "קלוריות", "ריק"],
                &[&["תפוח", "52", ""], &["לחם", "2.5e2", ""]],
            ),
            &na(),
            "test",
        )
        .unwrap();
        let kinds: Vec<_> = snap.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Text, ColumnKind::Numeric, ColumnKind::Numeric]
        );
        assert_eq!(snap.column_names(), vec!["שם", "קלוריות", "ריק"]);
    }

    #[test]
    fn record_serialises_in_header_order() {
        let snap = Snapshot::from_raw(
            raw(&["zeta", "alpha"], &[&["1", "apple"]]),
            &na(),
            "test",
        )
        .unwrap();
        let json = serde_json::to_string(&snap.record(0).unwrap()).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"apple"}"#);
        assert_eq!(snap.record(0).unwrap().get("alpha"), Some("apple"));
        assert!(snap.record(1).is_none());
    }
}
