//! Delimited text table reader (CSV and friends).
//!
//! The first record is the header. Data records are read in chunks of
//! `chunk_rows` and the chunks are concatenated once the file is exhausted.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use pantry_core::config::DataConfig;
use pantry_core::{LoadError, RawTable, TableSource};

const DEFAULT_CHUNK_ROWS: usize = 5000;

/// A UTF-8 delimited file with a header row.
#[derive(Debug, Clone)]
pub struct DelimitedFile {
    path: PathBuf,
    delimiter: u8,
    chunk_rows: usize,
}

impl DelimitedFile {
    /// Comma-delimited file with the default chunk size.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }

    pub fn from_config(cfg: &DataConfig) -> Self {
        Self::new(&cfg.path)
            .with_delimiter(cfg.delimiter_byte())
            .with_chunk_rows(cfg.chunk_rows)
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Rows per read increment. Zero is treated as one.
    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a table from any reader. `path` is only used in errors.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<RawTable, LoadError> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers().map_err(|e| self.csv_error(e))?.clone();
        if headers.is_empty() {
            return Err(LoadError::MissingHeader {
                path: self.path.clone(),
            });
        }
        let headers = normalize_headers(headers.iter());

        let mut chunks: Vec<Vec<Vec<String>>> = Vec::new();
        let mut chunk = Vec::with_capacity(self.chunk_rows);
        for record in csv.records() {
            let record = record.map_err(|e| self.csv_error(e))?;
            if record.len() > headers.len() {
                return Err(LoadError::RowTooWide {
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            chunk.push(record.iter().map(str::to_owned).collect());
            if chunk.len() == self.chunk_rows {
                chunks.push(std::mem::replace(
                    &mut chunk,
                    Vec::with_capacity(self.chunk_rows),
                ));
            }
        }
        if !chunk.is_empty() {
            chunks.push(chunk);
        }

        tracing::debug!(
            path = %self.path.display(),
            chunks = chunks.len(),
            chunk_rows = self.chunk_rows,
            "read delimited table"
        );

        Ok(RawTable {
            headers,
            rows: chunks.into_iter().flatten().collect(),
        })
    }

    fn csv_error(&self, err: csv::Error) -> LoadError {
        LoadError::Csv {
            path: self.path.clone(),
            source: Box::new(err),
        }
    }
}

impl TableSource for DelimitedFile {
    fn read_table(&self) -> Result<RawTable, LoadError> {
        let file = File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.read_from(BufReader::new(file))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Strip a leading BOM, name blank headers `Unnamed: <idx>` and suffix
/// repeated names with `.1`, `.2`, … in order of appearance.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (idx, name) in raw.enumerate() {
        let name = if idx == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut n = 0;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        out.push(candidate);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
